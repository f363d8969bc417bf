//! The single error type the core produces (spec.md §7): one message,
//! one line, one column, no recovery.

extern crate alloc;

use alloc::string::String;

use jschema::ConvertError;

/// Convenient type alias for parser results.
pub type Result<T> = core::result::Result<T, ParseError>;

/// Why a parse failed, without position information (see [`ParseError`]
/// for the positioned form actually surfaced to callers).
#[derive(Debug)]
pub enum ErrorKind {
    UnexpectedEof,
    ExpectedOneOf(&'static [char]),
    ExpectedEscapedChar,
    ExpectedHexDigit,
    UnrecognizedToken(String),
    EmptyDocument,
    DocumentAlreadyEnded,
    NotMapOrRecord,
    NotArrayOrTuple,
    UnionNoMapOrRecord,
    StringExpected,
    MapStringExpected,
    RecordRestFieldNotString,
    ArrayElementNotString,
    TupleElementNotString,
    NoEligibleTypes,
    NoMatchingType,
    ArraySizeNotEnough,
    ArrayNoFillerValue,
    TupleSizeExceeded,
    TupleTooFewElements,
    MissingRequiredField { field: String, record: String },
    FieldCannotBeAdded { field: String, record: String },
    ValueCannotBeConstructed,
    MaxDepthExceeded,
    Convert(ConvertError),
    Reader(jreader::Error),
}

#[cfg(any(feature = "std", feature = "display"))]
impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ErrorKind::UnexpectedEof => write!(f, "unexpected end of JSON document"),
            ErrorKind::ExpectedOneOf(chars) => {
                write!(f, "expected ")?;
                for (i, c) in chars.iter().enumerate() {
                    if i > 0 {
                        write!(f, " or ")?;
                    }
                    write!(f, "'{c}'")?;
                }
                Ok(())
            }
            ErrorKind::ExpectedEscapedChar => write!(f, "expected escaped characters"),
            ErrorKind::ExpectedHexDigit => {
                write!(f, "expected the hexadecimal value of a unicode character")
            }
            ErrorKind::UnrecognizedToken(lexeme) => write!(f, "unrecognized token '{lexeme}'"),
            ErrorKind::EmptyDocument => write!(f, "empty JSON document"),
            ErrorKind::DocumentAlreadyEnded => write!(f, "JSON document has already ended"),
            ErrorKind::NotMapOrRecord => write!(f, "target type is not map or record type"),
            ErrorKind::NotArrayOrTuple => write!(f, "target type is not array or tuple type"),
            ErrorKind::UnionNoMapOrRecord => {
                write!(f, "target union type does not contain map or record type")
            }
            ErrorKind::StringExpected => write!(f, "not a string, string expected"),
            ErrorKind::MapStringExpected => write!(f, "map<string> expected, not a string"),
            ErrorKind::RecordRestFieldNotString => write!(f, "record rest field not a string"),
            ErrorKind::ArrayElementNotString => {
                write!(f, "given is a string, but array element type is not string")
            }
            ErrorKind::TupleElementNotString => {
                write!(f, "string is given, but the tuple element type is not string")
            }
            ErrorKind::NoEligibleTypes => write!(f, "no eligible types"),
            ErrorKind::NoMatchingType => write!(f, "no matching type"),
            ErrorKind::ArraySizeNotEnough => write!(f, "array size is not enough"),
            ErrorKind::ArrayNoFillerValue => write!(f, "array does not have filler values"),
            ErrorKind::TupleSizeExceeded => write!(f, "tuple size exceeded"),
            ErrorKind::TupleTooFewElements => write!(f, "tuple size is too large"),
            ErrorKind::MissingRequiredField { field, record } => write!(
                f,
                "missing required field '{field}' in record '{record}'"
            ),
            ErrorKind::FieldCannotBeAdded { field, record } => write!(
                f,
                "field '{field}' cannot be added to the closed record '{record}'"
            ),
            ErrorKind::ValueCannotBeConstructed => write!(f, "value cannot be constructed"),
            ErrorKind::MaxDepthExceeded => write!(f, "maximum nesting depth exceeded"),
            ErrorKind::Convert(e) => write!(f, "{e}"),
            ErrorKind::Reader(e) => write!(f, "{e}"),
        }
    }
}

impl From<ConvertError> for ErrorKind {
    fn from(e: ConvertError) -> Self {
        ErrorKind::Convert(e)
    }
}

/// The one error variant the core produces: a message plus the position
/// of the character that triggered it (spec.md §7/§8 invariant 4).
#[derive(Debug)]
pub struct ParseError {
    pub kind: ErrorKind,
    pub line: usize,
    pub column: usize,
}

#[cfg(any(feature = "std", feature = "display"))]
impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} at line: {} column: {}",
            self.kind, self.line, self.column
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseError {}
