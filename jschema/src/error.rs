//! Errors produced while converting a lexed textual value to a target
//! primitive type (spec.md §4.5, §6 `TypeConverter::convertValues`).

extern crate alloc;

use alloc::string::String;

use crate::tag::TypeTag;

/// Convenient type alias for conversion results.
pub type Result<T> = core::result::Result<T, ConvertError>;

/// Why a lexeme could not be converted to its target primitive type.
#[derive(Debug, Clone)]
pub enum ConvertError {
    /// The target tag does not accept a quoted string
    /// (spec.md §4.5: "STRING in this path: always fail").
    StringNotExpected,
    /// The lexeme is not a valid literal for the target tag.
    BadLiteral { tag: TypeTag, lexeme: String },
    /// `processNonStringValueAsJson` could not classify the lexeme at all
    /// (spec.md §4.5 "unrecognized token 'T'").
    UnrecognizedToken { lexeme: String },
    /// The target tag is not a primitive tag `convertValues` can handle.
    UnsupportedType { tag: TypeTag },
}

#[cfg(any(feature = "std", feature = "display"))]
impl core::fmt::Display for ConvertError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConvertError::StringNotExpected => write!(f, "not a string, string expected"),
            ConvertError::BadLiteral { tag, lexeme } => {
                write!(f, "'{lexeme}' is not a valid {tag:?} literal")
            }
            ConvertError::UnrecognizedToken { lexeme } => {
                write!(f, "unrecognized token '{lexeme}'")
            }
            ConvertError::UnsupportedType { tag } => write!(f, "unsupported type '{tag:?}'"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConvertError {}
