//! The reusable parser instance (spec.md §5/§6) and the character-driven
//! `step` dispatch (spec.md §4.1).

extern crate alloc;

use alloc::string::String;

use embedded_io::Read;
use jreader::CharReader;
use jschema::{DefaultConverter, TypeConverter, TypeDescriptor, Value};

use crate::config::ParserConfig;
use crate::error::{ErrorKind, ParseError, Result};
use crate::lexer::{HexAccumulator, LexBuf};
use crate::position::Position;
use crate::stack::Stacks;
use crate::state::{LexemeCtx, State, ValueKind};

/// A character read from the input, or the synthesised end-of-stream
/// marker (spec.md §4.1 "the EOF marker is synthesised as character
/// `(char)-1`").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Char(char),
    Eof,
}

/// A reusable, explicitly-reset streaming parser (spec.md §5: "one
/// parser instance per calling thread, cached and reused between
/// parses"). Holds only scratch state that is cheap to keep warm between
/// calls (the lexeme buffer's allocation, the position tracker); the
/// construction stacks are always empty between calls, so they are
/// rebuilt fresh per [`Parser::parse`] call instead of being stored here.
pub struct Parser<C: TypeConverter = DefaultConverter> {
    pub(crate) state: State,
    pub(crate) pos: Position,
    pub(crate) buf: LexBuf,
    pub(crate) hex: HexAccumulator,
    pub(crate) quote_char: Option<char>,
    pub(crate) config: ParserConfig,
    pub(crate) converter: C,
}

impl Parser<DefaultConverter> {
    #[must_use]
    pub fn new(config: ParserConfig) -> Self {
        Self::with_converter(config, DefaultConverter)
    }
}

impl Default for Parser<DefaultConverter> {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

impl<C: TypeConverter> Parser<C> {
    #[must_use]
    pub fn with_converter(config: ParserConfig, converter: C) -> Self {
        let cap = config.initial_buffer_capacity;
        Self {
            state: State::DocStart,
            pos: Position::new(),
            buf: LexBuf::with_capacity(cap),
            hex: HexAccumulator::new(),
            quote_char: None,
            config,
            converter,
        }
    }

    /// Clears per-parse state so that a failed or successful parse never
    /// leaks into the next one (spec.md §5/§7, "per-call state is
    /// discarded via `reset()` in a guaranteed-release fashion regardless
    /// of success or failure").
    pub fn reset(&mut self) {
        self.state = State::DocStart;
        self.pos = Position::new();
        self.buf.clear();
        self.hex.reset();
        self.quote_char = None;
    }

    /// Parses a byte stream read through `reader` against `target`.
    ///
    /// # Errors
    /// Returns `ParseError` on any syntactic, lexical, or type-directed
    /// failure; the instance is reset regardless of outcome.
    pub fn parse<'t, R: Read>(
        &mut self,
        reader: &mut R,
        target: &'t dyn TypeDescriptor,
    ) -> Result<Value> {
        self.reset();
        let outcome = self.parse_inner(reader, target);
        self.reset();
        outcome
    }

    fn parse_inner<'t, R: Read>(
        &mut self,
        reader: &mut R,
        target: &'t dyn TypeDescriptor,
    ) -> Result<Value> {
        let mut char_reader = CharReader::new(reader);
        let mut run = Run {
            parser: self,
            stacks: Stacks::new(target),
            result: None,
        };
        loop {
            let input = match char_reader
                .next_char()
                .map_err(|e| run.parser.err(ErrorKind::Reader(e)))?
            {
                Some(ch) => Input::Char(ch),
                None => Input::Eof,
            };
            let finished = run.step(input)?;
            if let Input::Char(ch) = input {
                run.parser.pos.advance(ch);
            }
            if finished {
                break;
            }
        }
        run.result
            .ok_or_else(|| run.parser.err(ErrorKind::ValueCannotBeConstructed))
    }

    pub(crate) fn err(&self, kind: ErrorKind) -> ParseError {
        ParseError {
            kind,
            line: self.pos.line,
            column: self.pos.column,
        }
    }
}

/// Parses a string directly, without going through a byte reader
/// (spec.md §6, the string convenience overload).
///
/// # Errors
/// See [`Parser::parse`].
pub fn parse_str(
    input: &str,
    target: &dyn TypeDescriptor,
    config: ParserConfig,
) -> Result<Value> {
    let mut parser = Parser::new(config);
    let mut cursor = embedded_io_adapters_stub::SliceCursor::new(input.as_bytes());
    parser.parse(&mut cursor, target)
}

/// Parses a byte stream read through `reader` against `target` using a
/// fresh, default-configured parser instance (spec.md §6 `parse(reader,
/// targetType)`). Prefer [`Parser::parse`] directly when parsing more
/// than once, to reuse the lexeme buffer's allocation.
///
/// # Errors
/// See [`Parser::parse`].
pub fn parse<R: Read>(
    reader: &mut R,
    target: &dyn TypeDescriptor,
    config: ParserConfig,
) -> Result<Value> {
    Parser::new(config).parse(reader, target)
}

/// One in-progress parse: the reusable [`Parser`]'s scratch state plus
/// the construction stacks scoped to this call's target-type lifetime.
pub(crate) struct Run<'p, 't, C: TypeConverter> {
    pub(crate) parser: &'p mut Parser<C>,
    pub(crate) stacks: Stacks<'t>,
    pub(crate) result: Option<Value>,
}

impl<'p, 't, C: TypeConverter> Run<'p, 't, C> {
    fn err(&self, kind: ErrorKind) -> ParseError {
        self.parser.err(kind)
    }

    fn is_quote_open(&self, ch: char) -> Option<char> {
        if ch == '"' {
            Some('"')
        } else if !self.parser.config.strict_quote_chars && (ch == '\'' || ch == '`') {
            Some(ch)
        } else {
            None
        }
    }

    /// Advances the state machine by one character (or the synthesised
    /// EOF). Returns `Ok(true)` once the parse has reached its one
    /// terminal transition.
    pub(crate) fn step(&mut self, input: Input) -> Result<bool> {
        use State::{
            ArrayElemEnd, DocEnd, DocStart, EndFieldName, EscapedChar, FieldEnd, FieldName,
            FieldValueReady, FirstArrayElemReady, FirstFieldReady, NonFirstArrayElemReady,
            NonFirstFieldReady, NonStringArrayElem, NonStringFieldValue, NonStringValue,
            StringArrayElem, StringFieldValue, StringValue, UnicodeHex,
        };

        match self.parser.state {
            DocStart => self.step_doc_start(input),
            FirstFieldReady => self.step_field_ready(input, true),
            NonFirstFieldReady => self.step_field_ready(input, false),
            FieldEnd => self.step_field_end(input),
            FirstArrayElemReady => self.step_array_elem_ready(input, true),
            NonFirstArrayElemReady => self.step_array_elem_ready(input, false),
            ArrayElemEnd => self.step_array_elem_end(input),
            FieldName | StringValue | StringFieldValue | StringArrayElem => {
                self.step_string_lexeme(input)
            }
            EndFieldName => self.step_end_field_name(input),
            FieldValueReady => self.step_field_value_ready(input),
            NonStringFieldValue => self.step_nonstring_lexeme(input, ValueKind::Field),
            NonStringArrayElem => self.step_nonstring_lexeme(input, ValueKind::ArrayElement),
            NonStringValue => self.step_nonstring_lexeme(input, ValueKind::Value),
            EscapedChar(ctx) => self.step_escaped_char(input, ctx),
            UnicodeHex(ctx) => self.step_unicode_hex(input, ctx),
            DocEnd => self.step_doc_end(input),
        }
    }

    fn step_doc_start(&mut self, input: Input) -> Result<bool> {
        let ch = match input {
            Input::Eof => return Err(self.err(ErrorKind::EmptyDocument)),
            Input::Char(c) => c,
        };
        if is_ws(ch) {
            return Ok(false);
        }
        if ch == '{' || ch == '[' {
            self.open_container(ch, true)?;
            return Ok(false);
        }
        if let Some(q) = self.is_quote_open(ch) {
            self.parser.quote_char = Some(q);
            self.parser.buf.clear();
            self.parser.state = State::StringValue;
            return Ok(false);
        }
        self.parser.buf.clear();
        self.parser.buf.push_char(ch);
        self.parser.state = State::NonStringValue;
        Ok(false)
    }

    fn step_doc_end(&mut self, input: Input) -> Result<bool> {
        match input {
            Input::Eof => Ok(true),
            Input::Char(c) if is_ws(c) => Ok(false),
            Input::Char(_) => Err(self.err(ErrorKind::DocumentAlreadyEnded)),
        }
    }

    fn step_field_ready(&mut self, input: Input, is_first: bool) -> Result<bool> {
        let ch = match input {
            Input::Eof => return Err(self.err(ErrorKind::UnexpectedEof)),
            Input::Char(c) => c,
        };
        if is_ws(ch) {
            return Ok(false);
        }
        if is_first && ch == '}' {
            return self.close_container();
        }
        if let Some(q) = self.is_quote_open(ch) {
            self.parser.quote_char = Some(q);
            self.parser.buf.clear();
            self.parser.state = State::FieldName;
            return Ok(false);
        }
        Err(self.err(ErrorKind::ExpectedOneOf(if is_first {
            &['"', '}']
        } else {
            &['"']
        })))
    }

    fn step_field_end(&mut self, input: Input) -> Result<bool> {
        let ch = match input {
            Input::Eof => return Err(self.err(ErrorKind::UnexpectedEof)),
            Input::Char(c) => c,
        };
        if is_ws(ch) {
            return Ok(false);
        }
        match ch {
            ',' => {
                self.parser.state = State::NonFirstFieldReady;
                Ok(false)
            }
            '}' => self.close_container(),
            _ => Err(self.err(ErrorKind::ExpectedOneOf(&[',', '}']))),
        }
    }

    fn step_array_elem_ready(&mut self, input: Input, is_first: bool) -> Result<bool> {
        let ch = match input {
            Input::Eof => return Err(self.err(ErrorKind::UnexpectedEof)),
            Input::Char(c) => c,
        };
        if is_ws(ch) {
            return Ok(false);
        }
        if is_first && ch == ']' {
            return self.close_container();
        }
        if ch == '{' || ch == '[' {
            self.open_container(ch, false)?;
            return Ok(false);
        }
        if let Some(q) = self.is_quote_open(ch) {
            self.parser.quote_char = Some(q);
            self.parser.buf.clear();
            self.parser.state = State::StringArrayElem;
            return Ok(false);
        }
        self.parser.buf.clear();
        self.parser.buf.push_char(ch);
        self.parser.state = State::NonStringArrayElem;
        Ok(false)
    }

    fn step_array_elem_end(&mut self, input: Input) -> Result<bool> {
        let ch = match input {
            Input::Eof => return Err(self.err(ErrorKind::UnexpectedEof)),
            Input::Char(c) => c,
        };
        if is_ws(ch) {
            return Ok(false);
        }
        match ch {
            ',' => {
                self.parser.state = State::NonFirstArrayElemReady;
                Ok(false)
            }
            ']' => self.close_container(),
            _ => Err(self.err(ErrorKind::ExpectedOneOf(&[',', ']']))),
        }
    }

    fn step_end_field_name(&mut self, input: Input) -> Result<bool> {
        let ch = match input {
            Input::Eof => return Err(self.err(ErrorKind::UnexpectedEof)),
            Input::Char(c) => c,
        };
        if is_ws(ch) {
            return Ok(false);
        }
        if ch == ':' {
            self.parser.state = State::FieldValueReady;
            return Ok(false);
        }
        Err(self.err(ErrorKind::ExpectedOneOf(&[':'])))
    }

    fn step_field_value_ready(&mut self, input: Input) -> Result<bool> {
        let ch = match input {
            Input::Eof => return Err(self.err(ErrorKind::UnexpectedEof)),
            Input::Char(c) => c,
        };
        if is_ws(ch) {
            return Ok(false);
        }
        if ch == '{' || ch == '[' {
            self.open_container(ch, false)?;
            return Ok(false);
        }
        if let Some(q) = self.is_quote_open(ch) {
            self.parser.quote_char = Some(q);
            self.parser.buf.clear();
            self.parser.state = State::StringFieldValue;
            return Ok(false);
        }
        self.parser.buf.clear();
        self.parser.buf.push_char(ch);
        self.parser.state = State::NonStringFieldValue;
        Ok(false)
    }

    fn step_string_lexeme(&mut self, input: Input) -> Result<bool> {
        let ch = match input {
            Input::Eof => return Err(self.err(ErrorKind::UnexpectedEof)),
            Input::Char(c) => c,
        };
        let ctx = self
            .parser
            .state
            .string_ctx()
            .expect("step_string_lexeme only entered from a string-lexeme state");
        if Some(ch) == self.parser.quote_char {
            return self.finish_string_lexeme(ctx);
        }
        if ch == '\\' {
            self.parser.state = State::EscapedChar(ctx);
            return Ok(false);
        }
        self.parser.buf.push_char(ch);
        Ok(false)
    }

    fn step_escaped_char(&mut self, input: Input, ctx: LexemeCtx) -> Result<bool> {
        let ch = match input {
            Input::Eof => return Err(self.err(ErrorKind::UnexpectedEof)),
            Input::Char(c) => c,
        };
        let literal = match ch {
            '"' => Some('"'),
            '\\' => Some('\\'),
            '/' => Some('/'),
            'b' => Some('\u{8}'),
            'f' => Some('\u{c}'),
            'n' => Some('\n'),
            'r' => Some('\r'),
            't' => Some('\t'),
            'u' => None,
            _ => return Err(self.err(ErrorKind::ExpectedEscapedChar)),
        };
        match literal {
            Some(c) => {
                self.parser.buf.push_char(c);
                self.parser.state = ctx.resume_state();
            }
            None => {
                self.parser.hex.reset();
                self.parser.state = State::UnicodeHex(ctx);
            }
        }
        Ok(false)
    }

    fn step_unicode_hex(&mut self, input: Input, ctx: LexemeCtx) -> Result<bool> {
        let ch = match input {
            Input::Eof => return Err(self.err(ErrorKind::UnexpectedEof)),
            Input::Char(c) => c,
        };
        match self.parser.hex.push_digit(ch) {
            Err(()) => Err(self.err(ErrorKind::ExpectedHexDigit)),
            Ok(None) => Ok(false),
            Ok(Some(unit)) => {
                self.parser.buf.push_unit(unit);
                self.parser.state = ctx.resume_state();
                Ok(false)
            }
        }
    }

    fn step_nonstring_lexeme(&mut self, input: Input, kind: ValueKind) -> Result<bool> {
        let is_terminator = match input {
            Input::Eof => true,
            Input::Char(c) => is_ws(c) || matches!(c, ',' | '}' | ']'),
        };
        if !is_terminator {
            if let Input::Char(c) = input {
                self.parser.buf.push_char(c);
            }
            return Ok(false);
        }
        self.finish_nonstring_lexeme(kind)?;
        // The terminator is not consumed by the lexeme state: re-dispatch
        // it against whichever state finishing the lexeme just landed on.
        self.step(input)
    }
}

fn is_ws(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}

// A minimal `embedded_io::Read` cursor over a byte slice, for
// `parse_str`, since `jreader`/`embedded-io` have no built-in slice
// reader outside the `std`-gated adapters crate.
pub(crate) mod embedded_io_adapters_stub {
    pub struct SliceCursor<'a> {
        bytes: &'a [u8],
        pos: usize,
    }

    impl<'a> SliceCursor<'a> {
        #[must_use]
        pub fn new(bytes: &'a [u8]) -> Self {
            Self { bytes, pos: 0 }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Infallible;

    impl embedded_io::Error for Infallible {
        fn kind(&self) -> embedded_io::ErrorKind {
            embedded_io::ErrorKind::Other
        }
    }

    impl embedded_io::ErrorType for SliceCursor<'_> {
        type Error = Infallible;
    }

    impl embedded_io::Read for SliceCursor<'_> {
        fn read(&mut self, buf: &mut [u8]) -> core::result::Result<usize, Self::Error> {
            let remaining = &self.bytes[self.pos..];
            let n = remaining.len().min(buf.len());
            buf[..n].copy_from_slice(&remaining[..n]);
            self.pos += n;
            Ok(n)
        }
    }
}
