//! The state machine's states (spec.md §4.1), grouped the same way the
//! specification groups them.

/// Which of the four lexeme contexts an escape sub-state should resume
/// into once it completes. Collapses what the source treats as eight
/// separate one-off escape states into two states parameterised by this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexemeCtx {
    FieldName,
    StringValue,
    StringFieldValue,
    StringArrayElem,
}

/// Which of the three non-string-lexeme targets a value is bound for
/// (spec.md §4.5 `processNonStringValue(kind)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Field,
    ArrayElement,
    Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    // Structural
    DocStart,
    DocEnd,
    FirstFieldReady,
    NonFirstFieldReady,
    FieldEnd,
    FirstArrayElemReady,
    NonFirstArrayElemReady,
    ArrayElemEnd,
    // Lexeme
    FieldName,
    EndFieldName,
    FieldValueReady,
    StringFieldValue,
    NonStringFieldValue,
    StringArrayElem,
    NonStringArrayElem,
    StringValue,
    NonStringValue,
    // Escape sub-states
    EscapedChar(LexemeCtx),
    UnicodeHex(LexemeCtx),
}

impl State {
    /// The lexeme context a string-lexeme state belongs to, for escape
    /// dispatch (`\` always resumes into the same kind of lexeme it
    /// interrupted).
    #[must_use]
    pub fn string_ctx(self) -> Option<LexemeCtx> {
        match self {
            State::FieldName => Some(LexemeCtx::FieldName),
            State::StringValue => Some(LexemeCtx::StringValue),
            State::StringFieldValue => Some(LexemeCtx::StringFieldValue),
            State::StringArrayElem => Some(LexemeCtx::StringArrayElem),
            _ => None,
        }
    }
}

impl LexemeCtx {
    /// The string-lexeme state this context resumes into after an escape.
    #[must_use]
    pub fn resume_state(self) -> State {
        match self {
            LexemeCtx::FieldName => State::FieldName,
            LexemeCtx::StringValue => State::StringValue,
            LexemeCtx::StringFieldValue => State::StringFieldValue,
            LexemeCtx::StringArrayElem => State::StringArrayElem,
        }
    }
}
