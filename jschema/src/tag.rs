//! The closed set of type tags a `TypeDescriptor` can report (spec.md §3).

/// The kind of shape a type descriptor describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// Arbitrary-precision signed integer.
    Int,
    /// Fixed-width signed integers.
    Signed8,
    Signed16,
    Signed32,
    /// Fixed-width unsigned integers.
    Unsigned8,
    Unsigned16,
    Unsigned32,
    /// A single byte, parsed the same way as the `Int` family (spec.md §4.5).
    Byte,
    /// Binary-64 floating point.
    Float,
    /// Arbitrary-precision decimal.
    Decimal,
    /// UTF-8 text, only ever produced from a quoted lexeme.
    String,
    Boolean,
    Null,
    Map,
    Record,
    Array,
    Tuple,
    Union,
    /// The open-ended "any JSON value" type used as a staging area for
    /// union branches and as a first-class target in its own right.
    Json,
}

impl TypeTag {
    /// Whether this tag names one of the scalar lexeme targets handled by
    /// `spec.md` §4.5's primitive rules (everything except the container
    /// tags `Map`/`Record`/`Array`/`Tuple`/`Union`/`Json`).
    #[must_use]
    pub fn is_primitive(self) -> bool {
        !matches!(
            self,
            TypeTag::Map
                | TypeTag::Record
                | TypeTag::Array
                | TypeTag::Tuple
                | TypeTag::Union
                | TypeTag::Json
        )
    }
}
