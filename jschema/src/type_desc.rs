//! The type-descriptor library interface (spec.md §3/§6), and a reference
//! implementation (`Type`) sufficient to exercise the core end to end.

extern crate alloc;

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::tag::TypeTag;

/// Whether an array type accepts more elements than its declared size, or
/// rejects them (spec.md glossary: "Closed array").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayState {
    Open,
    Closed,
}

/// The package+name identity of a record type, used to ask the external
/// system for its field defaults (spec.md §6,
/// "`createRecordValueWithDefaultValues`").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordIdentity<'a> {
    pub package: &'a str,
    pub name: &'a str,
}

/// One entry of a record type's `field name -> {type, required?}` mapping
/// (spec.md §3), returned by value from `TypeDescriptor::record_field` so
/// that trait objects never need to hand back a borrowed slice of
/// themselves.
pub struct FieldDescriptor<'a> {
    pub name: &'a str,
    pub field_type: &'a dyn TypeDescriptor,
    pub required: bool,
}

/// The capabilities the core requires of a target type (spec.md §3).
///
/// Every list-shaped property (record fields, tuple elements, union
/// members) is exposed index-by-index rather than as a borrowed slice of
/// trait objects, so that implementors never have to pre-materialise and
/// cache a slice of `&dyn TypeDescriptor` alongside themselves. Accessors
/// are allowed to panic on a tag mismatch rather than return `Option` —
/// the core never calls one without first checking `tag()`.
pub trait TypeDescriptor {
    /// The tag identifying this type's shape.
    fn tag(&self) -> TypeTag;

    /// `MAP`'s constrained element type.
    fn map_element(&self) -> &dyn TypeDescriptor {
        panic!("map_element() called on a non-MAP type")
    }

    /// Number of fields `RECORD` declares.
    fn record_field_count(&self) -> usize {
        0
    }

    /// The `index`-th declared field of `RECORD`, in declaration order.
    fn record_field(&self, index: usize) -> FieldDescriptor<'_> {
        let _ = index;
        panic!("record_field() called on a non-RECORD type or out of range")
    }

    /// Looks up a declared field of `RECORD` by name.
    fn record_field_by_name(&self, name: &str) -> Option<FieldDescriptor<'_>> {
        (0..self.record_field_count())
            .map(|i| self.record_field(i))
            .find(|f| f.name == name)
    }

    /// `RECORD`'s rest-field type, if any.
    fn record_rest_field(&self) -> Option<&dyn TypeDescriptor> {
        None
    }

    /// Whether `RECORD` forbids fields outside its declared set.
    fn record_sealed(&self) -> bool {
        false
    }

    /// Whether a materialised `RECORD` value must be frozen after
    /// construction.
    fn record_readonly(&self) -> bool {
        false
    }

    /// `RECORD`'s package+name identity.
    fn record_identity(&self) -> RecordIdentity<'_> {
        panic!("record_identity() called on a non-RECORD type")
    }

    /// `ARRAY`'s element type.
    fn array_element(&self) -> &dyn TypeDescriptor {
        panic!("array_element() called on a non-ARRAY type")
    }

    /// `ARRAY`'s declared size (only meaningful when `array_state() ==
    /// Closed`).
    fn array_size(&self) -> usize {
        0
    }

    /// Whether `ARRAY` is size-constrained.
    fn array_state(&self) -> ArrayState {
        ArrayState::Open
    }

    /// Whether a closed `ARRAY` has a filler value for unsupplied indices.
    fn array_has_filler(&self) -> bool {
        false
    }

    /// Number of elements `TUPLE` declares.
    fn tuple_len(&self) -> usize {
        0
    }

    /// The `index`-th declared element type of `TUPLE`.
    fn tuple_element(&self, index: usize) -> &dyn TypeDescriptor {
        let _ = index;
        panic!("tuple_element() called on a non-TUPLE type or out of range")
    }

    /// `TUPLE`'s rest type, used for indices beyond its declared length.
    fn tuple_rest(&self) -> Option<&dyn TypeDescriptor> {
        None
    }

    /// Number of member types `UNION` declares.
    fn union_len(&self) -> usize {
        0
    }

    /// The `index`-th declared member type of `UNION`, in declaration
    /// order (declaration order is significant: spec.md §4.5 "try
    /// `convertValues(member, lexeme)` for each member in declared order;
    /// first success wins").
    fn union_member(&self, index: usize) -> &dyn TypeDescriptor {
        let _ = index;
        panic!("union_member() called on a non-UNION type or out of range")
    }

    /// Strips references/intersections to a canonical form
    /// (`impliedType(T)`, spec.md §3). The reference implementation has no
    /// references or intersections, so this is the identity function;
    /// callers bridging to a type system with aliases should resolve them
    /// here.
    fn implied(&self) -> &dyn TypeDescriptor {
        self
    }
}

/// Convenience iteration helpers layered over the index-based trait
/// accessors. Not part of the object-safe core trait.
pub trait TypeDescriptorExt: TypeDescriptor {
    fn record_fields(&self) -> RecordFieldIter<'_, Self>
    where
        Self: Sized,
    {
        RecordFieldIter {
            desc: self,
            next: 0,
        }
    }

    fn tuple_elements(&self) -> IndexIter<'_, Self, TupleElem>
    where
        Self: Sized,
    {
        IndexIter::new(self, self.tuple_len())
    }

    fn union_members(&self) -> IndexIter<'_, Self, UnionMember>
    where
        Self: Sized,
    {
        IndexIter::new(self, self.union_len())
    }
}

impl<T: TypeDescriptor + ?Sized> TypeDescriptorExt for T {}

pub struct RecordFieldIter<'a, T: ?Sized> {
    desc: &'a T,
    next: usize,
}

impl<'a, T: TypeDescriptor + ?Sized> Iterator for RecordFieldIter<'a, T> {
    type Item = FieldDescriptor<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.desc.record_field_count() {
            return None;
        }
        let field = self.desc.record_field(self.next);
        self.next += 1;
        Some(field)
    }
}

pub struct TupleElem;
pub struct UnionMember;

pub trait IndexKind {
    fn get<'a, T: TypeDescriptor + ?Sized>(desc: &'a T, index: usize) -> &'a dyn TypeDescriptor;
}

impl IndexKind for TupleElem {
    fn get<'a, T: TypeDescriptor + ?Sized>(desc: &'a T, index: usize) -> &'a dyn TypeDescriptor {
        desc.tuple_element(index)
    }
}

impl IndexKind for UnionMember {
    fn get<'a, T: TypeDescriptor + ?Sized>(desc: &'a T, index: usize) -> &'a dyn TypeDescriptor {
        desc.union_member(index)
    }
}

pub struct IndexIter<'a, T: ?Sized, K> {
    desc: &'a T,
    next: usize,
    len: usize,
    _kind: core::marker::PhantomData<K>,
}

impl<'a, T: TypeDescriptor + ?Sized, K: IndexKind> IndexIter<'a, T, K> {
    fn new(desc: &'a T, len: usize) -> Self {
        Self {
            desc,
            next: 0,
            len,
            _kind: core::marker::PhantomData,
        }
    }
}

impl<'a, T: TypeDescriptor + ?Sized, K: IndexKind> Iterator for IndexIter<'a, T, K> {
    type Item = &'a dyn TypeDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.len {
            return None;
        }
        let item = K::get(self.desc, self.next);
        self.next += 1;
        Some(item)
    }
}

/// A reference `TypeDescriptor` implementation, owning its own nested
/// types. Not meant to be a production type system — just enough to
/// construct the target types used in tests and in `spec.md` §8's scenario
/// table.
pub enum Type {
    Int,
    Signed8,
    Signed16,
    Signed32,
    Unsigned8,
    Unsigned16,
    Unsigned32,
    Byte,
    Float,
    Decimal,
    String,
    Boolean,
    Null,
    Json,
    Map(Box<Type>),
    Record(RecordType),
    Array(ArrayType),
    Tuple(TupleType),
    Union(Vec<Type>),
}

pub struct RecordType {
    pub package: String,
    pub name: String,
    pub fields: Vec<(String, Type, bool)>,
    pub rest_field: Option<Box<Type>>,
    pub sealed: bool,
    pub readonly: bool,
}

pub struct ArrayType {
    pub element: Box<Type>,
    pub size: usize,
    pub state: ArrayState,
    pub has_filler: bool,
}

pub struct TupleType {
    pub elements: Vec<Type>,
    pub rest: Option<Box<Type>>,
}

impl Type {
    #[must_use]
    pub fn record(record: RecordType) -> Self {
        Type::Record(record)
    }

    #[must_use]
    pub fn array(element: Type, size: usize, state: ArrayState, has_filler: bool) -> Self {
        Type::Array(ArrayType {
            element: Box::new(element),
            size,
            state,
            has_filler,
        })
    }

    #[must_use]
    pub fn tuple(elements: Vec<Type>, rest: Option<Type>) -> Self {
        Type::Tuple(TupleType {
            elements,
            rest: rest.map(Box::new),
        })
    }
}

impl RecordType {
    #[must_use]
    pub fn new(
        package: impl Into<String>,
        name: impl Into<String>,
        fields: Vec<(String, Type, bool)>,
        rest_field: Option<Type>,
        sealed: bool,
        readonly: bool,
    ) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
            fields,
            rest_field: rest_field.map(Box::new),
            sealed,
            readonly,
        }
    }
}

impl TypeDescriptor for Type {
    fn tag(&self) -> TypeTag {
        match self {
            Type::Int => TypeTag::Int,
            Type::Signed8 => TypeTag::Signed8,
            Type::Signed16 => TypeTag::Signed16,
            Type::Signed32 => TypeTag::Signed32,
            Type::Unsigned8 => TypeTag::Unsigned8,
            Type::Unsigned16 => TypeTag::Unsigned16,
            Type::Unsigned32 => TypeTag::Unsigned32,
            Type::Byte => TypeTag::Byte,
            Type::Float => TypeTag::Float,
            Type::Decimal => TypeTag::Decimal,
            Type::String => TypeTag::String,
            Type::Boolean => TypeTag::Boolean,
            Type::Null => TypeTag::Null,
            Type::Json => TypeTag::Json,
            Type::Map(_) => TypeTag::Map,
            Type::Record(_) => TypeTag::Record,
            Type::Array(_) => TypeTag::Array,
            Type::Tuple(_) => TypeTag::Tuple,
            Type::Union(_) => TypeTag::Union,
        }
    }

    fn map_element(&self) -> &dyn TypeDescriptor {
        match self {
            Type::Map(elem) => elem.as_ref(),
            _ => panic!("map_element() called on a non-MAP type"),
        }
    }

    fn record_field_count(&self) -> usize {
        match self {
            Type::Record(r) => r.fields.len(),
            _ => 0,
        }
    }

    fn record_field(&self, index: usize) -> FieldDescriptor<'_> {
        match self {
            Type::Record(r) => {
                let (name, ty, required) = &r.fields[index];
                FieldDescriptor {
                    name,
                    field_type: ty,
                    required: *required,
                }
            }
            _ => panic!("record_field() called on a non-RECORD type"),
        }
    }

    fn record_rest_field(&self) -> Option<&dyn TypeDescriptor> {
        match self {
            Type::Record(r) => r.rest_field.as_deref().map(|t| t as &dyn TypeDescriptor),
            _ => None,
        }
    }

    fn record_sealed(&self) -> bool {
        matches!(self, Type::Record(r) if r.sealed)
    }

    fn record_readonly(&self) -> bool {
        matches!(self, Type::Record(r) if r.readonly)
    }

    fn record_identity(&self) -> RecordIdentity<'_> {
        match self {
            Type::Record(r) => RecordIdentity {
                package: &r.package,
                name: &r.name,
            },
            _ => panic!("record_identity() called on a non-RECORD type"),
        }
    }

    fn array_element(&self) -> &dyn TypeDescriptor {
        match self {
            Type::Array(a) => a.element.as_ref(),
            _ => panic!("array_element() called on a non-ARRAY type"),
        }
    }

    fn array_size(&self) -> usize {
        match self {
            Type::Array(a) => a.size,
            _ => 0,
        }
    }

    fn array_state(&self) -> ArrayState {
        match self {
            Type::Array(a) => a.state,
            _ => ArrayState::Open,
        }
    }

    fn array_has_filler(&self) -> bool {
        matches!(self, Type::Array(a) if a.has_filler)
    }

    fn tuple_len(&self) -> usize {
        match self {
            Type::Tuple(t) => t.elements.len(),
            _ => 0,
        }
    }

    fn tuple_element(&self, index: usize) -> &dyn TypeDescriptor {
        match self {
            Type::Tuple(t) => &t.elements[index],
            _ => panic!("tuple_element() called on a non-TUPLE type"),
        }
    }

    fn tuple_rest(&self) -> Option<&dyn TypeDescriptor> {
        match self {
            Type::Tuple(t) => t.rest.as_deref().map(|t| t as &dyn TypeDescriptor),
            _ => None,
        }
    }

    fn union_len(&self) -> usize {
        match self {
            Type::Union(members) => members.len(),
            _ => 0,
        }
    }

    fn union_member(&self, index: usize) -> &dyn TypeDescriptor {
        match self {
            Type::Union(members) => &members[index],
            _ => panic!("union_member() called on a non-UNION type"),
        }
    }

    fn implied(&self) -> &dyn TypeDescriptor {
        self
    }
}
