//! Type-descriptor, value, and conversion interfaces that the core parser
//! in `tjscan` is generic over (spec.md §3, §6).

#![cfg_attr(not(feature = "std"), no_std)]

pub mod convert;
pub mod error;
pub mod tag;
pub mod type_desc;
pub mod value;

pub use convert::{convert_primitive, infer_json_literal, DefaultConverter, TypeConverter};
pub use error::{ConvertError, Result};
pub use tag::TypeTag;
pub use type_desc::{
    ArrayState, FieldDescriptor, RecordIdentity, RecordType, ArrayType, TupleType, Type,
    TypeDescriptor, TypeDescriptorExt,
};
pub use value::{ListShaped, MapShaped, Value};
