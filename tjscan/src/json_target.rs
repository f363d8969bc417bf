//! Synthetic, `'static` type descriptors used to stage generic JSON:
//! a union opened as an object is staged as a map whose element type is
//! `JSON` (spec.md §4.2 "allocate a generic map value whose declared
//! element type is the open-ended JSON type"), and the same shapes are
//! reused whenever the declared target is `JSON` itself, so that nested
//! objects/arrays under an explicit `json` field still parse structurally
//! instead of being rejected.

use jschema::{ArrayState, TypeDescriptor, TypeTag};

pub struct JsonLeaf;
impl TypeDescriptor for JsonLeaf {
    fn tag(&self) -> TypeTag {
        TypeTag::Json
    }
}

pub struct JsonMap;
impl TypeDescriptor for JsonMap {
    fn tag(&self) -> TypeTag {
        TypeTag::Map
    }
    fn map_element(&self) -> &dyn TypeDescriptor {
        &JSON_LEAF
    }
}

pub struct JsonArray;
impl TypeDescriptor for JsonArray {
    fn tag(&self) -> TypeTag {
        TypeTag::Array
    }
    fn array_element(&self) -> &dyn TypeDescriptor {
        &JSON_LEAF
    }
    fn array_state(&self) -> ArrayState {
        ArrayState::Open
    }
}

pub static JSON_LEAF: JsonLeaf = JsonLeaf;
pub static JSON_MAP: JsonMap = JsonMap;
pub static JSON_ARRAY: JsonArray = JsonArray;
