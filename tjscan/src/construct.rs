//! Opening containers (spec.md §4.2), field names (§4.3), and attaching
//! lexed values to the in-progress container (§4.4/§4.5).

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use jschema::{ArrayState, TypeDescriptor, TypeTag, Value};

use crate::error::{ErrorKind, Result};
use crate::json_target::{JSON_ARRAY, JSON_LEAF, JSON_MAP};
use crate::parser::Run;
use crate::stack::Frame;
use crate::state::{State, ValueKind};

impl<'p, 't, C: jschema::TypeConverter> Run<'p, 't, C> {
    /// Opens a `{` or `[`. `is_root` is true exactly once per parse, for
    /// the very first container token (spec.md §4.2 point 1: "if a
    /// current node already exists" is the nested case; the root case
    /// skips the projection step entirely and uses the caller's target
    /// type as-is).
    pub(crate) fn open_container(&mut self, ch: char, is_root: bool) -> Result<()> {
        let mut new_target = if is_root {
            self.stacks.top().target
        } else {
            self.project_target_for_new_frame()?
        };

        if let Some(limit) = self.parser.config.max_depth {
            if self.stacks.depth() + 1 > limit {
                return Err(self.err(ErrorKind::MaxDepthExceeded));
            }
        }

        let mut staged_union: Option<Vec<&'t dyn TypeDescriptor>> = None;
        if new_target.tag() == TypeTag::Union && ch == '{' {
            let mut members = Vec::new();
            flatten_to_map_or_record(new_target, &mut members);
            if members.is_empty() {
                return Err(self.err(ErrorKind::UnionNoMapOrRecord));
            }
            staged_union = Some(members);
            new_target = &JSON_MAP;
        }

        // A `json`-typed position accepts either container shape generically
        // (spec.md's `JSON` tag is open-ended); materialise it as the
        // synthetic map/array rather than falling through to the ordinary
        // "target type is not map/record/array/tuple" errors below.
        if new_target.tag() == TypeTag::Json {
            new_target = if ch == '{' { &JSON_MAP } else { &JSON_ARRAY };
        }

        if !is_root {
            let current = self
                .stacks
                .current
                .take()
                .expect("nested open implies a current container exists");
            self.stacks.ancestors.push(current);
            self.stacks.frames.push(Frame::new(new_target));
        } else {
            self.stacks.top_mut().target = new_target;
        }

        let (value, list_index, next_state) = match new_target.tag() {
            TypeTag::Map => (Value::new_map(), None, State::FirstFieldReady),
            TypeTag::Record => {
                let id = new_target.record_identity();
                (
                    Value::new_record(id.package, id.name),
                    None,
                    State::FirstFieldReady,
                )
            }
            TypeTag::Array if ch == '[' => (Value::new_array(), Some(0), State::FirstArrayElemReady),
            TypeTag::Tuple if ch == '[' => (Value::new_tuple(), Some(0), State::FirstArrayElemReady),
            _ if ch == '{' => return Err(self.err(ErrorKind::NotMapOrRecord)),
            _ => return Err(self.err(ErrorKind::NotArrayOrTuple)),
        };

        let frame = self.stacks.top_mut();
        frame.list_index = list_index;
        frame.possible_types = staged_union;
        self.stacks.current = Some(value);
        self.parser.state = next_state;
        Ok(())
    }

    /// Derives the nested target type from the parent frame's target
    /// (spec.md §4.2 point 1, the ARRAY/TUPLE/MAP/RECORD bullets).
    fn project_target_for_new_frame(&mut self) -> Result<&'t dyn TypeDescriptor> {
        let parent = self.stacks.top();
        match parent.target.tag() {
            TypeTag::Array => {
                let elem = parent.target.array_element().implied();
                self.check_list_capacity()?;
                Ok(elem)
            }
            TypeTag::Tuple => {
                let idx = parent.list_index.expect("tuple frame carries list_index");
                if idx < parent.target.tuple_len() {
                    Ok(parent.target.tuple_element(idx).implied())
                } else if let Some(rest) = parent.target.tuple_rest() {
                    Ok(rest.implied())
                } else {
                    Err(self.err(ErrorKind::TupleSizeExceeded))
                }
            }
            TypeTag::Map => Ok(parent.target.map_element().implied()),
            TypeTag::Record => {
                let field_name = self
                    .stacks
                    .field_names
                    .last()
                    .expect("record value position always has a pending field name")
                    .clone();
                match parent.target.record_field_by_name(&field_name) {
                    Some(f) => Ok(f.field_type.implied()),
                    None => match parent.target.record_rest_field() {
                        Some(rest) => Ok(rest.implied()),
                        None => Err(self.err(ErrorKind::NotMapOrRecord)),
                    },
                }
            }
            TypeTag::Json => Ok(&JSON_LEAF),
            _ => Err(self.err(ErrorKind::NotMapOrRecord)),
        }
    }

    /// Checks a closed array/tuple frame's capacity before placing a
    /// value (container or primitive) at its current index (spec.md
    /// §4.2's overflow check, shared between the container-open
    /// projection path and the primitive-attach path below).
    pub(crate) fn check_list_capacity(&mut self) -> Result<()> {
        let frame = self.stacks.top();
        if frame.target.tag() == TypeTag::Array && frame.target.array_state() == ArrayState::Closed
        {
            let idx = frame.list_index.expect("array frame carries list_index");
            if idx >= frame.target.array_size() {
                return Err(self.err(ErrorKind::ArraySizeNotEnough));
            }
        }
        Ok(())
    }

    /// Validates a field name against the parent target the moment its
    /// closing quote is seen (spec.md §4.3).
    pub(crate) fn validate_field_name(&mut self, name: &str) -> Result<()> {
        let frame = self.stacks.top_mut();
        if let Some(candidates) = frame.possible_types.as_mut() {
            candidates.retain(|m| match m.tag() {
                TypeTag::Map => true,
                TypeTag::Record => {
                    m.record_field_by_name(name).is_some() || !m.record_sealed()
                }
                _ => false,
            });
            if candidates.is_empty() {
                return Err(self.err(ErrorKind::NoEligibleTypes));
            }
            return Ok(());
        }
        match frame.target.tag() {
            TypeTag::Record => {
                if frame.target.record_field_by_name(name).is_none() && frame.target.record_sealed()
                {
                    let record_name = frame.target.record_identity().name;
                    return Err(self.err(ErrorKind::FieldCannotBeAdded {
                        field: String::from(name),
                        record: String::from(record_name),
                    }));
                }
                Ok(())
            }
            TypeTag::Map => Ok(()),
            _ => Ok(()),
        }
    }

    /// Attaches a string lexeme to the enclosing container/root (spec.md
    /// §4.4).
    pub(crate) fn attach_string_value(&mut self, kind: ValueKind) -> Result<State> {
        let lexeme = self.parser.buf.to_string_lossy();
        self.parser.buf.clear();

        match kind {
            ValueKind::Field => {
                let field_name = self
                    .stacks
                    .field_names
                    .pop()
                    .expect("field value attach always has a pending field name");
                let frame = self.stacks.top();
                if frame.possible_types.is_some() {
                    self.put_field(&field_name, Value::Str(lexeme));
                    return Ok(State::FieldEnd);
                }
                match frame.target.tag() {
                    TypeTag::Map => {
                        let elem_tag = frame.target.map_element().tag();
                        if elem_tag != TypeTag::String && elem_tag != TypeTag::Json {
                            return Err(self.err(ErrorKind::MapStringExpected));
                        }
                        self.put_field(&field_name, Value::Str(lexeme));
                    }
                    TypeTag::Record => {
                        let field_tag = match frame.target.record_field_by_name(&field_name) {
                            Some(f) => f.field_type.tag(),
                            None => match frame.target.record_rest_field() {
                                Some(rest) => {
                                    if rest.tag() != TypeTag::String && rest.tag() != TypeTag::Json
                                    {
                                        return Err(
                                            self.err(ErrorKind::RecordRestFieldNotString)
                                        );
                                    }
                                    rest.tag()
                                }
                                None => return Err(self.err(ErrorKind::NotMapOrRecord)),
                            },
                        };
                        if field_tag != TypeTag::String && field_tag != TypeTag::Json {
                            return Err(self.err(ErrorKind::StringExpected));
                        }
                        self.put_field(&field_name, Value::Str(lexeme));
                    }
                    _ => return Err(self.err(ErrorKind::StringExpected)),
                }
                Ok(State::FieldEnd)
            }
            ValueKind::ArrayElement => {
                let frame = self.stacks.top();
                match frame.target.tag() {
                    TypeTag::Array => {
                        let elem_tag = frame.target.array_element().tag();
                        if elem_tag != TypeTag::String && elem_tag != TypeTag::Json {
                            return Err(self.err(ErrorKind::ArrayElementNotString));
                        }
                        self.check_list_capacity()?;
                        self.push_list_value(Value::Str(lexeme));
                    }
                    TypeTag::Tuple => {
                        let idx = frame.list_index.expect("tuple frame carries list_index");
                        let elem_tag = if idx < frame.target.tuple_len() {
                            frame.target.tuple_element(idx).tag()
                        } else if let Some(rest) = frame.target.tuple_rest() {
                            rest.tag()
                        } else {
                            return Err(self.err(ErrorKind::TupleSizeExceeded));
                        };
                        if elem_tag != TypeTag::String && elem_tag != TypeTag::Json {
                            return Err(self.err(ErrorKind::TupleElementNotString));
                        }
                        self.push_list_value(Value::Str(lexeme));
                    }
                    _ => return Err(self.err(ErrorKind::ArrayElementNotString)),
                }
                Ok(State::ArrayElemEnd)
            }
            ValueKind::Value => {
                let target = self.stacks.top().target;
                match target.tag() {
                    TypeTag::String | TypeTag::Json => {
                        self.set_root(Value::Str(lexeme));
                    }
                    TypeTag::Union => {
                        let accepts = (0..target.union_len())
                            .map(|i| target.union_member(i))
                            .any(|m| matches!(m.tag(), TypeTag::String | TypeTag::Json));
                        if !accepts {
                            return Err(self.err(ErrorKind::NoMatchingType));
                        }
                        self.set_root(Value::Str(lexeme));
                    }
                    _ => return Err(self.err(ErrorKind::StringExpected)),
                }
                Ok(State::DocEnd)
            }
        }
    }

    /// Attaches a non-string lexeme to the enclosing container/root
    /// (spec.md §4.5).
    pub(crate) fn attach_nonstring_value(&mut self, kind: ValueKind) -> Result<State> {
        let lexeme = self.parser.buf.to_string_lossy();
        self.parser.buf.clear();

        match kind {
            ValueKind::Field => {
                let field_name = self
                    .stacks
                    .field_names
                    .pop()
                    .expect("field value attach always has a pending field name");
                let frame = self.stacks.top();
                let field_type: &'t dyn TypeDescriptor = if frame.possible_types.is_some() {
                    &JSON_LEAF
                } else {
                    match frame.target.tag() {
                        TypeTag::Map => frame.target.map_element(),
                        TypeTag::Record => match frame.target.record_field_by_name(&field_name) {
                            Some(f) => f.field_type,
                            None => frame
                                .target
                                .record_rest_field()
                                .ok_or_else(|| self.err(ErrorKind::NotMapOrRecord))?,
                        },
                        _ => return Err(self.err(ErrorKind::NotMapOrRecord)),
                    }
                };
                let value = self.convert_value(field_type, &lexeme)?;
                self.put_field(&field_name, value);
                Ok(State::FieldEnd)
            }
            ValueKind::ArrayElement => {
                let frame = self.stacks.top();
                let is_array = frame.target.tag() == TypeTag::Array;
                let elem_type: &'t dyn TypeDescriptor = match frame.target.tag() {
                    TypeTag::Array => frame.target.array_element(),
                    TypeTag::Tuple => {
                        let idx = frame.list_index.expect("tuple frame carries list_index");
                        if idx < frame.target.tuple_len() {
                            frame.target.tuple_element(idx)
                        } else if let Some(rest) = frame.target.tuple_rest() {
                            rest
                        } else {
                            return Err(self.err(ErrorKind::TupleSizeExceeded));
                        }
                    }
                    _ => return Err(self.err(ErrorKind::NotArrayOrTuple)),
                };
                if is_array {
                    self.check_list_capacity()?;
                }
                let value = self.convert_value(elem_type, &lexeme)?;
                self.push_list_value(value);
                Ok(State::ArrayElemEnd)
            }
            ValueKind::Value => {
                let target = self.stacks.top().target;
                let value = if target.tag() == TypeTag::Union {
                    self.try_convert_union_member(target, &lexeme)?
                } else {
                    self.convert_value(target, &lexeme)?
                };
                self.set_root(value);
                Ok(State::DocEnd)
            }
        }
    }

    /// Tries `convertValues(member, lexeme)` for each declared member of a
    /// root-level UNION target in order, first success wins (spec.md §4.5
    /// UNION/VALUE).
    fn try_convert_union_member(
        &self,
        target: &dyn TypeDescriptor,
        lexeme: &str,
    ) -> Result<Value> {
        for i in 0..target.union_len() {
            let member = target.union_member(i);
            if let Ok(value) = self.convert_value(member, lexeme) {
                return Ok(value);
            }
        }
        Err(self.err(ErrorKind::NoMatchingType))
    }

    /// Converts a lexeme against `target`, treating an (explicit or
    /// union-staged) `JSON` target as generic literal inference (spec.md
    /// §4.5 `processNonStringValueAsJson`) rather than a primitive
    /// conversion.
    fn convert_value(&self, target: &dyn TypeDescriptor, lexeme: &str) -> Result<Value> {
        let result = if target.tag() == TypeTag::Json {
            jschema::infer_json_literal(lexeme)
        } else {
            self.parser.converter.convert(target, lexeme)
        };
        result.map_err(|e| self.err(ErrorKind::from(e)))
    }

    pub(crate) fn put_field(&mut self, name: &str, value: Value) {
        self.stacks
            .current
            .as_mut()
            .expect("field attach always has a current container")
            .put_forcefully(name, value);
    }

    pub(crate) fn push_list_value(&mut self, value: Value) {
        let frame = self.stacks.top_mut();
        let idx = frame.list_index.expect("list attach always has a list_index");
        frame.list_index = Some(idx + 1);
        self.stacks
            .current
            .as_mut()
            .expect("list attach always has a current container")
            .add_ref_value(idx, value);
    }

    pub(crate) fn set_root(&mut self, value: Value) {
        self.result = Some(value);
    }
}

/// Recursively expands nested unions and keeps only MAP/RECORD members
/// (spec.md §4.2 "flatten the union... keep only MAP and RECORD
/// members").
fn flatten_to_map_or_record<'t>(
    ty: &'t dyn TypeDescriptor,
    out: &mut Vec<&'t dyn TypeDescriptor>,
) {
    match ty.tag() {
        TypeTag::Union => {
            for i in 0..ty.union_len() {
                flatten_to_map_or_record(ty.union_member(i), out);
            }
        }
        TypeTag::Map | TypeTag::Record => out.push(ty),
        _ => {}
    }
}
