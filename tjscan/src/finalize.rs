//! Finalising a closed container (spec.md §4.7): record defaults and
//! read-only freezing, closed-array filler insertion, tuple arity, and
//! union-staging commit-by-attempt.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use jschema::{ArrayState, TypeDescriptor, TypeTag, Value};

use crate::error::{ErrorKind, Result};
use crate::parser::Run;
use crate::state::{LexemeCtx, State, ValueKind};

impl<'p, 't, C: jschema::TypeConverter> Run<'p, 't, C> {
    /// Dispatches a closing quote on a string lexeme: for a field name
    /// this validates and stashes it (spec.md §4.3); for a value lexeme
    /// it attaches the decoded string (§4.4).
    pub(crate) fn finish_string_lexeme(&mut self, ctx: LexemeCtx) -> Result<bool> {
        match ctx {
            LexemeCtx::FieldName => {
                let name = self.parser.buf.to_string_lossy();
                self.parser.buf.clear();
                self.validate_field_name(&name)?;
                self.stacks.field_names.push(name);
                self.parser.state = State::EndFieldName;
                Ok(false)
            }
            LexemeCtx::StringValue => {
                self.parser.state = self.attach_string_value(ValueKind::Value)?;
                Ok(false)
            }
            LexemeCtx::StringFieldValue => {
                self.parser.state = self.attach_string_value(ValueKind::Field)?;
                Ok(false)
            }
            LexemeCtx::StringArrayElem => {
                self.parser.state = self.attach_string_value(ValueKind::ArrayElement)?;
                Ok(false)
            }
        }
    }

    /// A non-string lexeme hit its terminator: convert and attach it
    /// (spec.md §4.5).
    pub(crate) fn finish_nonstring_lexeme(&mut self, kind: ValueKind) -> Result<()> {
        self.parser.state = self.attach_nonstring_value(kind)?;
        Ok(())
    }

    /// Finalises the frame on top of the stack (spec.md §4.7), then
    /// either produces the root value or attaches the finished child to
    /// its parent and resumes the parent's post-value state.
    pub(crate) fn close_container(&mut self) -> Result<bool> {
        let is_root = self.stacks.depth() == 0;
        let target = self.stacks.top().target;
        let list_index = self.stacks.top().list_index;
        let possible_types = self.stacks.top_mut().possible_types.take();

        let mut value = self
            .stacks
            .current
            .take()
            .expect("close_container always has a current container");

        match target.tag() {
            TypeTag::Record => self.finalize_record(target, &mut value)?,
            TypeTag::Map => {}
            TypeTag::Array => self.finalize_array(target, list_index.unwrap_or(0), &mut value)?,
            TypeTag::Tuple => self.finalize_tuple(target, list_index.unwrap_or(0))?,
            _ => {}
        }

        if let Some(candidates) = possible_types {
            value = self.commit_union(&candidates, value)?;
        }

        if is_root {
            self.result = Some(value);
            self.parser.state = State::DocEnd;
            return Ok(false);
        }

        self.stacks.frames.pop();
        let mut parent = self
            .stacks
            .ancestors
            .pop()
            .expect("nested close always has a parent ancestor");
        self.attach_finalized_child(&mut parent, value);
        self.stacks.current = Some(parent);

        let next_state = if self.stacks.top().list_index.is_some() {
            State::ArrayElemEnd
        } else {
            State::FieldEnd
        };
        self.parser.state = next_state;
        Ok(false)
    }

    fn attach_finalized_child(&mut self, parent: &mut Value, value: Value) {
        if self.stacks.top().list_index.is_some() {
            self.push_list_value_into(parent, value);
        } else {
            let field_name = self
                .stacks
                .field_names
                .pop()
                .expect("closing a record/map-nested value always has a pending field name");
            parent.put_forcefully(&field_name, value);
        }
    }

    fn push_list_value_into(&mut self, parent: &mut Value, value: Value) {
        let frame = self.stacks.top_mut();
        let idx = frame.list_index.expect("list attach always has a list_index");
        frame.list_index = Some(idx + 1);
        parent.add_ref_value(idx, value);
    }

    fn finalize_record(&mut self, target: &dyn TypeDescriptor, value: &mut Value) -> Result<()> {
        let identity = target.record_identity();
        let mut defaults: Vec<(String, Value)> = Vec::new();
        for i in 0..target.record_field_count() {
            let field = target.record_field(i);
            let present = value
                .as_map()
                .expect("record finalize always holds a map-shaped value")
                .contains_key(field.name);
            if present {
                continue;
            }
            if field.required {
                return Err(self.err(ErrorKind::MissingRequiredField {
                    field: String::from(field.name),
                    record: String::from(identity.name),
                }));
            }
            let default = self
                .parser
                .converter
                .default_for_record_field(identity, field.name, field.field_type);
            defaults.push((String::from(field.name), default));
        }
        for (name, default_value) in defaults {
            value.put_forcefully(&name, default_value);
        }
        if target.record_readonly() {
            value.freeze();
        }
        Ok(())
    }

    fn finalize_array(
        &mut self,
        target: &dyn TypeDescriptor,
        supplied: usize,
        value: &mut Value,
    ) -> Result<()> {
        if target.array_state() != ArrayState::Closed {
            return Ok(());
        }
        let size = target.array_size();
        if supplied >= size {
            return Ok(());
        }
        if !target.array_has_filler() {
            return Err(self.err(ErrorKind::ArrayNoFillerValue));
        }
        let filler = self.parser.converter.filler_value(target.array_element());
        for idx in supplied..size {
            value.add_ref_value(idx, filler.clone());
        }
        Ok(())
    }

    fn finalize_tuple(&mut self, target: &dyn TypeDescriptor, supplied: usize) -> Result<()> {
        if target.tuple_len() > supplied {
            return Err(self.err(ErrorKind::TupleTooFewElements));
        }
        Ok(())
    }

    /// Tries each surviving union candidate in declared order, committing
    /// to the first whose staged value recursively coerces into its
    /// declared shape (spec.md §4.7 "UNION staging"). The staging map
    /// was built generically (nested containers under a union-staged
    /// frame stage as plain json-shaped maps/arrays, spec.md §4.2), so
    /// fitting a candidate means retyping that generic tree against the
    /// candidate's declared type, not just checking its own top-level
    /// entries.
    fn commit_union(
        &mut self,
        candidates: &[&'t dyn TypeDescriptor],
        staged: Value,
    ) -> Result<Value> {
        for candidate in candidates {
            if let Some(built) = self.coerce_value(staged.clone(), *candidate) {
                return Ok(built);
            }
        }
        Err(self.err(ErrorKind::ValueCannotBeConstructed))
    }

    /// Retypes an already-materialised (but possibly generically json-
    /// shaped) value against `target`, recursively. Used only for
    /// union-candidate commit, where the staging phase deferred exact
    /// typing of nested containers.
    fn coerce_value(&mut self, value: Value, target: &dyn TypeDescriptor) -> Option<Value> {
        match target.tag() {
            TypeTag::Json => Some(value),
            TypeTag::Map => {
                let mut built = Value::new_map();
                let entries: Vec<(String, Value)> = value
                    .as_map()?
                    .iter()
                    .map(|(k, v)| (String::from(k), v.clone()))
                    .collect();
                let elem = target.map_element();
                for (key, entry) in entries {
                    let coerced = self.coerce_value(entry, elem)?;
                    built.put_forcefully(&key, coerced);
                }
                Some(built)
            }
            TypeTag::Record => {
                let staged_map = value.as_map()?;
                for i in 0..target.record_field_count() {
                    let field = target.record_field(i);
                    if field.required && !staged_map.contains_key(field.name) {
                        return None;
                    }
                }
                let entries: Vec<(String, Value)> = staged_map
                    .iter()
                    .map(|(k, v)| (String::from(k), v.clone()))
                    .collect();
                let identity = target.record_identity();
                let mut built = Value::new_record(identity.package, identity.name);
                for (key, entry) in entries {
                    let field_type = target
                        .record_field_by_name(&key)
                        .map(|f| f.field_type)
                        .or_else(|| target.record_rest_field())?;
                    let coerced = self.coerce_value(entry, field_type)?;
                    built.put_forcefully(&key, coerced);
                }
                for i in 0..target.record_field_count() {
                    let field = target.record_field(i);
                    if !built.as_map()?.contains_key(field.name) {
                        let default = self.parser.converter.default_for_record_field(
                            identity,
                            field.name,
                            field.field_type,
                        );
                        built.put_forcefully(field.name, default);
                    }
                }
                if target.record_readonly() {
                    built.freeze();
                }
                Some(built)
            }
            TypeTag::Array => {
                let items: Vec<Value> = value.as_list()?.iter().cloned().collect();
                let elem = target.array_element();
                let mut built = Value::new_array();
                for (idx, item) in items.into_iter().enumerate() {
                    let coerced = self.coerce_value(item, elem)?;
                    built.add_ref_value(idx, coerced);
                }
                if target.array_state() == ArrayState::Closed {
                    let size = target.array_size();
                    let supplied = built.as_list()?.len();
                    if supplied > size {
                        return None;
                    }
                    if supplied < size {
                        if !target.array_has_filler() {
                            return None;
                        }
                        let filler = self.parser.converter.filler_value(elem);
                        for idx in supplied..size {
                            built.add_ref_value(idx, filler.clone());
                        }
                    }
                }
                Some(built)
            }
            TypeTag::Tuple => {
                let items: Vec<Value> = value.as_list()?.iter().cloned().collect();
                if target.tuple_len() > items.len() {
                    return None;
                }
                let mut built = Value::new_tuple();
                for (idx, item) in items.into_iter().enumerate() {
                    let elem_type = if idx < target.tuple_len() {
                        target.tuple_element(idx)
                    } else {
                        target.tuple_rest()?
                    };
                    let coerced = self.coerce_value(item, elem_type)?;
                    built.add_ref_value(idx, coerced);
                }
                Some(built)
            }
            _ => coerce_scalar(value, target.tag()),
        }
    }
}

/// Whether an already-typed scalar staged value fits `tag`, coercing
/// between compatible numeric tags (spec.md §4.5's integer-family range
/// rules).
fn coerce_scalar(value: Value, tag: TypeTag) -> Option<Value> {
    match (&value, tag) {
        (Value::Str(_), TypeTag::String) => Some(value),
        (Value::Bool(_), TypeTag::Boolean) => Some(value),
        (Value::Null, TypeTag::Null) => Some(value),
        (Value::Float(_), TypeTag::Float) => Some(value),
        (Value::Decimal(_), TypeTag::Decimal) => Some(value),
        (Value::Int(n), TypeTag::Int) => Some(Value::Int(*n)),
        (Value::Int(n), _) if matches!(
            tag,
            TypeTag::Signed8
                | TypeTag::Signed16
                | TypeTag::Signed32
                | TypeTag::Unsigned8
                | TypeTag::Unsigned16
                | TypeTag::Unsigned32
                | TypeTag::Byte
        ) =>
        {
            let (lo, hi) = int_bounds(tag);
            if *n >= lo && *n <= hi {
                Some(Value::Int(*n))
            } else {
                None
            }
        }
        _ => None,
    }
}

fn int_bounds(tag: TypeTag) -> (i64, i64) {
    match tag {
        TypeTag::Signed8 => (i8::MIN as i64, i8::MAX as i64),
        TypeTag::Signed16 => (i16::MIN as i64, i16::MAX as i64),
        TypeTag::Signed32 => (i32::MIN as i64, i32::MAX as i64),
        TypeTag::Unsigned8 | TypeTag::Byte => (0, u8::MAX as i64),
        TypeTag::Unsigned16 => (0, u16::MAX as i64),
        TypeTag::Unsigned32 => (0, u32::MAX as i64),
        _ => (i64::MIN, i64::MAX),
    }
}
