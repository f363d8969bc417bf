//! `TypeConverter::convertValues` (spec.md §4.5/§6) and the generic JSON
//! literal inference used for union staging and for the `JSON` target type
//! (spec.md §4.5 `processNonStringValueAsJson`).

extern crate alloc;

use alloc::string::{String, ToString};
use bigdecimal::BigDecimal;
use core::str::FromStr;

use crate::error::{ConvertError, Result};
use crate::tag::TypeTag;
use crate::type_desc::{RecordIdentity, TypeDescriptor};
use crate::value::Value;

/// Converts a lexed textual value to a target primitive type, and
/// supplies default values for missing record fields.
///
/// Implemented here by [`DefaultConverter`]; real callers bridging to
/// their own runtime are expected to provide their own implementation
/// (e.g. one that looks up a compiler-declared field default instead of
/// synthesising a zero value).
pub trait TypeConverter {
    /// `TypeConverter.convertValues(targetPrimitiveType, lexeme)`.
    ///
    /// # Errors
    /// Returns `ConvertError` if `lexeme` is not a valid literal of
    /// `target`'s tag, or if `target`'s tag is not a primitive tag.
    fn convert(&self, target: &dyn TypeDescriptor, lexeme: &str) -> Result<Value>;

    /// Supplies the default value for a record field that was not present
    /// in the input, keyed by the record's identity and the field's name
    /// (`createRecordValueWithDefaultValues`, spec.md §6).
    fn default_for_record_field(
        &self,
        identity: RecordIdentity<'_>,
        field_name: &str,
        field_type: &dyn TypeDescriptor,
    ) -> Value;

    /// Supplies the filler value inserted at closed-array indices the
    /// input didn't supply (spec.md §8 boundary behaviour 7). Defaults to
    /// the element type's zero value, same as an absent record field.
    fn filler_value(&self, element_type: &dyn TypeDescriptor) -> Value {
        zero_value(element_type.tag())
    }
}

/// A converter with no external type system to consult: numeric/boolean
/// defaults are the type's zero value, and conversion follows exactly the
/// primitive rules of spec.md §4.5.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultConverter;

impl TypeConverter for DefaultConverter {
    fn convert(&self, target: &dyn TypeDescriptor, lexeme: &str) -> Result<Value> {
        convert_primitive(target.tag(), lexeme)
    }

    fn default_for_record_field(
        &self,
        _identity: RecordIdentity<'_>,
        _field_name: &str,
        field_type: &dyn TypeDescriptor,
    ) -> Value {
        zero_value(field_type.tag())
    }
}

fn zero_value(tag: TypeTag) -> Value {
    match tag {
        TypeTag::Int
        | TypeTag::Signed8
        | TypeTag::Signed16
        | TypeTag::Signed32
        | TypeTag::Unsigned8
        | TypeTag::Unsigned16
        | TypeTag::Unsigned32
        | TypeTag::Byte => Value::Int(0),
        TypeTag::Float => Value::Float(0.0),
        TypeTag::Decimal => Value::Decimal(BigDecimal::from(0)),
        TypeTag::String => Value::Str(String::new()),
        TypeTag::Boolean => Value::Bool(false),
        TypeTag::Map => Value::new_map(),
        TypeTag::Array => Value::new_array(),
        TypeTag::Tuple => Value::new_tuple(),
        TypeTag::Null
        | TypeTag::Record
        | TypeTag::Union
        | TypeTag::Json => Value::Null,
    }
}

fn int_range(tag: TypeTag) -> Option<(i64, i64)> {
    match tag {
        TypeTag::Signed8 => Some((i8::MIN as i64, i8::MAX as i64)),
        TypeTag::Signed16 => Some((i16::MIN as i64, i16::MAX as i64)),
        TypeTag::Signed32 => Some((i32::MIN as i64, i32::MAX as i64)),
        TypeTag::Unsigned8 | TypeTag::Byte => Some((0, u8::MAX as i64)),
        TypeTag::Unsigned16 => Some((0, u16::MAX as i64)),
        TypeTag::Unsigned32 => Some((0, u32::MAX as i64)),
        _ => None,
    }
}

/// `convertValues(targetPrimitiveType, lexeme)`, spec.md §4.5.
///
/// # Errors
/// See [`TypeConverter::convert`].
pub fn convert_primitive(tag: TypeTag, lexeme: &str) -> Result<Value> {
    match tag {
        TypeTag::Int
        | TypeTag::Signed8
        | TypeTag::Signed16
        | TypeTag::Signed32
        | TypeTag::Unsigned8
        | TypeTag::Unsigned16
        | TypeTag::Unsigned32
        | TypeTag::Byte => {
            let n: i64 = lexeme.parse().map_err(|_| ConvertError::BadLiteral {
                tag,
                lexeme: lexeme.to_string(),
            })?;
            if let Some((lo, hi)) = int_range(tag) {
                if n < lo || n > hi {
                    return Err(ConvertError::BadLiteral {
                        tag,
                        lexeme: lexeme.to_string(),
                    });
                }
            }
            Ok(Value::Int(n))
        }
        TypeTag::Decimal => BigDecimal::from_str(lexeme)
            .map(Value::Decimal)
            .map_err(|_| ConvertError::BadLiteral {
                tag,
                lexeme: lexeme.to_string(),
            }),
        TypeTag::Float => lexeme
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| ConvertError::BadLiteral {
                tag,
                lexeme: lexeme.to_string(),
            }),
        TypeTag::Boolean => match lexeme {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(ConvertError::BadLiteral {
                tag,
                lexeme: lexeme.to_string(),
            }),
        },
        TypeTag::Null => {
            if lexeme == "null" {
                Ok(Value::Null)
            } else {
                Err(ConvertError::BadLiteral {
                    tag,
                    lexeme: lexeme.to_string(),
                })
            }
        }
        TypeTag::String => Err(ConvertError::StringNotExpected),
        TypeTag::Json => infer_json_literal(lexeme),
        _ => Err(ConvertError::UnsupportedType { tag }),
    }
}

/// `processNonStringValueAsJson(str)`, spec.md §4.5.
///
/// # Errors
/// Returns `ConvertError::UnrecognizedToken` if `lexeme` matches none of
/// the generic JSON literal shapes.
pub fn infer_json_literal(lexeme: &str) -> Result<Value> {
    if lexeme.contains('.') {
        if is_negative_zero(lexeme) {
            return parse_float(lexeme);
        }
        return parse_decimal(lexeme);
    }
    match lexeme {
        "true" => return Ok(Value::Bool(true)),
        "false" => return Ok(Value::Bool(false)),
        "null" => return Ok(Value::Null),
        _ => {}
    }
    if is_negative_zero(lexeme) {
        return parse_float(lexeme);
    }
    if lexeme.contains('e') || lexeme.contains('E') {
        return parse_decimal(lexeme);
    }
    lexeme
        .parse::<i64>()
        .map(Value::Int)
        .map_err(|_| ConvertError::UnrecognizedToken {
            lexeme: lexeme.to_string(),
        })
}

fn parse_decimal(lexeme: &str) -> Result<Value> {
    BigDecimal::from_str(lexeme)
        .map(Value::Decimal)
        .map_err(|_| ConvertError::UnrecognizedToken {
            lexeme: lexeme.to_string(),
        })
}

fn parse_float(lexeme: &str) -> Result<Value> {
    lexeme
        .parse::<f64>()
        .map(Value::Float)
        .map_err(|_| ConvertError::UnrecognizedToken {
            lexeme: lexeme.to_string(),
        })
}

/// Whether `lexeme` is `-` followed only by `0` digits and at most one
/// decimal point — i.e. a literal spelling of negative zero, the one case
/// spec.md §4.5/§8 calls out as needing to stay a double rather than
/// becoming a decimal or an integer.
fn is_negative_zero(lexeme: &str) -> bool {
    let Some(rest) = lexeme.strip_prefix('-') else {
        return false;
    };
    if rest.is_empty() {
        return false;
    }
    let mut has_digit = false;
    let mut seen_dot = false;
    for ch in rest.chars() {
        match ch {
            '0' => has_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => return false,
        }
    }
    has_digit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_zero_without_dot_is_float() {
        assert_eq!(infer_json_literal("-0").unwrap(), Value::Float(-0.0));
    }

    #[test]
    fn negative_zero_with_dot_is_float() {
        assert_eq!(infer_json_literal("-0.0").unwrap(), Value::Float(-0.0));
    }

    #[test]
    fn plain_zero_is_integer() {
        assert_eq!(infer_json_literal("0").unwrap(), Value::Int(0));
    }

    #[test]
    fn decimal_point_infers_decimal() {
        assert_eq!(
            infer_json_literal("1.5").unwrap(),
            Value::Decimal(BigDecimal::from_str("1.5").unwrap())
        );
    }

    #[test]
    fn exponent_without_dot_infers_decimal() {
        assert_eq!(
            infer_json_literal("1e10").unwrap(),
            Value::Decimal(BigDecimal::from_str("1e10").unwrap())
        );
    }

    #[test]
    fn plain_integer_infers_int() {
        assert_eq!(infer_json_literal("42").unwrap(), Value::Int(42));
    }

    #[test]
    fn booleans_and_null_are_recognized() {
        assert_eq!(infer_json_literal("true").unwrap(), Value::Bool(true));
        assert_eq!(infer_json_literal("false").unwrap(), Value::Bool(false));
        assert_eq!(infer_json_literal("null").unwrap(), Value::Null);
    }

    #[test]
    fn garbage_is_unrecognized() {
        assert!(matches!(
            infer_json_literal("nope"),
            Err(ConvertError::UnrecognizedToken { .. })
        ));
    }

    #[test]
    fn int_out_of_u8_range_is_rejected() {
        assert!(convert_primitive(TypeTag::Unsigned8, "256").is_err());
        assert!(convert_primitive(TypeTag::Unsigned8, "255").is_ok());
    }

    #[test]
    fn decimal_literal_minus_zero_stays_decimal_under_explicit_decimal_target() {
        // spec.md §8 property 10: under an explicit `decimal` target, `-0`
        // is decimal, not double — only the generic JSON inference path
        // special-cases it.
        let v = convert_primitive(TypeTag::Decimal, "-0").unwrap();
        assert!(matches!(v, Value::Decimal(_)));
    }
}
