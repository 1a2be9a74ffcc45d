use super::{Type, Value};
use crate::{Error, Result};

use chrono::{DateTime, NaiveDateTime};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use uuid::Uuid;

const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

impl Type {
    /// Converts `value` to this type.
    ///
    /// Null passes through unchanged. Numeric conversions are checked: a
    /// value that does not fit, or a fraction cast to an integer kind, fails
    /// with a type conversion error rather than truncating.
    pub fn cast(&self, value: Value) -> Result<Value> {
        if value.is_null() {
            return Ok(value);
        }

        if value.infer_ty() == *self.non_nullable() {
            return Ok(value);
        }

        let target = self.non_nullable();

        let cast = match target {
            Type::Bool => cast_bool(&value),
            Type::Char => match &value {
                Value::String(s) => {
                    let mut chars = s.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => Some(Value::Char(c)),
                        _ => None,
                    }
                }
                _ => None,
            },
            Type::String => cast_string(&value).map(Value::String),
            Type::I8 => cast_integer(&value).and_then(|v| i8::try_from(v).ok().map(Value::I8)),
            Type::I16 => cast_integer(&value).and_then(|v| i16::try_from(v).ok().map(Value::I16)),
            Type::I32 => cast_integer(&value).and_then(|v| i32::try_from(v).ok().map(Value::I32)),
            Type::I64 => cast_integer(&value).and_then(|v| i64::try_from(v).ok().map(Value::I64)),
            Type::U8 => cast_integer(&value).and_then(|v| u8::try_from(v).ok().map(Value::U8)),
            Type::U16 => cast_integer(&value).and_then(|v| u16::try_from(v).ok().map(Value::U16)),
            Type::U32 => cast_integer(&value).and_then(|v| u32::try_from(v).ok().map(Value::U32)),
            Type::U64 => cast_integer(&value).and_then(|v| u64::try_from(v).ok().map(Value::U64)),
            Type::F32 => cast_f32(&value).map(Value::F32),
            Type::F64 => cast_float(&value).map(Value::F64),
            Type::Decimal => cast_decimal(&value).map(Value::Decimal),
            Type::Uuid => match &value {
                Value::String(s) => Uuid::parse_str(s).ok().map(Value::Uuid),
                Value::Bytes(bytes) => Uuid::from_slice(bytes).ok().map(Value::Uuid),
                _ => None,
            },
            Type::DateTime => match &value {
                Value::DateTimeOffset(v) => Some(Value::DateTime(v.naive_utc())),
                Value::String(s) => parse_date_time(s).map(Value::DateTime),
                _ => None,
            },
            Type::DateTimeOffset => match &value {
                Value::DateTime(v) => Some(Value::DateTimeOffset(v.and_utc().fixed_offset())),
                Value::String(s) => DateTime::parse_from_rfc3339(s)
                    .ok()
                    .map(Value::DateTimeOffset),
                _ => None,
            },
            Type::Bytes => match &value {
                Value::String(s) => Some(Value::Bytes(s.as_bytes().to_vec())),
                Value::Uuid(v) => Some(Value::Bytes(v.as_bytes().to_vec())),
                _ => None,
            },
            Type::Duration | Type::Null | Type::Nullable(_) => None,
        };

        cast.ok_or_else(|| Error::type_conversion(value, target.to_string()))
    }
}

fn cast_bool(value: &Value) -> Option<Value> {
    if let Some(v) = value.as_i128() {
        return match v {
            0 => Some(Value::Bool(false)),
            1 => Some(Value::Bool(true)),
            _ => None,
        };
    }

    match value.as_str()? {
        "true" | "1" => Some(Value::Bool(true)),
        "false" | "0" => Some(Value::Bool(false)),
        _ => None,
    }
}

fn cast_integer(value: &Value) -> Option<i128> {
    if let Some(v) = value.as_i128() {
        return Some(v);
    }

    match value {
        Value::F32(v) => float_to_integer(f64::from(*v)),
        Value::F64(v) => float_to_integer(*v),
        Value::Decimal(v) if v.fract().is_zero() => v.to_i128(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn float_to_integer(v: f64) -> Option<i128> {
    if v.is_finite() && v.fract() == 0.0 {
        Decimal::from_f64(v)?.to_i128()
    } else {
        None
    }
}

fn cast_float(value: &Value) -> Option<f64> {
    match value {
        Value::F32(v) => Some(f64::from(*v)),
        Value::F64(v) => Some(*v),
        Value::Decimal(v) => v.to_f64(),
        Value::String(s) => s.trim().parse().ok(),
        // Bool does not widen to a float.
        Value::Bool(_) => None,
        value => {
            let v = value.as_i128()?;
            let f = v as f64;
            (f as i128 == v).then_some(f)
        }
    }
}

/// Like `cast_float`, but fails when the value has no exact `f32`
/// representation.
fn cast_f32(value: &Value) -> Option<f32> {
    match value {
        Value::Decimal(v) => v.to_f32(),
        Value::String(s) => s.trim().parse().ok(),
        value => {
            let v = cast_float(value)?;
            let f = v as f32;
            (f64::from(f) == v || v.is_nan()).then_some(f)
        }
    }
}

fn cast_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Bool(_) => None,
        Value::F32(v) => Decimal::from_f32(*v),
        Value::F64(v) => Decimal::from_f64(*v),
        Value::String(s) => s.trim().parse().ok(),
        value => value.as_i128().and_then(Decimal::from_i128),
    }
}

fn cast_string(value: &Value) -> Option<String> {
    Some(match value {
        Value::Bool(v) => v.to_string(),
        Value::Char(v) => v.to_string(),
        Value::String(v) => v.clone(),
        Value::I8(v) => v.to_string(),
        Value::I16(v) => v.to_string(),
        Value::I32(v) => v.to_string(),
        Value::I64(v) => v.to_string(),
        Value::U8(v) => v.to_string(),
        Value::U16(v) => v.to_string(),
        Value::U32(v) => v.to_string(),
        Value::U64(v) => v.to_string(),
        Value::F32(v) => v.to_string(),
        Value::F64(v) => v.to_string(),
        Value::Decimal(v) => v.to_string(),
        Value::Uuid(v) => v.hyphenated().to_string(),
        Value::DateTime(v) => v.format(DATE_TIME_FORMATS[0]).to_string(),
        Value::DateTimeOffset(v) => v.to_rfc3339(),
        Value::Bytes(v) => String::from_utf8(v.clone()).ok()?,
        Value::Duration(_) | Value::Null => return None,
    })
}

fn parse_date_time(s: &str) -> Option<NaiveDateTime> {
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
}
