use super::Type;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta};
use rust_decimal::Decimal;
use uuid::Uuid;

/// A scalar value read from or written to a mapped member.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    /// Boolean value
    Bool(bool),

    /// Single character value
    Char(char),

    /// String value
    String(String),

    /// Signed 8-bit integer
    I8(i8),

    /// Signed 16-bit integer
    I16(i16),

    /// Signed 32-bit integer
    I32(i32),

    /// Signed 64-bit integer
    I64(i64),

    /// Unsigned 8-bit integer
    U8(u8),

    /// Unsigned 16-bit integer
    U16(u16),

    /// Unsigned 32-bit integer
    U32(u32),

    /// Unsigned 64-bit integer
    U64(u64),

    /// 32-bit floating point
    F32(f32),

    /// 64-bit floating point
    F64(f64),

    /// Fixed-point decimal
    Decimal(Decimal),

    /// Unique identifier
    Uuid(Uuid),

    /// Date and time without an offset
    DateTime(NaiveDateTime),

    /// Date and time with a fixed UTC offset
    DateTimeOffset(DateTime<FixedOffset>),

    /// Span of time
    Duration(TimeDelta),

    /// Raw bytes
    Bytes(Vec<u8>),

    /// Null value
    #[default]
    Null,
}

impl Value {
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the type of the value.
    ///
    /// Null infers as [`Type::Null`].
    pub fn infer_ty(&self) -> Type {
        match self {
            Self::Bool(_) => Type::Bool,
            Self::Char(_) => Type::Char,
            Self::String(_) => Type::String,
            Self::I8(_) => Type::I8,
            Self::I16(_) => Type::I16,
            Self::I32(_) => Type::I32,
            Self::I64(_) => Type::I64,
            Self::U8(_) => Type::U8,
            Self::U16(_) => Type::U16,
            Self::U32(_) => Type::U32,
            Self::U64(_) => Type::U64,
            Self::F32(_) => Type::F32,
            Self::F64(_) => Type::F64,
            Self::Decimal(_) => Type::Decimal,
            Self::Uuid(_) => Type::Uuid,
            Self::DateTime(_) => Type::DateTime,
            Self::DateTimeOffset(_) => Type::DateTimeOffset,
            Self::Duration(_) => Type::Duration,
            Self::Bytes(_) => Type::Bytes,
            Self::Null => Type::Null,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the value as an `i128` when it holds an integer or bool.
    pub(crate) fn as_i128(&self) -> Option<i128> {
        Some(match *self {
            Self::Bool(v) => i128::from(v),
            Self::I8(v) => i128::from(v),
            Self::I16(v) => i128::from(v),
            Self::I32(v) => i128::from(v),
            Self::I64(v) => i128::from(v),
            Self::U8(v) => i128::from(v),
            Self::U16(v) => i128::from(v),
            Self::U32(v) => i128::from(v),
            Self::U64(v) => i128::from(v),
            _ => return None,
        })
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Self::String(value.clone())
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}
