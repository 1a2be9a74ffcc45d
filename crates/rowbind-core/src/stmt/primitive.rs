use super::{Type, Value};
use crate::{Error, Result};

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta};
use rust_decimal::Decimal;
use uuid::Uuid;

/// A Rust type that can be stored in a mapped column.
pub trait Primitive: Sized + Send + Sync + 'static {
    const NULLABLE: bool = false;

    /// The declared column type for this Rust type.
    fn ty() -> Type;

    fn into_value(self) -> Value;

    fn load(value: Value) -> Result<Self>;
}

macro_rules! impl_primitive {
    ( $( $ty:ty => $name:ident, )+ ) => {
        $(
            impl Primitive for $ty {
                fn ty() -> Type {
                    Type::$name
                }

                fn into_value(self) -> Value {
                    Value::$name(self)
                }

                fn load(value: Value) -> Result<Self> {
                    match value {
                        Value::$name(v) => Ok(v),
                        value => Err(Error::type_conversion(value, Type::$name.to_string())),
                    }
                }
            }

            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$name(value)
                }
            }

            impl TryFrom<Value> for $ty {
                type Error = Error;

                fn try_from(value: Value) -> Result<Self> {
                    <$ty as Primitive>::load(value)
                }
            }
        )+
    };
}

impl_primitive! {
    bool => Bool,
    char => Char,
    String => String,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    Decimal => Decimal,
    Uuid => Uuid,
    NaiveDateTime => DateTime,
    DateTime<FixedOffset> => DateTimeOffset,
    TimeDelta => Duration,
    Vec<u8> => Bytes,
}

impl<T: Primitive> Primitive for Option<T> {
    const NULLABLE: bool = true;

    fn ty() -> Type {
        Type::nullable(T::ty())
    }

    fn into_value(self) -> Value {
        match self {
            Some(value) => value.into_value(),
            None => Value::Null,
        }
    }

    fn load(value: Value) -> Result<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            Ok(Some(T::load(value)?))
        }
    }
}
