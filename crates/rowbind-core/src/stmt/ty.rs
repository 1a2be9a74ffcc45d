/// The declared type of a mapped scalar member.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Boolean value
    Bool,

    /// A single Unicode scalar value
    Char,

    /// String type
    String,

    /// Signed 8-bit integer
    I8,

    /// Signed 16-bit integer
    I16,

    /// Signed 32-bit integer
    I32,

    /// Signed 64-bit integer
    I64,

    /// Unsigned 8-bit integer
    U8,

    /// Unsigned 16-bit integer
    U16,

    /// Unsigned 32-bit integer
    U32,

    /// Unsigned 64-bit integer
    U64,

    /// 32-bit floating point
    F32,

    /// 64-bit floating point
    F64,

    /// Fixed-point decimal
    Decimal,

    /// 128-bit unique identifier
    Uuid,

    /// Date and time without an offset
    DateTime,

    /// Date and time with a fixed UTC offset
    DateTimeOffset,

    /// Signed span of time
    Duration,

    /// Raw bytes
    Bytes,

    /// A value of the inner type, or null (`Option` in Rust).
    Nullable(Box<Type>),

    /// The type of the null literal.
    Null,
}

impl Type {
    pub fn nullable(ty: impl Into<Self>) -> Self {
        match ty.into() {
            ty @ (Self::Nullable(_) | Self::Null) => ty,
            ty => Self::Nullable(Box::new(ty)),
        }
    }

    /// Returns the type with any `Nullable` wrapper removed.
    pub fn non_nullable(&self) -> &Type {
        match self {
            Self::Nullable(inner) => inner.non_nullable(),
            ty => ty,
        }
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, Self::Nullable(_) | Self::Null)
    }

    /// Returns `true` for the signed and unsigned integer kinds.
    pub fn is_integer(&self) -> bool {
        matches!(
            self.non_nullable(),
            Self::I8
                | Self::I16
                | Self::I32
                | Self::I64
                | Self::U8
                | Self::U16
                | Self::U32
                | Self::U64
        )
    }
}

impl From<&Self> for Type {
    fn from(value: &Self) -> Self {
        value.clone()
    }
}

impl core::fmt::Display for Type {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::Char => f.write_str("char"),
            Self::String => f.write_str("string"),
            Self::I8 => f.write_str("i8"),
            Self::I16 => f.write_str("i16"),
            Self::I32 => f.write_str("i32"),
            Self::I64 => f.write_str("i64"),
            Self::U8 => f.write_str("u8"),
            Self::U16 => f.write_str("u16"),
            Self::U32 => f.write_str("u32"),
            Self::U64 => f.write_str("u64"),
            Self::F32 => f.write_str("f32"),
            Self::F64 => f.write_str("f64"),
            Self::Decimal => f.write_str("decimal"),
            Self::Uuid => f.write_str("uuid"),
            Self::DateTime => f.write_str("datetime"),
            Self::DateTimeOffset => f.write_str("datetime with offset"),
            Self::Duration => f.write_str("duration"),
            Self::Bytes => f.write_str("bytes"),
            Self::Nullable(inner) => write!(f, "nullable {inner}"),
            Self::Null => f.write_str("null"),
        }
    }
}
