//! Classification of member types allowed as discriminators and identities.
//!
//! Both predicates look through a nullable wrapper first, so `Option<i16>`
//! classifies the same as `i16`.

use crate::stmt::Type;

/// Returns `true` if members of type `ty` may act as an inheritance
/// discriminator.
///
/// Integers of every width, characters, strings and booleans qualify.
pub fn is_supported_discriminator_type(ty: &Type) -> bool {
    matches!(
        ty.non_nullable(),
        Type::I8
            | Type::I16
            | Type::I32
            | Type::I64
            | Type::U8
            | Type::U16
            | Type::U32
            | Type::U64
            | Type::Char
            | Type::String
            | Type::Bool
    )
}

/// Returns `true` if members of type `ty` may be part of a primary key or be
/// generated by the database.
pub fn is_supported_identity_type(ty: &Type) -> bool {
    is_supported_discriminator_type(ty)
        || matches!(
            ty.non_nullable(),
            Type::Uuid
                | Type::DateTime
                | Type::DateTimeOffset
                | Type::Duration
                | Type::F32
                | Type::F64
                | Type::Decimal
        )
}

/// Returns `true` if members of type `ty` may carry a row version.
pub(crate) fn is_supported_version_type(ty: &Type) -> bool {
    ty.is_integer()
        || matches!(
            ty.non_nullable(),
            Type::DateTime | Type::DateTimeOffset | Type::Bytes
        )
}
