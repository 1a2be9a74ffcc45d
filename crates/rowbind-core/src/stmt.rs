//! Scalar types and values exchanged between mapped members and the database.

mod cast;

mod primitive;
pub use primitive::Primitive;

mod ty;
pub use ty::Type;

mod value;
pub use value::Value;
