use crate::stmt::{Primitive, Type, Value};
use crate::{Error, Result};

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Reads and writes one mapped member on instances of its owning type.
///
/// Instances are passed type-erased; an instance of the wrong type is an
/// [`argument_invalid`](Error::argument_invalid) error, a value that cannot
/// be converted to the member type is a
/// [`type_conversion`](Error::type_conversion) error.
pub trait MetaAccessor: Send + Sync + 'static {
    /// The declared type of the member.
    fn ty(&self) -> &Type;

    fn get_boxed_value(&self, instance: &dyn Any) -> Result<Value>;

    /// Casts `value` to [`MetaAccessor::ty`] and stores it.
    fn set_boxed_value(&self, instance: &mut dyn Any, value: Value) -> Result<()>;
}

impl fmt::Debug for dyn MetaAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MetaAccessor({})", self.ty())
    }
}

/// Accessor built from a getter and setter pair over a field of `T`.
pub struct FieldAccessor<T, V> {
    ty: Type,
    get: fn(&T) -> V,
    set: fn(&mut T, V),
}

impl<T: 'static, V: Primitive> FieldAccessor<T, V> {
    pub fn new(get: fn(&T) -> V, set: fn(&mut T, V)) -> Self {
        Self {
            ty: V::ty(),
            get,
            set,
        }
    }
}

impl<T: 'static, V: Primitive> MetaAccessor for FieldAccessor<T, V> {
    fn ty(&self) -> &Type {
        &self.ty
    }

    fn get_boxed_value(&self, instance: &dyn Any) -> Result<Value> {
        let instance = instance
            .downcast_ref::<T>()
            .ok_or_else(wrong_instance::<T>)?;
        Ok((self.get)(instance).into_value())
    }

    fn set_boxed_value(&self, instance: &mut dyn Any, value: Value) -> Result<()> {
        let instance = instance
            .downcast_mut::<T>()
            .ok_or_else(wrong_instance::<T>)?;

        if value.is_null() && !V::NULLABLE {
            return Err(Error::type_conversion(value, self.ty.to_string()));
        }

        let value = V::load(self.ty.cast(value)?)?;
        (self.set)(instance, value);
        Ok(())
    }
}

fn wrong_instance<T>() -> Error {
    Error::argument_invalid(format!("expected an instance of `{}`", type_name::<T>()))
}

/// Views a derived entity as its base.
pub(crate) trait Projection: Send + Sync + 'static {
    /// The derived type this projection accepts.
    fn source(&self) -> TypeId;

    fn project<'a>(&self, instance: &'a dyn Any) -> Option<&'a dyn Any>;

    fn project_mut<'a>(&self, instance: &'a mut dyn Any) -> Option<&'a mut dyn Any>;
}

pub(crate) struct BaseProjection<D, B> {
    as_base: fn(&D) -> &B,
    as_base_mut: fn(&mut D) -> &mut B,
}

impl<D: 'static, B: 'static> BaseProjection<D, B> {
    pub(crate) fn new(as_base: fn(&D) -> &B, as_base_mut: fn(&mut D) -> &mut B) -> Self {
        Self {
            as_base,
            as_base_mut,
        }
    }
}

impl<D: 'static, B: 'static> Projection for BaseProjection<D, B> {
    fn source(&self) -> TypeId {
        TypeId::of::<D>()
    }

    fn project<'a>(&self, instance: &'a dyn Any) -> Option<&'a dyn Any> {
        let derived = instance.downcast_ref::<D>()?;
        Some((self.as_base)(derived))
    }

    fn project_mut<'a>(&self, instance: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        let derived = instance.downcast_mut::<D>()?;
        Some((self.as_base_mut)(derived))
    }
}

/// Accessor for a member declared on a type that has derived types.
///
/// Instances of a derived type are projected toward the declaring type
/// before the inner accessor runs.
pub(crate) struct HierarchyAccessor {
    inner: Arc<dyn MetaAccessor>,
    declaring: TypeId,
    projections: Arc<[Arc<dyn Projection>]>,
}

impl HierarchyAccessor {
    pub(crate) fn new(
        inner: Arc<dyn MetaAccessor>,
        declaring: TypeId,
        projections: Arc<[Arc<dyn Projection>]>,
    ) -> Self {
        Self {
            inner,
            declaring,
            projections,
        }
    }

    fn projection_for(&self, ty: TypeId) -> Option<&Arc<dyn Projection>> {
        self.projections.iter().find(|p| p.source() == ty)
    }
}

impl MetaAccessor for HierarchyAccessor {
    fn ty(&self) -> &Type {
        self.inner.ty()
    }

    fn get_boxed_value(&self, instance: &dyn Any) -> Result<Value> {
        let mut current = instance;

        while (*current).type_id() != self.declaring {
            let Some(projection) = self.projection_for((*current).type_id()) else {
                break;
            };
            match projection.project(current) {
                Some(base) => current = base,
                None => break,
            }
        }

        self.inner.get_boxed_value(current)
    }

    fn set_boxed_value(&self, instance: &mut dyn Any, value: Value) -> Result<()> {
        let mut current = instance;

        while (*current).type_id() != self.declaring {
            let Some(projection) = self.projection_for((*current).type_id()) else {
                break;
            };
            current = match projection.project_mut(current) {
                Some(base) => base,
                None => return Err(Error::argument_invalid("projection to base type failed")),
            };
        }

        self.inner.set_boxed_value(current, value)
    }
}
