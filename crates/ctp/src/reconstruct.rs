//! Reconstruction dispatch.
//!
//! Turns an interned component sequence back into the target value of a
//! registry entry. [`Reflect::Forms`] names a marker per implemented form,
//! or a tuple of markers; each marker only satisfies [`Reconstruct`] when
//! its form trait is implemented. With several forms, the dispatcher uses
//! the first one present in the order `KEY`, `COMPONENTS`, `CONSTANTS`.

use std::any::type_name;

use crate::{
    Component, ConstantPool, FromComponents, FromConstants, FromKey, Handle, IdentifierSafe,
    ReconstructForms, Reflect, ReflectError,
};

mod sealed {
    pub trait Sealed {}
}

/// Marker: reconstruct through [`FromKey`].
#[derive(Copy, Clone, Debug)]
pub struct ByKey;

/// Marker: reconstruct through [`FromComponents`].
#[derive(Copy, Clone, Debug)]
pub struct ByComponents;

/// Marker: reconstruct through [`FromConstants`].
#[derive(Copy, Clone, Debug)]
pub struct ByConstants;

/// Marker: the first value seen is its own canonical object.
///
/// Only identifier-safe types may name it.
#[derive(Copy, Clone, Debug)]
pub struct Verbatim;

impl sealed::Sealed for ByKey {}
impl sealed::Sealed for ByComponents {}
impl sealed::Sealed for ByConstants {}
impl sealed::Sealed for Verbatim {}
impl<A: sealed::Sealed, B: sealed::Sealed> sealed::Sealed for (A, B) {}
impl<A: sealed::Sealed, B: sealed::Sealed, C: sealed::Sealed> sealed::Sealed for (A, B, C) {}

/// One reconstruction form of `T`.
pub trait Form<T: Reflect>: sealed::Sealed {
    const FLAG: ReconstructForms;

    fn build(pool: &ConstantPool, key: &[Component]) -> Result<T::Target, ReflectError>;
}

impl<T: FromKey> Form<T> for ByKey {
    const FLAG: ReconstructForms = ReconstructForms::KEY;

    fn build(pool: &ConstantPool, key: &[Component]) -> Result<T::Target, ReflectError> {
        T::deserialize_key(pool, key)
    }
}

impl<T: FromComponents> Form<T> for ByComponents {
    const FLAG: ReconstructForms = ReconstructForms::COMPONENTS;

    fn build(pool: &ConstantPool, key: &[Component]) -> Result<T::Target, ReflectError> {
        T::deserialize(Components::new::<T>(pool, key))
    }
}

impl<T: FromConstants> Form<T> for ByConstants {
    const FLAG: ReconstructForms = ReconstructForms::CONSTANTS;

    fn build(pool: &ConstantPool, key: &[Component]) -> Result<T::Target, ReflectError> {
        T::deserialize_constants(Constants::new::<T>(pool, key))
    }
}

/// The set of forms a registry entry implements.
///
/// `source` is the value whose decomposition created the slot; `key` is
/// that decomposition with the seed removed.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a reconstruction form of `{T}`",
    label = "`{T}` does not implement this form",
    note = "`ByKey` needs `FromKey`, `ByComponents` needs `FromComponents`, `ByConstants` needs `FromConstants` and `Verbatim` needs `IdentifierSafe`"
)]
pub trait Reconstruct<T: Reflect>: sealed::Sealed {
    /// Forms present, empty for [`Verbatim`].
    const FORMS: ReconstructForms;

    fn reconstruct(
        source: &T,
        pool: &ConstantPool,
        key: &[Component],
    ) -> Result<T::Target, ReflectError>;
}

/// The form the dispatcher uses out of `forms`.
const fn preferred(forms: ReconstructForms) -> ReconstructForms {
    ReconstructForms::from_bits_retain(forms.bits() & forms.bits().wrapping_neg())
}

impl<T: IdentifierSafe> Reconstruct<T> for Verbatim {
    const FORMS: ReconstructForms = ReconstructForms::empty();

    fn reconstruct(
        source: &T,
        _pool: &ConstantPool,
        _key: &[Component],
    ) -> Result<T::Target, ReflectError> {
        Ok(source.clone())
    }
}

macro_rules! impl_single_form {
    ($($marker:ty),*) => {$(
        impl<T: Reflect> Reconstruct<T> for $marker
        where
            $marker: Form<T>,
        {
            const FORMS: ReconstructForms = <$marker as Form<T>>::FLAG;

            fn reconstruct(
                _source: &T,
                pool: &ConstantPool,
                key: &[Component],
            ) -> Result<T::Target, ReflectError> {
                <$marker as Form<T>>::build(pool, key)
            }
        }
    )*};
}

impl_single_form!(ByKey, ByComponents, ByConstants);

impl<T: Reflect, A: Form<T>, B: Form<T>> Reconstruct<T> for (A, B) {
    const FORMS: ReconstructForms = A::FLAG.union(B::FLAG);

    fn reconstruct(
        _source: &T,
        pool: &ConstantPool,
        key: &[Component],
    ) -> Result<T::Target, ReflectError> {
        if preferred(Self::FORMS) == A::FLAG {
            A::build(pool, key)
        } else {
            B::build(pool, key)
        }
    }
}

impl<T: Reflect, A: Form<T>, B: Form<T>, C: Form<T>> Reconstruct<T> for (A, B, C) {
    const FORMS: ReconstructForms = A::FLAG.union(B::FLAG).union(C::FLAG);

    fn reconstruct(
        _source: &T,
        pool: &ConstantPool,
        key: &[Component],
    ) -> Result<T::Target, ReflectError> {
        let chosen = preferred(Self::FORMS);
        if chosen == A::FLAG {
            A::build(pool, key)
        } else if chosen == B::FLAG {
            B::build(pool, key)
        } else {
            C::build(pool, key)
        }
    }
}

/// Raw components of a key, handed out one at a time.
pub struct Components<'a> {
    pool: &'a ConstantPool,
    owner: &'static str,
    parts: std::slice::Iter<'a, Component>,
}

impl<'a> Components<'a> {
    pub(crate) fn new<T: ?Sized + 'static>(pool: &'a ConstantPool, parts: &'a [Component]) -> Self {
        Components {
            pool,
            owner: type_name::<T>(),
            parts: parts.iter(),
        }
    }

    /// The pool the components' handles belong to.
    #[inline]
    pub fn pool(&self) -> &'a ConstantPool {
        self.pool
    }

    /// Components not yet taken.
    #[inline]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parts.len() == 0
    }

    /// Take the next component.
    pub fn take(&mut self) -> Result<Component, ReflectError> {
        self.parts
            .next()
            .copied()
            .ok_or(ReflectError::MissingComponent { ty: self.owner })
    }

    /// Take the next component, which must be a value component.
    pub fn take_constant(&mut self) -> Result<Handle, ReflectError> {
        match self.take()? {
            Component::Constant(handle) => Ok(handle),
            found => Err(self.unexpected("constant", found)),
        }
    }

    /// Take the next value or reference component.
    pub fn take_handle(&mut self) -> Result<Handle, ReflectError> {
        let found = self.take()?;
        found
            .handle()
            .ok_or_else(|| self.unexpected("constant or object", found))
    }

    /// Fail unless every component was taken.
    pub fn finish(self) -> Result<(), ReflectError> {
        match self.parts.len() {
            0 => Ok(()),
            remaining => Err(ReflectError::TrailingComponents {
                ty: self.owner,
                remaining,
            }),
        }
    }

    fn unexpected(&self, expected: &'static str, found: Component) -> ReflectError {
        ReflectError::UnexpectedComponent {
            ty: self.owner,
            expected,
            found,
        }
    }
}

/// Components of a key resolved to the canonical values they name.
pub struct Constants<'a> {
    inner: Components<'a>,
}

impl<'a> Constants<'a> {
    pub(crate) fn new<T: ?Sized + 'static>(pool: &'a ConstantPool, parts: &'a [Component]) -> Self {
        Constants {
            inner: Components::new::<T>(pool, parts),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// The canonical object named by the next component.
    pub fn take_ref<V: Reflect>(&mut self) -> Result<&'static V::Target, ReflectError> {
        let handle = self.inner.take_handle()?;
        self.inner.pool.object::<V::Target>(handle)
    }

    /// A copy of the canonical object named by the next component.
    ///
    /// For a reference component this is the original `&'static` reference.
    pub fn take<V: Reflect>(&mut self) -> Result<V::Target, ReflectError> {
        self.take_ref::<V>().map(Clone::clone)
    }

    /// The canonical array named by the next component.
    pub fn take_array<E: Reflect>(&mut self) -> Result<&'static [E::Target], ReflectError> {
        let handle = self.inner.take_constant()?;
        self.inner.pool.array::<E::Target>(handle)
    }

    /// Fail unless every component was taken.
    pub fn finish(self) -> Result<(), ReflectError> {
        self.inner.finish()
    }
}
