//! Decomposition pipeline.
//!
//! A [`Serializer`] accumulates the component sequence of one value. It is
//! seeded with the value's type so that two unrelated types decomposing to
//! the same raw components never share a slot. Order is significant:
//! structural decompositions push fields in declaration order, registry
//! entries in whatever order they call the `push_*` methods.

use std::any::Any;
use std::borrow::Borrow;

use smallvec::{smallvec, SmallVec};

use crate::pool::SlotForm;
use crate::stack::ensure_sufficient_stack;
use crate::{
    Component, Constant, ConstantPool, Reconstruct, Reflect, ReflectCx, ReflectError, Scalar,
    TypeKey,
};

/// Ordered, append-only component accumulator for one decomposition.
pub struct Serializer<'p> {
    cx: ReflectCx<'p>,
    owner: TypeKey,
    parts: SmallVec<[Component; 8]>,
}

impl<'p> Serializer<'p> {
    /// Start decomposing a value of type `T`, one level below `cx`.
    pub fn new<T: ?Sized + 'static>(cx: ReflectCx<'p>) -> Result<Self, ReflectError> {
        let owner = TypeKey::of::<T>();
        Ok(Serializer {
            cx: cx.descend(owner)?,
            owner,
            parts: smallvec![Component::Type(owner)],
        })
    }

    /// The type this serializer was seeded with.
    #[inline]
    pub fn owner(&self) -> TypeKey {
        self.owner
    }

    /// The context nested values are canonicalized in.
    #[inline]
    pub fn cx(&self) -> ReflectCx<'p> {
        self.cx
    }

    /// Components pushed so far, seed included.
    #[inline]
    pub fn components(&self) -> &[Component] {
        &self.parts
    }

    /// Append a component that is already resolved.
    #[inline]
    pub fn push(&mut self, component: Component) {
        self.parts.push(component);
    }

    /// Append the active alternative of a tagged union.
    #[inline]
    pub fn push_tag(&mut self, index: usize) {
        self.parts.push(Component::Scalar(Scalar::Uint(index as u128)));
    }

    /// Canonicalize `value` and append it as a value component.
    pub fn push_constant<V: Reflect>(&mut self, value: &V) -> Result<(), ReflectError> {
        let constant = self.reflect(value)?;
        self.parts.push(Component::Constant(constant.handle()));
        Ok(())
    }

    /// Append a reference component keyed by where `value` lives, not by
    /// what it holds.
    pub fn push_object<V: ?Sized + Sync + 'static>(
        &mut self,
        value: &'static V,
    ) -> Result<(), ReflectError> {
        let constant = self.reflect(&value)?;
        self.parts.push(Component::Object(constant.handle()));
        Ok(())
    }

    /// Append `value` by identity if its type is a reference, by content
    /// otherwise.
    ///
    /// This is the per-field rule of aggregates: value fields intern by
    /// content and `&'static` fields by the storage they point at.
    pub fn push_constant_or_object<V: Reflect>(&mut self, value: &V) -> Result<(), ReflectError> {
        let constant = self.reflect(value)?;
        let handle = constant.handle();
        self.parts.push(if V::KIND.is_reference() {
            Component::Object(handle)
        } else {
            Component::Constant(handle)
        });
        Ok(())
    }

    /// Canonicalize a sequence and append the canonical array.
    pub fn push_array<E, I>(&mut self, items: I) -> Result<(), ReflectError>
    where
        E: Reflect,
        I: IntoIterator,
        I::Item: Borrow<E>,
    {
        let array = self.cx.reflect_constant_array::<E, I>(items)?;
        self.parts.push(Component::Constant(array.handle()));
        Ok(())
    }

    /// Canonicalize text and append its nul-terminated canonical array.
    pub fn push_string(&mut self, text: &str) -> Result<(), ReflectError> {
        let bytes = self.cx.reflect_string_bytes(text)?;
        self.parts.push(Component::Constant(bytes.handle()));
        Ok(())
    }

    /// Intern the accumulated sequence for the registry entry of `T` and
    /// return its canonical object, reconstructing it from `source`'s key
    /// on first use.
    pub fn finalize<T: Reflect>(self, source: &T) -> Result<Constant<T::Target>, ReflectError> {
        debug_assert_eq!(self.owner, TypeKey::of::<T>());
        self.intern_object(|pool, key| <T::Forms as Reconstruct<T>>::reconstruct(source, pool, key))
    }

    /// Intern the accumulated sequence as an object slot holding a `U`.
    ///
    /// `build` receives the components after the seed.
    pub(crate) fn intern_object<U: Any + Send + Sync>(
        self,
        build: impl FnOnce(&ConstantPool, &[Component]) -> Result<U, ReflectError>,
    ) -> Result<Constant<U>, ReflectError> {
        let pool = self.cx.pool();
        let parts = &self.parts[..];
        let handle = pool.intern(SlotForm::Object, parts, TypeKey::of::<U>(), || {
            let value = build(pool, &parts[1..])?;
            Ok(Box::new(value) as Box<dyn Any + Send + Sync>)
        })?;
        Ok(Constant::new(handle, pool.object::<U>(handle)?))
    }

    fn reflect<V: Reflect>(&self, value: &V) -> Result<Constant<V::Target>, ReflectError> {
        let cx = self.cx;
        ensure_sufficient_stack(|| value.reflect_constant(cx))
    }
}
