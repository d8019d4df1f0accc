//! Array canonicalizer.
//!
//! Canonicalizes every element of a sequence on its own, then interns the
//! element handles as one key seeded with the element type. An empty
//! sequence still gets a slot of its own per element type.

use std::any::Any;
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

use smallvec::{smallvec, SmallVec};

use crate::pool::SlotForm;
use crate::stack::ensure_sufficient_stack;
use crate::{Component, Constant, ConstantPool, Reflect, ReflectCx, ReflectError, TypeKey};

impl ReflectCx<'_> {
    /// Canonicalize `items` into one canonical array of element targets.
    pub fn reflect_constant_array<E, I>(
        self,
        items: I,
    ) -> Result<Constant<[E::Target]>, ReflectError>
    where
        E: Reflect,
        I: IntoIterator,
        I::Item: Borrow<E>,
    {
        let cx = self.descend(TypeKey::of::<[E]>())?;
        let mut parts: SmallVec<[Component; 8]> = smallvec![Component::Type(TypeKey::of::<E>())];
        let mut elems = Vec::new();
        for item in items {
            let elem = ensure_sufficient_stack(|| item.borrow().reflect_constant(cx))?;
            parts.push(Component::Constant(elem.handle()));
            elems.push(elem);
        }

        let pool = cx.pool();
        let handle = pool.intern(
            SlotForm::Array,
            &parts,
            TypeKey::of::<Box<[E::Target]>>(),
            || {
                let values: Box<[E::Target]> = elems.iter().map(|elem| elem.get().clone()).collect();
                Ok(Box::new(values) as Box<dyn Any + Send + Sync>)
            },
        )?;
        Ok(Constant::new(handle, pool.array::<E::Target>(handle)?))
    }

    /// Canonicalize the bytes of `text` followed by a nul terminator.
    pub(crate) fn reflect_string_bytes(self, text: &str) -> Result<Constant<[u8]>, ReflectError> {
        self.reflect_constant_array::<u8, _>(text.bytes().chain(std::iter::once(0)))
    }
}

impl ConstantPool {
    /// Canonicalize a sequence into one canonical array.
    pub fn reflect_constant_array<E, I>(
        &self,
        items: I,
    ) -> Result<Constant<[E::Target]>, ReflectError>
    where
        E: Reflect,
        I: IntoIterator,
        I::Item: Borrow<E>,
    {
        self.cx().reflect_constant_array::<E, I>(items)
    }

    /// Canonicalize a sequence and return the canonical array itself.
    pub fn define_static_array<E, I>(&self, items: I) -> Result<&'static [E::Target], ReflectError>
    where
        E: Reflect,
        I: IntoIterator,
        I::Item: Borrow<E>,
    {
        self.reflect_constant_array::<E, I>(items).map(Constant::get)
    }

    /// Canonicalize text into nul-terminated canonical storage.
    pub fn define_static_string(&self, text: &str) -> Result<StaticStr, ReflectError> {
        let bytes = self.cx().reflect_string_bytes(text)?;
        StaticStr::from_bytes_with_nul(bytes.get())
    }
}

/// Canonical text: a view of a canonical byte array that ends in `\0`.
///
/// The terminator is not part of [`as_str`](StaticStr::as_str) but is
/// always present in [`as_bytes_with_nul`](StaticStr::as_bytes_with_nul).
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct StaticStr {
    text: &'static str,
    with_nul: &'static [u8],
}

impl StaticStr {
    /// View a nul-terminated UTF-8 array as text.
    pub fn from_bytes_with_nul(bytes: &'static [u8]) -> Result<Self, ReflectError> {
        let Some((&0, body)) = bytes.split_last() else {
            return Err(ReflectError::MalformedText {
                reason: "missing nul terminator",
            });
        };
        let text = std::str::from_utf8(body).map_err(|_| ReflectError::MalformedText {
            reason: "not valid UTF-8",
        })?;
        Ok(StaticStr {
            text,
            with_nul: bytes,
        })
    }

    #[inline]
    pub fn as_str(self) -> &'static str {
        self.text
    }

    /// The canonical bytes, terminator included.
    #[inline]
    pub fn as_bytes_with_nul(self) -> &'static [u8] {
        self.with_nul
    }
}

impl Deref for StaticStr {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        self.text
    }
}

impl PartialEq<str> for StaticStr {
    fn eq(&self, other: &str) -> bool {
        self.text == other
    }
}

impl PartialEq<&str> for StaticStr {
    fn eq(&self, other: &&str) -> bool {
        self.text == *other
    }
}

impl fmt::Debug for StaticStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.text, f)
    }
}

impl fmt::Display for StaticStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text)
    }
}

#[cfg(test)]
mod tests;
