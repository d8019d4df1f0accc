//! Primitive identity resolver.
//!
//! Decides per type whether a value can key the pool as-is or needs a
//! registered decomposition. The decision is a trait-level constant, so
//! it is made once per type at compile time; the trait solver memoizes the
//! recursive "all fields are identifier-safe" check of derived aggregates.

use crate::{Address, Component, ReflectError, Reflect, Scalar, Serializer, Verbatim};

/// How a type enters the constant pool.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ReflectKind {
    /// Interned directly on its value.
    Scalar,
    /// `&'static T`: interned on the referent's storage identity.
    Reference,
    /// Aggregate of public identifier-safe fields.
    Structural,
    /// Needs a registered decomposition and reconstruction.
    Custom,
}

impl ReflectKind {
    /// Whether values of this kind are their own canonical target.
    #[inline]
    pub const fn is_identifier_safe(self) -> bool {
        !matches!(self, ReflectKind::Custom)
    }

    /// Whether values of this kind canonicalize by identity.
    #[inline]
    pub const fn is_reference(self) -> bool {
        matches!(self, ReflectKind::Reference)
    }
}

/// Whether `T` can be used as an identifier without custom decomposition.
pub const fn is_identifier_safe<T: Reflect>() -> bool {
    T::KIND.is_identifier_safe()
}

/// Types whose values are their own canonical representation.
///
/// Implemented for scalars, `&'static T`, arrays of identifier-safe
/// elements, and by `#[derive(IdentifierSafe)]`. The derive requires every
/// field to be `pub` and identifier-safe; enums contribute the index of
/// the active variant before its fields. Interior-mutable types (`Cell`,
/// `RefCell`, atomics) and owning pointers are never identifier-safe.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not identifier-safe",
    label = "`{Self}` cannot be compared component-wise",
    note = "identifier-safe types are scalars, `&'static` references, arrays of identifier-safe types and `#[derive(IdentifierSafe)]` aggregates of `pub` fields"
)]
pub trait IdentifierSafe: Reflect<Target = Self> + Clone + Send + Sync {}

macro_rules! impl_scalar {
    ($($ty:ty => |$v:ident| $scalar:expr;)*) => {$(
        impl Reflect for $ty {
            type Target = $ty;
            type Forms = Verbatim;
            const KIND: ReflectKind = ReflectKind::Scalar;

            #[inline]
            fn serialize(&self, s: &mut Serializer<'_>) -> Result<(), ReflectError> {
                let $v = *self;
                s.push(Component::Scalar($scalar));
                Ok(())
            }
        }

        impl IdentifierSafe for $ty {}
    )*};
}

impl_scalar! {
    () => |_v| Scalar::Unit;
    bool => |v| Scalar::Bool(v);
    char => |v| Scalar::Char(v);
    i8 => |v| Scalar::Int(i128::from(v));
    i16 => |v| Scalar::Int(i128::from(v));
    i32 => |v| Scalar::Int(i128::from(v));
    i64 => |v| Scalar::Int(i128::from(v));
    i128 => |v| Scalar::Int(v);
    isize => |v| Scalar::Int(v as i128);
    u8 => |v| Scalar::Uint(u128::from(v));
    u16 => |v| Scalar::Uint(u128::from(v));
    u32 => |v| Scalar::Uint(u128::from(v));
    u64 => |v| Scalar::Uint(u128::from(v));
    u128 => |v| Scalar::Uint(v);
    usize => |v| Scalar::Uint(v as u128);
    f32 => |v| Scalar::F32(v.to_bits());
    f64 => |v| Scalar::F64(v.to_bits());
}

impl<T: ?Sized + Sync + 'static> Reflect for &'static T {
    type Target = Self;
    type Forms = Verbatim;
    const KIND: ReflectKind = ReflectKind::Reference;

    #[inline]
    fn serialize(&self, s: &mut Serializer<'_>) -> Result<(), ReflectError> {
        s.push(Component::Address(Address::of(*self)));
        Ok(())
    }
}

impl<T: ?Sized + Sync + 'static> IdentifierSafe for &'static T {}

impl<T: IdentifierSafe, const N: usize> Reflect for [T; N] {
    type Target = Self;
    type Forms = Verbatim;
    const KIND: ReflectKind = ReflectKind::Structural;

    fn serialize(&self, s: &mut Serializer<'_>) -> Result<(), ReflectError> {
        for elem in self {
            s.push_constant_or_object(elem)?;
        }
        Ok(())
    }
}

impl<T: IdentifierSafe, const N: usize> IdentifierSafe for [T; N] {}

#[cfg(test)]
mod tests;
