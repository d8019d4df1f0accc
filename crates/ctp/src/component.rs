//! Elementary components of a canonicalization key.

use std::fmt;

use crate::{Handle, TypeKey};

/// A primitive value stored inline in a key.
///
/// Integers are widened so that every integer type shares one
/// representation; the seeding [`Component::Type`] keeps `1u8` and `1i64`
/// apart. Floats are compared by bit pattern.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Scalar {
    Unit,
    Bool(bool),
    Char(char),
    Int(i128),
    Uint(u128),
    F32(u32),
    F64(u64),
}

/// Storage identity of a `'static` referent.
///
/// `size` disambiguates slices that start at the same address.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Address {
    addr: usize,
    size: usize,
}

impl Address {
    /// The address of `r`.
    #[inline]
    pub fn of<T: ?Sized>(r: &T) -> Self {
        Address {
            addr: std::ptr::from_ref(r).cast::<()>().addr(),
            size: std::mem::size_of_val(r),
        }
    }

    /// Start address.
    #[inline]
    pub fn addr(self) -> usize {
        self.addr
    }

    /// Size in bytes of the referent.
    #[inline]
    pub fn size(self) -> usize {
        self.size
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({:#x}, {})", self.addr, self.size)
    }
}

/// One element of a component sequence.
///
/// [`Constant`](Component::Constant) is a value component: two sequences
/// holding it are equal when they name the same canonical object, which
/// happens exactly when the values were equal. [`Object`](Component::Object)
/// is a reference component: it names a reference slot keyed by storage
/// identity, so equal content at different addresses stays distinct.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Component {
    /// Originating type. Every sequence starts with one.
    Type(TypeKey),
    Scalar(Scalar),
    /// Raw storage identity; only the key of a reference slot holds one.
    Address(Address),
    Constant(Handle),
    Object(Handle),
}

impl Component {
    /// Short name used in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            Component::Type(_) => "type",
            Component::Scalar(_) => "scalar",
            Component::Address(_) => "address",
            Component::Constant(_) => "constant",
            Component::Object(_) => "object",
        }
    }

    /// The handle of a value or reference component.
    #[inline]
    pub fn handle(self) -> Option<Handle> {
        match self {
            Component::Constant(h) | Component::Object(h) => Some(h),
            _ => None,
        }
    }
}
