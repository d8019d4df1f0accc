//! Customization registry.
//!
//! [`Reflect`] is the type-indexed table of canonicalization strategies.
//! Lookup is by exact type through trait resolution: there is no fallback
//! from a wrapper to its contents, so every container registers its own
//! entry.
//!
//! # Registering a type
//!
//! An entry decomposes through [`Reflect::serialize`] and names the forms
//! it can rebuild its target from in [`Reflect::Forms`]. Naming a form
//! without implementing its trait does not compile.
//!
//! ```
//! use ctp::{ByConstants, ConstantPool, Constants, FromConstants, Reflect, ReflectError, Serializer};
//!
//! /// A label with a cached length that must not take part in identity.
//! struct Label {
//!     text: String,
//!     cached_len: usize,
//! }
//!
//! impl Reflect for Label {
//!     type Target = ctp::StaticStr;
//!     type Forms = ByConstants;
//!
//!     fn serialize(&self, s: &mut Serializer<'_>) -> Result<(), ReflectError> {
//!         s.push_constant(&self.text)
//!     }
//! }
//!
//! impl FromConstants for Label {
//!     fn deserialize_constants(mut args: Constants<'_>) -> Result<Self::Target, ReflectError> {
//!         let text = args.take::<String>()?;
//!         args.finish()?;
//!         Ok(text)
//!     }
//! }
//!
//! # fn main() -> Result<(), ReflectError> {
//! let pool = ConstantPool::new();
//! let a = pool.reflect_constant(&Label { text: "x".into(), cached_len: 1 })?;
//! let b = pool.reflect_constant(&Label { text: "x".into(), cached_len: 9 })?;
//! assert_eq!(a, b);
//! # Ok(())
//! # }
//! ```
//!
//! ```compile_fail
//! use ctp::{ByConstants, ByKey, Constants, FromConstants, Reflect, ReflectError, Serializer};
//!
//! struct Unbuilt(u8);
//!
//! impl Reflect for Unbuilt {
//!     type Target = u8;
//!     // Names the key form, but only the constants form is implemented.
//!     type Forms = (ByKey, ByConstants);
//!
//!     fn serialize(&self, s: &mut Serializer<'_>) -> Result<(), ReflectError> {
//!         s.push_constant(&self.0)
//!     }
//! }
//!
//! impl FromConstants for Unbuilt {
//!     fn deserialize_constants(mut args: Constants<'_>) -> Result<u8, ReflectError> {
//!         args.take::<u8>()
//!     }
//! }
//! ```

use bitflags::bitflags;

use crate::{
    Component, Components, Constant, ConstantPool, Constants, Reconstruct, ReflectCx,
    ReflectError, ReflectKind, Serializer,
};

bitflags! {
    /// Reconstruction forms a registry entry implements.
    ///
    /// The dispatcher prefers the lowest flag an entry names.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct ReconstructForms: u8 {
        /// [`FromKey`]: the whole key as one slice.
        const KEY = 1 << 0;
        /// [`FromComponents`]: raw components, one argument at a time.
        const COMPONENTS = 1 << 1;
        /// [`FromConstants`]: materialized canonical values.
        const CONSTANTS = 1 << 2;
    }
}

/// Canonicalization strategy for a type.
///
/// Identifier-safe types get their impl from the scalar impls in this crate
/// or from `#[derive(IdentifierSafe)]`, with [`Verbatim`](crate::Verbatim)
/// as their form. Other types implement [`serialize`](Reflect::serialize),
/// at least one of [`FromKey`], [`FromComponents`] and [`FromConstants`],
/// and name what they implement in [`Forms`](Reflect::Forms). All forms of
/// one entry must agree.
///
/// Entries must be deterministic. A decomposition that reaches its own
/// value again fails with [`ReflectError::RecursionLimit`].
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not usable as an identifier",
    label = "no canonicalization strategy for `{Self}`",
    note = "derive `IdentifierSafe` for aggregates of `pub` identifier-safe fields, or implement `Reflect` to register a decomposition"
)]
pub trait Reflect: Sized + 'static {
    /// Canonical representation of `Self`.
    type Target: Clone + Send + Sync + 'static;

    /// Reconstruction forms this entry implements: [`ByKey`](crate::ByKey),
    /// [`ByComponents`](crate::ByComponents), [`ByConstants`](crate::ByConstants),
    /// a tuple of them, or [`Verbatim`](crate::Verbatim).
    type Forms: Reconstruct<Self>;

    /// How values of this type enter the pool.
    const KIND: ReflectKind = ReflectKind::Custom;

    /// Push the components that identify `self`.
    fn serialize(&self, s: &mut Serializer<'_>) -> Result<(), ReflectError>;

    /// Canonicalize `self`.
    ///
    /// The default decomposes through [`serialize`](Reflect::serialize) and
    /// reconstructs through [`Forms`](Reflect::Forms). Entries may override
    /// it to forward to another value's canonical object.
    fn reflect_constant(&self, cx: ReflectCx<'_>) -> Result<Constant<Self::Target>, ReflectError> {
        cx.canonicalize(self)
    }
}

/// Form 1: rebuild from the whole key, seed excluded.
pub trait FromKey: Reflect {
    fn deserialize_key(pool: &ConstantPool, key: &[Component]) -> Result<Self::Target, ReflectError>;
}

/// Form 2: rebuild from the raw components.
pub trait FromComponents: Reflect {
    fn deserialize(args: Components<'_>) -> Result<Self::Target, ReflectError>;
}

/// Form 3: rebuild from the canonical values the components name.
pub trait FromConstants: Reflect {
    fn deserialize_constants(args: Constants<'_>) -> Result<Self::Target, ReflectError>;
}
