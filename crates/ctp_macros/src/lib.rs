//! Procedural macros for the ctp canonical identifier engine.
//!
//! # `IdentifierSafe` Derive
//!
//! Marks an aggregate as usable as an identifier without a custom
//! decomposition. The generated `Reflect` impl pushes every field in
//! declaration order, by content for value fields and by storage identity
//! for `&'static` fields:
//!
//! ```text
//! #[derive(Clone, IdentifierSafe)]
//! pub struct Key {
//!     pub id: u32,
//!     pub kind: Kind,
//!     pub owner: &'static Registry,
//! }
//!
//! #[derive(Clone, IdentifierSafe)]
//! pub enum Kind {
//!     Plain,
//!     Tagged(u8),
//! }
//! ```
//!
//! Every field must be `pub` and every field type must itself be
//! identifier-safe; enums push the index of the active variant first.

mod identifier_safe;

use proc_macro::TokenStream;

/// Derive `Reflect` and `IdentifierSafe` for a struct or enum.
///
/// # Rules
/// - Struct fields must be `pub`: private fields cannot be compared
///   component-wise.
/// - Every field type must implement `IdentifierSafe`.
/// - The type must be `Clone + Send + Sync + 'static`; its first
///   canonicalized value becomes the canonical object.
#[proc_macro_derive(IdentifierSafe)]
pub fn derive_identifier_safe(input: TokenStream) -> TokenStream {
    identifier_safe::derive_identifier_safe(input)
}
