//! Canonical identifiers for arbitrary values.
//!
//! `ctp` maps a source value to a single, process-lifetime canonical object
//! so that generic code can compare identifiers by identity instead of by
//! value: equal inputs yield the same [`Handle`] and the same `'static`
//! address, unequal inputs yield different ones.
//!
//! # Pipeline
//!
//! ```text
//! Param::new(&v)
//!   -> identity resolver (Reflect::KIND)
//!        identifier-safe: key = [Type, fields...]         -> pool
//!        custom:          Serializer -> key = [Type, ...] -> pool -> reconstruct
//! ```
//!
//! - Scalars, `&'static T` references and `#[derive(IdentifierSafe)]`
//!   aggregates are identifier-safe: they are their own target type.
//! - Everything else implements [`Reflect`] by hand: it decomposes into a
//!   [`Serializer`] and names the reconstruction forms it implements in
//!   [`Reflect::Forms`].
//! - Sequences route through the array canonicalizer, which canonicalizes
//!   each element and interns the element handles.
//!
//! # Example
//!
//! ```
//! use ctp::{ConstantPool, IdentifierSafe, Param};
//!
//! #[derive(Clone, Debug, IdentifierSafe)]
//! pub struct Point {
//!     pub x: i32,
//!     pub y: i32,
//! }
//!
//! # fn main() -> Result<(), ctp::ReflectError> {
//! let pool = ConstantPool::new();
//! let a = Param::in_pool(&pool, &Point { x: 1, y: 2 })?;
//! let b = Param::in_pool(&pool, &Point { x: 1, y: 2 })?;
//! let c = Param::in_pool(&pool, &Point { x: 2, y: 1 })?;
//! assert_eq!(a, b);
//! assert!(std::ptr::eq(a.get(), b.get()));
//! assert_ne!(a, c);
//!
//! let text = Param::in_pool(&pool, &String::from("hello"))?;
//! assert_eq!(text.as_str(), "hello");
//! # Ok(())
//! # }
//! ```
//!
//! Types without a strategy fail to compile:
//!
//! ```compile_fail
//! use ctp::{ConstantPool, Param};
//!
//! struct Opaque(u8);
//!
//! let pool = ConstantPool::new();
//! let _ = Param::in_pool(&pool, &Opaque(1));
//! ```
//!
//! So do identifier-safe derives over private fields:
//!
//! ```compile_fail
//! #[derive(Clone, ctp::IdentifierSafe)]
//! pub struct Hidden {
//!     secret: u32,
//! }
//! ```
//!
//! And over fields that are not identifier-safe themselves:
//!
//! ```compile_fail
//! #[derive(Clone, ctp::IdentifierSafe)]
//! pub struct Named {
//!     pub name: String,
//! }
//! ```

// The derive expands to `::ctp::...` paths, including inside this crate's tests.
#[allow(unused_extern_crates)]
extern crate self as ctp;

mod array;
mod builtins;
mod component;
mod config;
mod error;
mod handle;
mod identity;
mod param;
mod pool;
mod reconstruct;
mod registry;
mod serializer;
mod stack;
mod type_key;

pub use array::StaticStr;
pub use builtins::Literal;
pub use component::{Address, Component, Scalar};
pub use config::PoolConfig;
pub use error::ReflectError;
pub use handle::Handle;
pub use identity::{is_identifier_safe, IdentifierSafe, ReflectKind};
pub use param::Param;
pub use pool::{Constant, ConstantPool, ReflectCx, SlotForm};
pub use reconstruct::{
    ByComponents, ByConstants, ByKey, Components, Constants, Form, Reconstruct, Verbatim,
};
pub use registry::{FromComponents, FromConstants, FromKey, ReconstructForms, Reflect};
pub use serializer::Serializer;
pub use stack::ensure_sufficient_stack;
pub use type_key::TypeKey;

/// Derive macro for identifier-safe aggregates.
///
/// See [`IdentifierSafe`] for the rules a type must satisfy.
pub use ctp_macros::IdentifierSafe;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=ctp=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            // A host may already own the global subscriber.
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}
