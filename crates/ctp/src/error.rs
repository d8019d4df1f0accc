//! Canonicalization errors.
//!
//! Type-level failures (no strategy, no reconstruction form, unsafe
//! aggregate) are reported by the compiler. What remains here can only be
//! detected while a value is being decomposed.

use thiserror::Error;

use crate::{Component, Handle};

/// Error raised while canonicalizing or reconstructing a value.
///
/// Canonicalization is deterministic: a request that fails once fails the
/// same way on every retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReflectError {
    /// Shard exceeded capacity (over 268 million slots per shard).
    #[error("constant pool shard {shard} exceeded capacity: {count} slots, max is {max}", max = Handle::MAX_LOCAL)]
    ShardOverflow { shard: usize, count: usize },

    /// Decomposition nested deeper than the configured limit, either
    /// because it is cyclic or because the value is deep.
    #[error("canonicalizing `{ty}` nested deeper than the recursion limit of {limit}")]
    RecursionLimit { ty: &'static str, limit: u32 },

    /// A slot holds a different type than the caller asked for.
    #[error("slot {handle:?} holds `{found}`, expected `{expected}`")]
    TypeMismatch {
        handle: Handle,
        expected: &'static str,
        found: &'static str,
    },

    /// The handle does not name a slot of this pool.
    #[error("{handle:?} does not name a slot in this constant pool")]
    UnknownHandle { handle: Handle },

    /// Reconstruction ran out of components.
    #[error("reconstructing `{ty}` needed another component")]
    MissingComponent { ty: &'static str },

    /// Reconstruction found a component of the wrong kind.
    #[error("reconstructing `{ty}` expected a {expected} component, found {found:?}")]
    UnexpectedComponent {
        ty: &'static str,
        expected: &'static str,
        found: Component,
    },

    /// Reconstruction finished with components left over.
    #[error("reconstructing `{ty}` left {remaining} component(s) unused")]
    TrailingComponents { ty: &'static str, remaining: usize },

    /// A canonical byte array could not be viewed as text.
    #[error("canonical text is malformed: {reason}")]
    MalformedText { reason: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recursion_limit_names_type() {
        let err = ReflectError::RecursionLimit {
            ty: "Node",
            limit: 8,
        };
        assert_eq!(
            err.to_string(),
            "canonicalizing `Node` nested deeper than the recursion limit of 8"
        );
    }

    #[test]
    fn overflow_reports_capacity() {
        let err = ReflectError::ShardOverflow {
            shard: 3,
            count: 10,
        };
        assert!(err.to_string().contains("shard 3"));
        assert!(err.to_string().contains(&Handle::MAX_LOCAL.to_string()));
    }
}
