//! Canonical object handles.
//!
//! Provides compact 32-bit slot handles. Two canonicalization requests that
//! produce the same `Handle` produced the same canonical object.

use std::fmt;

/// Handle of a slot in a [`ConstantPool`](crate::ConstantPool).
///
/// The top [`SHARD_BITS`](Handle::SHARD_BITS) bits select the shard, the
/// rest index the slot inside it. Handles are only meaningful for the pool
/// that issued them.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Handle(u32);

impl Handle {
    /// Bits spent on the shard index.
    pub const SHARD_BITS: u32 = 4;

    /// Number of shards a pool is split into.
    pub const NUM_SHARDS: usize = 1 << Self::SHARD_BITS;

    /// Largest slot index a shard can hand out.
    pub const MAX_LOCAL: u32 = u32::MAX >> Self::SHARD_BITS;

    const LOCAL_BITS: u32 = u32::BITS - Self::SHARD_BITS;

    #[inline]
    pub const fn new(shard: u32, local: u32) -> Self {
        debug_assert!((shard as usize) < Self::NUM_SHARDS);
        debug_assert!(local <= Self::MAX_LOCAL);
        Handle((shard << Self::LOCAL_BITS) | local)
    }

    /// Shard the slot lives in.
    #[inline]
    pub const fn shard(self) -> usize {
        (self.0 >> Self::LOCAL_BITS) as usize
    }

    /// Slot index inside its shard.
    #[inline]
    pub const fn local(self) -> usize {
        (self.0 & Self::MAX_LOCAL) as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}:{})", self.shard(), self.local())
    }
}
