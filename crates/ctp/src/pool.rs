//! Sharded constant pool.
//!
//! The pool is the interning table behind every canonical object. A key is
//! a component sequence seeded with its originating type; the first request
//! for a key creates the slot and every later request with an equal key
//! returns the same [`Handle`] and the same `'static` address.
//!
//! # Thread Safety
//! Each shard sits behind a `RwLock`. Lookups take the read lock; a miss
//! builds the canonical value with no lock held (reconstruction may
//! re-enter the pool), then re-checks under the write lock. The first
//! writer wins and later builders drop their value.

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::{Component, Handle, PoolConfig, Reflect, ReflectError, Serializer, TypeKey};

/// Type-erased canonical value, leaked on insertion.
type Erased = &'static (dyn Any + Send + Sync);

/// Shape of the value stored in a slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SlotForm {
    /// A single canonical object of the target type.
    Object,
    /// A contiguous canonical array of element targets.
    Array,
}

#[derive(Clone, PartialEq, Eq, Hash)]
struct PoolKey {
    form: SlotForm,
    parts: Box<[Component]>,
}

struct Slot {
    value: Erased,
    stored: TypeKey,
    key: PoolKey,
}

/// Per-shard storage.
struct PoolShard {
    /// Key to slot index.
    map: FxHashMap<PoolKey, u32>,
    /// Slots in creation order.
    slots: Vec<Slot>,
}

impl PoolShard {
    fn new() -> Self {
        Self {
            map: FxHashMap::default(),
            slots: Vec::with_capacity(64),
        }
    }
}

/// Session-lifetime interning table for canonical objects.
///
/// Slots are never mutated or freed: their values are leaked so that
/// canonical objects can be handed out as `&'static` references.
pub struct ConstantPool {
    shards: [RwLock<PoolShard>; Handle::NUM_SHARDS],
    /// Slots created across all shards.
    total: AtomicUsize,
    config: PoolConfig,
}

impl ConstantPool {
    /// Create an empty pool with the default configuration.
    pub fn new() -> Self {
        Self::with_config(PoolConfig::new())
    }

    /// Create an empty pool.
    pub fn with_config(config: PoolConfig) -> Self {
        Self {
            shards: std::array::from_fn(|_| RwLock::new(PoolShard::new())),
            total: AtomicUsize::new(0),
            config,
        }
    }

    /// The process-wide session pool, configured from the environment.
    pub fn global() -> &'static ConstantPool {
        static GLOBAL: OnceLock<ConstantPool> = OnceLock::new();
        GLOBAL.get_or_init(|| ConstantPool::with_config(PoolConfig::from_env()))
    }

    /// This pool's configuration.
    #[inline]
    pub fn config(&self) -> PoolConfig {
        self.config
    }

    /// A root reflection context over this pool.
    #[inline]
    pub fn cx(&self) -> ReflectCx<'_> {
        ReflectCx {
            pool: self,
            depth: 0,
        }
    }

    /// Canonicalize `value`.
    pub fn reflect_constant<T: Reflect>(
        &self,
        value: &T,
    ) -> Result<Constant<T::Target>, ReflectError> {
        value.reflect_constant(self.cx())
    }

    /// Canonicalize `value` and return the canonical object itself.
    pub fn define_static_object<T: Reflect>(
        &self,
        value: &T,
    ) -> Result<&'static T::Target, ReflectError> {
        self.reflect_constant(value).map(Constant::get)
    }

    #[inline]
    fn shard_for(key: &PoolKey) -> usize {
        let mut hasher = rustc_hash::FxHasher::default();
        key.hash(&mut hasher);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "only the low bits pick a shard"
        )]
        let hash = hasher.finish() as usize;
        hash % Handle::NUM_SHARDS
    }

    /// Intern `parts`, building the slot's value with `build` on first use.
    ///
    /// `build` runs with no lock held. If another request created the slot
    /// in the meantime, its value wins and ours is dropped.
    pub(crate) fn intern(
        &self,
        form: SlotForm,
        parts: &[Component],
        stored: TypeKey,
        build: impl FnOnce() -> Result<Box<dyn Any + Send + Sync>, ReflectError>,
    ) -> Result<Handle, ReflectError> {
        let key = PoolKey {
            form,
            parts: parts.into(),
        };
        let shard_idx = Self::shard_for(&key);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "shard indices are below Handle::NUM_SHARDS"
        )]
        let shard_u32 = shard_idx as u32;
        let shard = &self.shards[shard_idx];

        // Existing slot
        if let Some(&local) = shard.read().map.get(&key) {
            return Ok(Handle::new(shard_u32, local));
        }

        let value = build()?;

        let mut guard = shard.write();

        // Another request may have created it while we built ours
        if let Some(&local) = guard.map.get(&key) {
            return Ok(Handle::new(shard_u32, local));
        }

        let count = guard.slots.len();
        let local = u32::try_from(count)
            .ok()
            .filter(|&local| local <= Handle::MAX_LOCAL)
            .ok_or(ReflectError::ShardOverflow {
                shard: shard_idx,
                count,
            })?;

        let handle = Handle::new(shard_u32, local);
        tracing::trace!(?handle, ?form, ty = stored.name(), "new canonical slot");

        guard.slots.push(Slot {
            value: Box::leak(value),
            stored,
            key: key.clone(),
        });
        guard.map.insert(key, local);
        self.total.fetch_add(1, Ordering::Relaxed);

        Ok(handle)
    }

    fn with_slot<R>(&self, handle: Handle, f: impl FnOnce(&Slot) -> R) -> Result<R, ReflectError> {
        let guard = self.shards[handle.shard()].read();
        guard
            .slots
            .get(handle.local())
            .map(f)
            .ok_or(ReflectError::UnknownHandle { handle })
    }

    /// The canonical object stored at `handle`.
    pub fn object<T: Any>(&self, handle: Handle) -> Result<&'static T, ReflectError> {
        let (value, stored) = self.with_slot(handle, |slot| (slot.value, slot.stored))?;
        value
            .downcast_ref::<T>()
            .ok_or(ReflectError::TypeMismatch {
                handle,
                expected: std::any::type_name::<T>(),
                found: stored.name(),
            })
    }

    /// The canonical array stored at `handle`.
    pub fn array<E: Any>(&self, handle: Handle) -> Result<&'static [E], ReflectError> {
        self.object::<Box<[E]>>(handle).map(|boxed| &**boxed)
    }

    /// The component sequence that keys `handle`, seed included.
    pub fn components(&self, handle: Handle) -> Result<Box<[Component]>, ReflectError> {
        self.with_slot(handle, |slot| slot.key.parts.clone())
    }

    /// Whether `handle` names an object or an array.
    pub fn form(&self, handle: Handle) -> Result<SlotForm, ReflectError> {
        self.with_slot(handle, |slot| slot.key.form)
    }

    /// The Rust type stored at `handle`.
    pub fn stored_type(&self, handle: Handle) -> Result<TypeKey, ReflectError> {
        self.with_slot(handle, |slot| slot.stored)
    }

    /// Number of canonical objects and arrays.
    pub fn len(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    /// Whether nothing has been interned yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ConstantPool {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConstantPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstantPool")
            .field("len", &self.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Reflection context: a pool plus the current decomposition depth.
///
/// Every nested decomposition goes through [`ReflectCx::descend`], which
/// turns a cyclic decomposition into [`ReflectError::RecursionLimit`].
#[derive(Copy, Clone, Debug)]
pub struct ReflectCx<'p> {
    pool: &'p ConstantPool,
    depth: u32,
}

impl<'p> ReflectCx<'p> {
    #[inline]
    pub fn pool(self) -> &'p ConstantPool {
        self.pool
    }

    #[inline]
    pub fn depth(self) -> u32 {
        self.depth
    }

    /// Enter one level of decomposition for `ty`.
    pub fn descend(self, ty: TypeKey) -> Result<Self, ReflectError> {
        let limit = self.pool.config.max_depth;
        if self.depth >= limit {
            tracing::debug!(ty = ty.name(), limit, "canonicalization recursion limit reached");
            return Err(ReflectError::RecursionLimit {
                ty: ty.name(),
                limit,
            });
        }
        Ok(ReflectCx {
            pool: self.pool,
            depth: self.depth + 1,
        })
    }

    /// Canonicalize through `T`'s registry entry: decompose, intern, and
    /// reconstruct the target through `T::Forms` on first use.
    ///
    /// This is the default [`Reflect::reflect_constant`]; it ignores any
    /// override `T` makes.
    #[tracing::instrument(level = "trace", skip_all, fields(ty = std::any::type_name::<T>()))]
    pub fn canonicalize<T: Reflect>(self, value: &T) -> Result<Constant<T::Target>, ReflectError> {
        let mut s = Serializer::new::<T>(self)?;
        value.serialize(&mut s)?;
        s.finalize(value)
    }
}

/// A canonical object: its handle and its `'static` storage.
///
/// Two constants are equal exactly when they share a handle, in which case
/// they also share an address.
pub struct Constant<T: ?Sized + 'static> {
    handle: Handle,
    value: &'static T,
}

impl<T: ?Sized + 'static> Constant<T> {
    pub(crate) fn new(handle: Handle, value: &'static T) -> Self {
        Constant { handle, value }
    }

    #[inline]
    pub fn handle(self) -> Handle {
        self.handle
    }

    /// The canonical object.
    #[inline]
    pub fn get(self) -> &'static T {
        self.value
    }

    /// Whether both constants point at the same storage.
    #[inline]
    pub fn ptr_eq(self, other: Self) -> bool {
        std::ptr::eq(self.value, other.value)
    }
}

impl<T: ?Sized + 'static> Clone for Constant<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized + 'static> Copy for Constant<T> {}

impl<T: ?Sized + 'static> PartialEq for Constant<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl<T: ?Sized + 'static> Eq for Constant<T> {}

impl<T: ?Sized + 'static> Hash for Constant<T> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.handle.hash(state);
    }
}

impl<T: ?Sized + 'static> Deref for Constant<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        self.value
    }
}

impl<T: ?Sized + fmt::Debug + 'static> fmt::Debug for Constant<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constant")
            .field("handle", &self.handle)
            .field("value", &self.value)
            .finish()
    }
}

#[cfg(test)]
mod tests;
