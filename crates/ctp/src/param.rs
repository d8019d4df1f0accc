//! Identifier facade.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::Deref;

use crate::{Constant, ConstantPool, Handle, Reflect, ReflectError};

/// A source value bound to its canonical target.
///
/// Two `Param`s over the same pool compare equal exactly when their
/// source values were equal, and then [`get`](Param::get) returns the same
/// address for both.
pub struct Param<T: Reflect> {
    constant: Constant<T::Target>,
    source: PhantomData<fn(&T)>,
}

impl<T: Reflect> Param<T> {
    /// Canonicalize `value` in the global session pool.
    pub fn new(value: &T) -> Result<Self, ReflectError> {
        Self::in_pool(ConstantPool::global(), value)
    }

    /// Canonicalize `value` in `pool`.
    pub fn in_pool(pool: &ConstantPool, value: &T) -> Result<Self, ReflectError> {
        Ok(Param {
            constant: pool.reflect_constant(value)?,
            source: PhantomData,
        })
    }

    /// The canonical object.
    #[inline]
    pub fn get(&self) -> &'static T::Target {
        self.constant.get()
    }

    #[inline]
    pub fn handle(&self) -> Handle {
        self.constant.handle()
    }

    #[inline]
    pub fn constant(&self) -> Constant<T::Target> {
        self.constant
    }
}

impl<T: Reflect> Clone for Param<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Reflect> Copy for Param<T> {}

impl<T: Reflect> PartialEq for Param<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.constant == other.constant
    }
}

impl<T: Reflect> Eq for Param<T> {}

impl<T: Reflect> Hash for Param<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.constant.hash(state);
    }
}

impl<T: Reflect> Deref for Param<T> {
    type Target = T::Target;

    #[inline]
    fn deref(&self) -> &T::Target {
        self.constant.get()
    }
}

impl<T: Reflect> fmt::Debug for Param<T>
where
    T::Target: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Param").field(self.get()).finish()
    }
}
