//! Stack growth for nested decompositions.
//!
//! A decomposition recurses once per nesting level of the source value, up
//! to [`PoolConfig::max_depth`](crate::PoolConfig::max_depth) levels. Each
//! level is wrapped in [`ensure_sufficient_stack`] so that the configured
//! limit, not the thread's stack size, decides when a request fails.

/// Remaining stack below which we grow (64KB).
const RED_ZONE: usize = 64 * 1024;

/// Size of each new stack segment (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
///
/// On wasm32 this calls `f` directly.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM version: the host manages the stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
