//! Constant pool configuration.

/// Environment variable overriding [`PoolConfig::max_depth`].
pub const MAX_DEPTH_VAR: &str = "CTP_MAX_DEPTH";

/// Limits applied while canonicalizing into a pool.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    /// Maximum nesting of decompositions before a request fails with
    /// [`ReflectError::RecursionLimit`](crate::ReflectError::RecursionLimit).
    pub max_depth: u32,
}

impl PoolConfig {
    /// Default nesting limit, matching the usual constant-evaluation depth.
    pub const DEFAULT_MAX_DEPTH: u32 = 512;

    /// Default configuration.
    pub const fn new() -> Self {
        PoolConfig {
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    /// Default configuration, with `CTP_MAX_DEPTH` applied when set.
    ///
    /// An unparsable value is reported and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::new();
        if let Ok(raw) = std::env::var(MAX_DEPTH_VAR) {
            match raw.trim().parse::<u32>() {
                Ok(depth) if depth > 0 => config.max_depth = depth,
                _ => tracing::warn!(
                    value = %raw,
                    default = config.max_depth,
                    "ignoring invalid {MAX_DEPTH_VAR}"
                ),
            }
        }
        config
    }

    /// Replace the nesting limit.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_depth() {
        assert_eq!(PoolConfig::default().max_depth, PoolConfig::DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn with_max_depth_overrides() {
        assert_eq!(PoolConfig::new().with_max_depth(7).max_depth, 7);
    }
}
