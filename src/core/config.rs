//! Runtime configuration for the scripting host.
//!
//! Callers build a `ScriptConfig` once at startup and hand it to
//! [`LuaHost::with_config`](crate::script::LuaHost::with_config).

use serde::{Deserialize, Serialize};

/// Configuration for the embedded script runtime used by scripted markers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptConfig {
    /// Restrict the script standard library to `table`, `string` and `math`.
    pub sandboxed: bool,

    /// Maximum script heap size in bytes. `None` for no limit.
    pub memory_limit: Option<usize>,

    /// Prefix for chunk names in script error messages.
    pub chunk_prefix: String,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            sandboxed: true,
            memory_limit: None,
            chunk_prefix: "marker".to_string(),
        }
    }
}

impl ScriptConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the full standard library instead of the sandboxed subset.
    #[must_use]
    pub fn unsandboxed(mut self) -> Self {
        self.sandboxed = false;
        self
    }

    /// Cap the script heap (builder pattern).
    #[must_use]
    pub fn with_memory_limit(mut self, bytes: usize) -> Self {
        self.memory_limit = Some(bytes);
        self
    }

    /// Set the chunk name prefix (builder pattern).
    #[must_use]
    pub fn with_chunk_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.chunk_prefix = prefix.into();
        self
    }

    /// Chunk name for a script evaluated in `context`.
    #[must_use]
    pub fn chunk_name(&self, context: &str) -> String {
        if context.is_empty() {
            self.chunk_prefix.clone()
        } else {
            format!("{}:{}", self.chunk_prefix, context)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScriptConfig::new();
        assert!(config.sandboxed);
        assert_eq!(config.memory_limit, None);
        assert_eq!(config.chunk_name(""), "marker");
    }

    #[test]
    fn test_builder() {
        let config = ScriptConfig::new()
            .unsandboxed()
            .with_memory_limit(1 << 20)
            .with_chunk_prefix("vault");

        assert!(!config.sandboxed);
        assert_eq!(config.memory_limit, Some(1 << 20));
        assert_eq!(config.chunk_name("altar.des"), "vault:altar.des");
    }

    #[test]
    fn test_serialization() {
        let config = ScriptConfig::new().with_memory_limit(4096);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: ScriptConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
