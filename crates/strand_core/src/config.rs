//! # List Configuration
//!
//! Per-list settings, loaded once at construction time from TOML.
//!
//! ```toml
//! name = "tours"
//! initial_capacity = 256
//! channel_capacity = 1024
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{ListError, ListResult};

/// Configuration for a [`ConcurrentList`](crate::ConcurrentList).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListConfig {
    /// Label attached to every log event emitted by the list.
    pub name: String,
    /// Node slots reserved up front. At most
    /// [`ListConfig::MAX_INITIAL_CAPACITY`].
    pub initial_capacity: usize,
    /// Bound for channel subscribers. `None` means unbounded.
    pub channel_capacity: Option<usize>,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            name: "list".to_string(),
            initial_capacity: 0,
            channel_capacity: None,
        }
    }
}

impl ListConfig {
    /// Largest accepted `initial_capacity`: node slots are addressed by `u32`.
    pub const MAX_INITIAL_CAPACITY: usize = u32::MAX as usize;

    /// Creates a default configuration with the given name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parses and validates a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::InvalidConfig`] if the text is not valid TOML,
    /// contains unknown keys, or fails [`ListConfig::validate`].
    pub fn from_toml_str(text: &str) -> ListResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| ListError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::InvalidConfig`] if the file cannot be read or
    /// its contents are rejected by [`ListConfig::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> ListResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ListError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Checks invariants serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::InvalidConfig`] for an empty name, an initial
    /// capacity above [`ListConfig::MAX_INITIAL_CAPACITY`], or a zero
    /// channel capacity.
    pub fn validate(&self) -> ListResult<()> {
        if self.name.trim().is_empty() {
            return Err(ListError::InvalidConfig("name must not be empty".to_string()));
        }
        if self.initial_capacity > Self::MAX_INITIAL_CAPACITY {
            return Err(ListError::InvalidConfig(format!(
                "initial_capacity must be at most {}, got {}",
                Self::MAX_INITIAL_CAPACITY,
                self.initial_capacity
            )));
        }
        if self.channel_capacity == Some(0) {
            return Err(ListError::InvalidConfig(
                "channel_capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
