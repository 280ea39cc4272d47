//! Processor configuration.
//!
//! Everything here has a working default; with the `serde` feature the
//! configuration can also be read from TOML:
//!
//! ```toml
//! dialect = "h2"
//! escapeChar = "!"
//! maxExpandDepth = 3
//! defaultPageSize = 100
//! ```

use relgraph_types::Dialect;

use crate::error::{Error, Result};

/// Reserved pattern characters that can never be used as the escape character.
const PATTERN_WILDCARDS: [char; 2] = ['%', '_'];

// ============================================================================
// ProcessorConfig
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase", deny_unknown_fields))]
pub struct ProcessorConfig {
    /// Selects the translation hooks and the placeholder style
    pub dialect: Dialect,
    /// Escape character used for wildcard escaping in LIKE patterns
    pub escape_char: char,
    /// Maximum nesting of `$expand` levels below the root
    pub max_expand_depth: usize,
    /// Applied as `$top` when a request does not carry one
    pub default_page_size: Option<u64>,
    /// Treat `NULL`/`Null` literals like `null`
    pub case_insensitive_null: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::Default,
            escape_char: '\\',
            max_expand_depth: 5,
            default_page_size: None,
            case_insensitive_null: false,
        }
    }
}

impl ProcessorConfig {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    pub fn with_escape_char(mut self, escape_char: char) -> Self {
        self.escape_char = escape_char;
        self
    }

    pub fn with_max_expand_depth(mut self, depth: usize) -> Self {
        self.max_expand_depth = depth;
        self
    }

    pub fn with_default_page_size(mut self, size: u64) -> Self {
        self.default_page_size = Some(size);
        self
    }

    /// Parses and validates a TOML document.
    #[cfg(feature = "serde")]
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    #[cfg(feature = "serde")]
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if PATTERN_WILDCARDS.contains(&self.escape_char) || self.escape_char == '\'' {
            return Err(Error::Config(format!(
                "escape character '{}' is reserved",
                self.escape_char
            )));
        }
        if self.max_expand_depth == 0 {
            return Err(Error::Config("maxExpandDepth must be at least 1".into()));
        }
        if self.default_page_size == Some(0) {
            return Err(Error::Config("defaultPageSize must be positive".into()));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
