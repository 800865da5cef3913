//! Engine configuration.
//!
//! # Environment Variables
//!
//! - `EXPERT_STRICT` - If set, malformed lines and a missing fact line are fatal
//! - `EXPERT_RENDER_DEPTH` - Depth limit for rendered justification trees

use serde::{Deserialize, Serialize};

/// Environment variable enabling strict loading.
pub const ENV_STRICT: &str = "EXPERT_STRICT";
/// Environment variable holding the render depth limit.
pub const ENV_RENDER_DEPTH: &str = "EXPERT_RENDER_DEPTH";

/// How the loader treats malformed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Strictness {
    /// Malformed lines are logged and skipped; a missing fact line leaves
    /// every fact at its default.
    #[default]
    Lenient,
    /// Malformed lines and a missing fact line abort loading.
    Strict,
}

/// Configuration shared by the loader, the engine and the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub strictness: Strictness,
    /// Justification trees are rendered down to this depth; deeper
    /// subtrees are collapsed into their value. `None` renders everything.
    pub render_depth: Option<usize>,
}

impl Config {
    /// Returns the lenient default configuration.
    pub fn lenient() -> Self {
        Self::default()
    }

    /// Returns a configuration rejecting any malformed input.
    pub fn strict() -> Self {
        Self {
            strictness: Strictness::Strict,
            ..Self::default()
        }
    }

    /// Creates a `Config` from environment variables.
    ///
    /// Unparseable values are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// # use expert_logic::Config;
    /// std::env::set_var("EXPERT_RENDER_DEPTH", "3");
    ///
    /// let config = Config::from_env();
    /// assert_eq!(config.render_depth, Some(3));
    /// # std::env::remove_var("EXPERT_RENDER_DEPTH");
    /// ```
    pub fn from_env() -> Self {
        let mut config = if std::env::var(ENV_STRICT).is_ok() {
            Self::strict()
        } else {
            Self::lenient()
        };

        if let Ok(depth_str) = std::env::var(ENV_RENDER_DEPTH) {
            if let Ok(depth) = depth_str.parse::<usize>() {
                config.render_depth = Some(depth);
            }
        }

        config
    }

    /// Sets the strictness.
    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    /// Sets the render depth limit.
    pub fn with_render_depth(mut self, depth: Option<usize>) -> Self {
        self.render_depth = depth;
        self
    }

    /// Returns `true` if loading is strict.
    pub fn is_strict(&self) -> bool {
        self.strictness == Strictness::Strict
    }
}
