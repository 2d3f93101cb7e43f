//! Resolution settings.
//!
//! Format-neutral types with a TOML loader:
//!
//! ```toml
//! duplicate_keys = "reject"
//! cancel_siblings_on_failure = true
//!
//! [forward_references]
//! mode = "await"
//! timeout_ms = 250
//! ```

use std::time::Duration;

use serde::Deserialize;
use trellis_registry::DuplicatePolicy;

/// How a reference behaves when its referent is not registered yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ForwardRefs {
	/// Look up once; absent means [`crate::ResolveError::UnresolvedReference`].
	#[default]
	FailFast,
	/// Wait up to `timeout_ms` for the referent to be registered.
	Await { timeout_ms: u64 },
}

impl ForwardRefs {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::FailFast => "fail_fast",
			Self::Await { .. } => "await",
		}
	}

	/// Maximum wait for a referent; `None` in fail-fast mode.
	pub const fn timeout(self) -> Option<Duration> {
		match self {
			Self::FailFast => None,
			Self::Await { timeout_ms } => Some(Duration::from_millis(timeout_ms)),
		}
	}
}

/// Settings for one top-level resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolveConfig {
	/// Policy for the registry a [`crate::Scaffolder`] creates.
	pub duplicate_keys: DuplicatePolicy,
	/// Behavior of references whose key is not registered yet.
	pub forward_references: ForwardRefs,
	/// Abort still-running siblings once one child fails.
	pub cancel_siblings_on_failure: bool,
}

impl Default for ResolveConfig {
	fn default() -> Self {
		Self {
			duplicate_keys: DuplicatePolicy::Reject,
			forward_references: ForwardRefs::FailFast,
			cancel_siblings_on_failure: true,
		}
	}
}

impl ResolveConfig {
	/// Parses a config from TOML; absent keys keep their defaults.
	pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(source)?)
	}

	/// Sets the duplicate-key policy.
	pub fn with_duplicate_keys(mut self, policy: DuplicatePolicy) -> Self {
		self.duplicate_keys = policy;
		self
	}

	/// Sets how references to unregistered keys behave.
	pub fn with_forward_references(mut self, mode: ForwardRefs) -> Self {
		self.forward_references = mode;
		self
	}

	/// Sets whether running siblings are aborted after a failure.
	pub fn with_cancel_siblings_on_failure(mut self, cancel: bool) -> Self {
		self.cancel_siblings_on_failure = cancel;
		self
	}
}

/// Failure to load a [`ResolveConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("invalid resolve config: {0}")]
	Toml(#[from] toml::de::Error),
}
