use serde::Deserialize;

/// What happens when a key is registered twice under the same type tag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
	/// Fail the second registration.
	#[default]
	Reject,
	/// Keep the first value registered for a key.
	FirstWins,
	/// Overwrite with the last value registered.
	LastWins,
}

impl DuplicatePolicy {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Reject => "reject",
			Self::FirstWins => "first_wins",
			Self::LastWins => "last_wins",
		}
	}
}

/// Outcome of a successful [`crate::Registry::put`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insert {
	/// No prior binding existed.
	Inserted,
	/// Existing binding kept; incoming dropped.
	KeptExisting,
	/// Existing binding replaced by incoming.
	ReplacedExisting,
}
