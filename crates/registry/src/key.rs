use std::fmt;
use std::sync::Arc;

/// Natural key of a registered value.
///
/// Only hashable scalars qualify; floats and composite values never do.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
	Bool(bool),
	Int(i64),
	Str(Arc<str>),
}

impl Key {
	/// Returns the string payload, if this is a string key.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Str(s) => Some(s),
			_ => None,
		}
	}
}

impl fmt::Display for Key {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Bool(b) => write!(f, "{b}"),
			Self::Int(i) => write!(f, "{i}"),
			Self::Str(s) => write!(f, "{s:?}"),
		}
	}
}

impl From<&str> for Key {
	fn from(value: &str) -> Self {
		Self::Str(Arc::from(value))
	}
}

impl From<String> for Key {
	fn from(value: String) -> Self {
		Self::Str(Arc::from(value))
	}
}

impl From<i64> for Key {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<i32> for Key {
	fn from(value: i32) -> Self {
		Self::Int(i64::from(value))
	}
}

impl From<bool> for Key {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}
