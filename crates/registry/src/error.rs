use crate::{Key, TypeTag};

/// Registry lookup and registration failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
	/// No value registered under `(ty, key)`.
	#[error("no {ty} registered under key {key}")]
	Unresolved { ty: TypeTag, key: Key },
	/// A second registration under [`crate::DuplicatePolicy::Reject`].
	#[error("{ty} with key {key} registered twice")]
	Duplicate { ty: TypeTag, key: Key },
}
