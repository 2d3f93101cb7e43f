use std::fmt::Write as _;

use trellis_registry::{Key, RegistryError, TypeTag};

use crate::ValueError;

/// Failure of a resolve call. Every variant is fatal to the enclosing
/// top-level resolution.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolveError {
	/// A required field was never set. Raised before any child is launched.
	#[error("missing required field `{field}` on `{ty}`")]
	MissingRequiredField { ty: TypeTag, field: &'static str },
	/// A slot names a field the type does not declare.
	#[error("`{ty}` has no field `{field}`")]
	UnknownField { ty: TypeTag, field: &'static str },
	/// A list field holds a single node, or a scalar field holds a list.
	#[error("`{ty}.{field}` expects {expected}")]
	SlotShape {
		ty: TypeTag,
		field: &'static str,
		expected: &'static str,
	},
	/// No `(ty, key)` entry in the registry at lookup time.
	#[error("unresolved reference to {ty} {key}")]
	UnresolvedReference { ty: TypeTag, key: Key },
	/// Registration collided under [`trellis_registry::DuplicatePolicy::Reject`].
	#[error("{ty} {key} registered twice")]
	DuplicateKey { ty: TypeTag, key: Key },
	/// The key field resolved to something that cannot be a key.
	#[error("key field `{field}` of `{ty}` holds a {found}, which cannot be a key")]
	InvalidKey {
		ty: TypeTag,
		field: &'static str,
		found: &'static str,
	},
	/// A nested resolution failed.
	#[error("failed to resolve `{ty}.{field}`")]
	ChildResolution {
		ty: TypeTag,
		field: &'static str,
		/// Element index when the field is a list.
		index: Option<usize>,
		#[source]
		source: Box<ResolveError>,
	},
	#[error(transparent)]
	Conversion(#[from] ValueError),
	/// A child task panicked or was cancelled outside our control.
	#[error("resolution task under `{ty}` failed: {message}")]
	TaskFailed { ty: TypeTag, message: String },
}

impl ResolveError {
	/// Innermost error beneath any [`ResolveError::ChildResolution`] wrappers.
	pub fn root_cause(&self) -> &ResolveError {
		let mut current = self;
		while let Self::ChildResolution { source, .. } = current {
			current = &**source;
		}
		current
	}

	/// Field path from the outermost type down to the failing child,
	/// e.g. `pipeline.steps[1].needs[0]`. Empty for unwrapped errors.
	pub fn path(&self) -> String {
		let mut path = String::new();
		let mut current = self;
		while let Self::ChildResolution { ty, field, index, source } = current {
			if path.is_empty() {
				path.push_str(ty.as_str());
			}
			let _ = write!(path, ".{field}");
			if let Some(index) = index {
				let _ = write!(path, "[{index}]");
			}
			current = &**source;
		}
		path
	}
}

impl From<RegistryError> for ResolveError {
	fn from(err: RegistryError) -> Self {
		match err {
			RegistryError::Unresolved { ty, key } => Self::UnresolvedReference { ty, key },
			RegistryError::Duplicate { ty, key } => Self::DuplicateKey { ty, key },
		}
	}
}
