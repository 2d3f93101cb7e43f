use std::fmt;
use std::marker::PhantomData;

use trellis_registry::Key;

use crate::resolve::ResolveCx;
use crate::{ForwardRefs, Model, RefTarget, ResolveError, Value};

/// Named placeholder for a keyed `T` registered elsewhere in the same pass.
pub struct Reference<T> {
	key: Key,
	_marker: PhantomData<fn() -> T>,
}

impl<T: Model> Reference<T> {
	/// Refers to the `T` registered under `key`.
	pub fn new(key: impl Into<Key>) -> Self {
		Self {
			key: key.into(),
			_marker: PhantomData,
		}
	}

	/// Natural key being referred to.
	pub fn key(&self) -> &Key {
		&self.key
	}

	/// Untyped `(tag, key)` target.
	pub fn target(&self) -> RefTarget {
		RefTarget {
			ty: T::def().tag,
			key: self.key.clone(),
		}
	}
}

impl<T> Clone for Reference<T> {
	fn clone(&self) -> Self {
		Self {
			key: self.key.clone(),
			_marker: PhantomData,
		}
	}
}

impl<T> PartialEq for Reference<T> {
	fn eq(&self, other: &Self) -> bool {
		self.key == other.key
	}
}

impl<T> fmt::Debug for Reference<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Reference").field(&self.key).finish()
	}
}

/// Resolves a reference by registry lookup. Never recurses, never registers.
pub(crate) async fn lookup(target: RefTarget, cx: &ResolveCx) -> Result<Value, ResolveError> {
	tracing::trace!(%target, mode = cx.config.forward_references.as_str(), "resolve.reference");
	match cx.config.forward_references {
		ForwardRefs::FailFast => Ok(cx.registry.get(target.ty, &target.key)?),
		ForwardRefs::Await { .. } => {
			let timeout = cx.config.forward_references.timeout().unwrap_or_default();
			let found = tokio::time::timeout(timeout, cx.registry.wait_for(target.ty, &target.key)).await;
			found.map_err(|_| {
				tracing::debug!(%target, ?timeout, "resolve.reference.timeout");
				ResolveError::UnresolvedReference {
					ty: target.ty,
					key: target.key.clone(),
				}
			})
		}
	}
}
