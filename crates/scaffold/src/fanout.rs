use std::future::Future;

use tokio::task::{JoinError, JoinSet};
use trellis_registry::TypeTag;

/// Per-composite wrapper over a Tokio [`JoinSet`].
///
/// Dropping the set aborts every task still in it, so an early return from a
/// composite cancels its unfinished children.
#[derive(Debug)]
pub(crate) struct FanOut<T> {
	ty: TypeTag,
	inner: JoinSet<T>,
}

impl<T> FanOut<T>
where
	T: Send + 'static,
{
	/// Creates an empty set for children of `ty`.
	pub fn new(ty: TypeTag) -> Self {
		Self { ty, inner: JoinSet::new() }
	}

	/// Children not yet joined.
	pub fn len(&self) -> usize {
		self.inner.len()
	}

	/// Spawns one child resolution on the current runtime.
	pub fn spawn<F>(&mut self, fut: F)
	where
		F: Future<Output = T> + Send + 'static,
	{
		tracing::trace!(ty = %self.ty, pending = self.inner.len(), "resolve.fanout.spawn");
		self.inner.spawn(fut);
	}

	/// Waits for the next completed child.
	pub async fn join_next(&mut self) -> Option<Result<T, JoinError>> {
		self.inner.join_next().await
	}

	/// Aborts every child still running.
	pub fn abort_all(&mut self) {
		if !self.inner.is_empty() {
			tracing::debug!(ty = %self.ty, pending = self.inner.len(), "resolve.fanout.abort");
		}
		self.inner.abort_all();
	}
}
