//! Shared `(type tag, key) -> value` table for one resolution pass.
//!
//! # Invariants
//!
//! - Writers take the exclusive lock, readers the shared lock; neither is held
//!   across an await point.
//! - Every binding change wakes all [`Registry::wait_for`] callers.

use std::collections::hash_map::Entry;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap as HashMap;
use tokio::sync::Notify;

use crate::{DuplicatePolicy, Insert, Key, RegistryError, TypeTag};

struct Shared<V> {
	policy: DuplicatePolicy,
	entries: RwLock<HashMap<(TypeTag, Key), V>>,
	changed: Notify,
}

/// Cloneable handle to one scope-bounded registry.
///
/// Clones share the same table; dropping the last handle discards it.
pub struct Registry<V> {
	shared: Arc<Shared<V>>,
}

impl<V> Clone for Registry<V> {
	fn clone(&self) -> Self {
		Self {
			shared: Arc::clone(&self.shared),
		}
	}
}

impl<V> std::fmt::Debug for Registry<V> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Registry")
			.field("policy", &self.shared.policy)
			.field("len", &self.shared.entries.read().len())
			.finish()
	}
}

impl<V: Clone> Default for Registry<V> {
	fn default() -> Self {
		Self::new()
	}
}

impl<V: Clone> Registry<V> {
	/// Creates an empty registry that rejects duplicate keys.
	pub fn new() -> Self {
		Self::with_policy(DuplicatePolicy::default())
	}

	/// Creates an empty registry with the given duplicate policy.
	pub fn with_policy(policy: DuplicatePolicy) -> Self {
		Self {
			shared: Arc::new(Shared {
				policy,
				entries: RwLock::new(HashMap::default()),
				changed: Notify::new(),
			}),
		}
	}

	/// Policy applied when a key is put twice.
	pub fn policy(&self) -> DuplicatePolicy {
		self.shared.policy
	}

	/// Binds `(ty, key)` to `value`, applying the duplicate policy on collision.
	pub fn put(&self, ty: TypeTag, key: Key, value: V) -> Result<Insert, RegistryError> {
		let outcome = {
			let mut entries = self.shared.entries.write();
			match entries.entry((ty, key.clone())) {
				Entry::Vacant(slot) => {
					slot.insert(value);
					Insert::Inserted
				}
				Entry::Occupied(mut slot) => match self.shared.policy {
					DuplicatePolicy::Reject => {
						tracing::warn!(%ty, %key, policy = self.shared.policy.as_str(), "registry.duplicate");
						return Err(RegistryError::Duplicate { ty, key });
					}
					DuplicatePolicy::FirstWins => Insert::KeptExisting,
					DuplicatePolicy::LastWins => {
						slot.insert(value);
						Insert::ReplacedExisting
					}
				},
			}
		};

		tracing::trace!(%ty, %key, ?outcome, "registry.put");
		if outcome != Insert::KeptExisting {
			self.shared.changed.notify_waiters();
		}
		Ok(outcome)
	}

	/// Looks up `(ty, key)`.
	pub fn get(&self, ty: TypeTag, key: &Key) -> Result<V, RegistryError> {
		self.try_get(ty, key).ok_or_else(|| RegistryError::Unresolved { ty, key: key.clone() })
	}

	/// Looks up `(ty, key)`, returning `None` when absent.
	pub fn try_get(&self, ty: TypeTag, key: &Key) -> Option<V> {
		self.shared.entries.read().get(&(ty, key.clone())).cloned()
	}

	/// Returns whether `(ty, key)` is bound.
	pub fn contains(&self, ty: TypeTag, key: &Key) -> bool {
		self.shared.entries.read().contains_key(&(ty, key.clone()))
	}

	/// Number of bindings across all tags.
	pub fn len(&self) -> usize {
		self.shared.entries.read().len()
	}

	/// Returns whether nothing has been registered.
	pub fn is_empty(&self) -> bool {
		self.shared.entries.read().is_empty()
	}

	/// Returns every key registered under `ty`, sorted.
	pub fn keys(&self, ty: TypeTag) -> Vec<Key> {
		let mut keys: Vec<_> = self
			.shared
			.entries
			.read()
			.keys()
			.filter(|(tag, _)| *tag == ty)
			.map(|(_, key)| key.clone())
			.collect();
		keys.sort();
		keys
	}

	/// Returns a snapshot of all bindings sorted by tag, then key.
	pub fn entries(&self) -> Vec<(TypeTag, Key, V)> {
		let mut entries: Vec<_> = self
			.shared
			.entries
			.read()
			.iter()
			.map(|((ty, key), value)| (*ty, key.clone(), value.clone()))
			.collect();
		entries.sort_by(|a, b| (a.0, &a.1).cmp(&(b.0, &b.1)));
		entries
	}

	/// Waits until `(ty, key)` is bound and returns its value.
	///
	/// Never times out on its own; callers bound the wait.
	pub async fn wait_for(&self, ty: TypeTag, key: &Key) -> V {
		loop {
			let mut notified = std::pin::pin!(self.shared.changed.notified());
			// Register before checking so an insert between the check and the
			// await still wakes us.
			notified.as_mut().enable();
			if let Some(value) = self.try_get(ty, key) {
				return value;
			}
			notified.await;
		}
	}
}
