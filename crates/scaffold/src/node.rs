//! Scaffold trees: the intermediate form between a spec and a resolved value.
//!
//! # Invariants
//!
//! - A [`Scaffold`] is exactly one of three shapes; the resolver matches on
//!   all three in one place.
//! - An absent slot in a [`Composite`] means the field was omitted. What that
//!   means at resolve time is decided by the field's [`crate::FieldKind`].

use std::fmt;
use std::marker::PhantomData;

use indexmap::IndexMap;
use trellis_registry::{Key, TypeTag};

use crate::{FromValue, IntoValue, Model, Reference, Registry, ResolveConfig, ResolveError, TypeDef, Value, ValueError, resolve};

/// One not-yet-finalized value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scaffold {
	/// Already resolved; resolves to itself.
	Value(Value),
	/// Awaiting resolution of its children.
	Composite(Composite),
	/// Resolves by registry lookup.
	Reference(RefTarget),
}

/// Untyped reference target: the referent's type tag and natural key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RefTarget {
	pub ty: TypeTag,
	pub key: Key,
}

impl fmt::Display for RefTarget {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}({})", self.ty, self.key)
	}
}

/// Contents of one populated field.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
	Single(Scaffold),
	List(Vec<Scaffold>),
}

/// Partially populated shell of one composite value.
#[derive(Clone)]
pub struct Composite {
	def: &'static TypeDef,
	slots: IndexMap<&'static str, Slot>,
}

impl Composite {
	/// Creates an empty shell with every field omitted.
	pub fn new(def: &'static TypeDef) -> Self {
		Self {
			def,
			slots: IndexMap::new(),
		}
	}

	/// Type this shell builds.
	pub fn def(&self) -> &'static TypeDef {
		self.def
	}

	/// Populated slot for `name`, if any.
	pub fn slot(&self, name: &str) -> Option<&Slot> {
		self.slots.get(name)
	}

	/// Populated slots in insertion order.
	pub fn slots(&self) -> impl Iterator<Item = (&'static str, &Slot)> {
		self.slots.iter().map(|(name, slot)| (*name, slot))
	}

	/// Returns whether every field is omitted.
	pub fn is_empty(&self) -> bool {
		self.slots.is_empty()
	}

	/// Replaces the slot for `name` with a single node.
	pub fn set(&mut self, name: &'static str, node: Scaffold) {
		self.slots.insert(name, Slot::Single(node));
	}

	/// Appends `node` to the list slot for `name`.
	///
	/// A single-valued slot under the same name is replaced by a fresh list.
	pub fn push(&mut self, name: &'static str, node: Scaffold) {
		match self.slots.get_mut(name) {
			Some(Slot::List(items)) => items.push(node),
			_ => {
				self.slots.insert(name, Slot::List(vec![node]));
			}
		}
	}

	/// Marks `name` as omitted again.
	pub fn clear(&mut self, name: &str) {
		self.slots.shift_remove(name);
	}

	pub(crate) fn into_slots(self) -> impl Iterator<Item = (&'static str, Slot)> {
		self.slots.into_iter()
	}
}

impl PartialEq for Composite {
	fn eq(&self, other: &Self) -> bool {
		self.def.tag == other.def.tag && self.slots == other.slots
	}
}

impl fmt::Debug for Composite {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Composite")
			.field("ty", &self.def.tag)
			.field("slots", &self.slots)
			.finish()
	}
}

/// Typed handle over a [`Scaffold`] that resolves to a `T`.
pub struct Node<T> {
	scaffold: Scaffold,
	_marker: PhantomData<fn() -> T>,
}

impl<T> Node<T> {
	/// Wraps an untyped scaffold. The caller vouches that it resolves to a `T`.
	///
	/// A composite root of the wrong type is rejected before resolution. A
	/// mistyped composite nested deeper is only caught when the parent converts,
	/// after it has registered.
	pub fn from_scaffold(scaffold: Scaffold) -> Self {
		Self {
			scaffold,
			_marker: PhantomData,
		}
	}

	/// Untyped tree behind this node.
	pub fn scaffold(&self) -> &Scaffold {
		&self.scaffold
	}

	/// Unwraps the untyped tree.
	pub fn into_scaffold(self) -> Scaffold {
		self.scaffold
	}
}

impl<T: IntoValue> Node<T> {
	/// A node that is already resolved.
	pub fn value(value: T) -> Self {
		Self::from_scaffold(Scaffold::Value(value.into_value()))
	}
}

impl<T: Model> Node<T> {
	/// A node that resolves by looking `reference` up in the registry.
	pub fn reference(reference: Reference<T>) -> Self {
		Self::from_scaffold(Scaffold::Reference(reference.target()))
	}
}

impl<T: FromValue> Node<T> {
	/// Resolves this tree against `registry` with the default configuration.
	pub async fn resolve(self, registry: &Registry) -> Result<T, ResolveError> {
		self.resolve_with(registry, &ResolveConfig::default()).await
	}

	/// Resolves this tree against `registry`.
	///
	/// `config.duplicate_keys` is not consulted here: duplicate handling
	/// belongs to the registry that was passed in.
	pub async fn resolve_with(self, registry: &Registry, config: &ResolveConfig) -> Result<T, ResolveError> {
		if let (Some(expected), Scaffold::Composite(composite)) = (T::record_tag(), &self.scaffold) {
			let found = composite.def().tag;
			if found != expected {
				return Err(ValueError::WrongRecord { expected, found }.into());
			}
		}
		let cx = resolve::ResolveCx::new(registry.clone(), *config);
		let value = resolve::resolve(self.scaffold, cx).await?;
		Ok(T::from_value(value)?)
	}
}

impl<T> Clone for Node<T> {
	fn clone(&self) -> Self {
		Self::from_scaffold(self.scaffold.clone())
	}
}

impl<T> PartialEq for Node<T> {
	fn eq(&self, other: &Self) -> bool {
		self.scaffold == other.scaffold
	}
}

impl<T> fmt::Debug for Node<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Node").field(&self.scaffold).finish()
	}
}
