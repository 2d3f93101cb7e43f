//! Mutable staging for one composite value while a spec runs.
//!
//! # Invariants
//!
//! - A builder exclusively owns its shell. [`Builder::split`] moves the shell
//!   into the split builder and [`Builder::merge`] moves it back, so at most
//!   one builder writes a shell at any time.
//! - Merge replaces the shell wholesale; fields written inside a split
//!   overwrite what the parent had.
//! - List appends keep call order.

use std::fmt;
use std::marker::PhantomData;

use crate::{Composite, Field, IntoValue, ListField, Model, Node, Reference, Scaffold, Spec};

/// Stages the fields of one `T` while a spec runs against context `C`.
pub struct Builder<C, T> {
	context: C,
	shell: Composite,
	_marker: PhantomData<fn() -> T>,
}

impl<C, T: Model> Builder<C, T> {
	/// Creates a builder over an empty shell.
	pub fn new(context: C) -> Self {
		Self::with_shell(context, Composite::new(T::def()))
	}

	/// Creates a builder seeded with an existing shell of `T`.
	pub fn with_shell(context: C, shell: Composite) -> Self {
		debug_assert_eq!(shell.def().tag, T::def().tag, "shell type does not match builder type");
		Self {
			context,
			shell,
			_marker: PhantomData,
		}
	}

	/// Context the spec reads from.
	pub fn context(&self) -> &C {
		&self.context
	}

	/// In-progress shell.
	pub fn shell(&self) -> &Composite {
		&self.shell
	}

	/// Consumes the builder, returning its shell.
	pub fn into_shell(self) -> Composite {
		self.shell
	}

	/// Consumes the builder, returning its shell as a typed node.
	pub fn into_node(self) -> Node<T> {
		Node::from_scaffold(Scaffold::Composite(self.shell))
	}

	/// Sets `field` to an already-resolved value.
	pub fn set<V: IntoValue>(&mut self, field: Field<T, V>, value: V) -> &mut Self {
		self.shell.set(field.name(), Scaffold::Value(value.into_value()));
		self
	}

	/// Sets `field` to a prebuilt node.
	pub fn set_node<V>(&mut self, field: Field<T, V>, node: Node<V>) -> &mut Self {
		self.shell.set(field.name(), node.into_scaffold());
		self
	}

	/// Omits `field` again.
	pub fn unset<V>(&mut self, field: Field<T, V>) -> &mut Self {
		self.shell.clear(field.name());
		self
	}

	/// Scaffolds `spec` under this builder's context into `field`.
	pub fn set_nested<U: Model>(&mut self, field: Field<T, U>, spec: &Spec<C, U>) -> &mut Self
	where
		C: Clone,
	{
		let node = spec.create_scaffold(self.context.clone());
		self.set_node(field, node)
	}

	/// Scaffolds `spec` under an explicit context into `field`.
	pub fn set_nested_with<C2, U: Model>(&mut self, field: Field<T, U>, context: C2, spec: &Spec<C2, U>) -> &mut Self {
		let node = spec.create_scaffold(context);
		self.set_node(field, node)
	}

	/// Builds `field` inline with a nested builder sharing this context.
	pub fn build<U: Model>(&mut self, field: Field<T, U>, recipe: impl FnOnce(&mut Builder<C, U>)) -> &mut Self
	where
		C: Clone,
	{
		let mut nested = Builder::new(self.context.clone());
		recipe(&mut nested);
		self.set_node(field, nested.into_node())
	}

	/// Builds `field` inline with a nested builder carrying `context`.
	pub fn build_with<C2, U: Model>(
		&mut self,
		field: Field<T, U>,
		context: C2,
		recipe: impl FnOnce(&mut Builder<C2, U>),
	) -> &mut Self {
		let mut nested = Builder::new(context);
		recipe(&mut nested);
		self.set_node(field, nested.into_node())
	}

	/// Sets `field` to a registry lookup.
	pub fn set_reference<U: Model>(&mut self, field: Field<T, U>, reference: Reference<U>) -> &mut Self {
		self.set_node(field, Node::reference(reference))
	}

	/// Appends an already-resolved value to `field`.
	pub fn push<V: IntoValue>(&mut self, field: ListField<T, V>, value: V) -> &mut Self {
		self.shell.push(field.name(), Scaffold::Value(value.into_value()));
		self
	}

	/// Appends a prebuilt node to `field`.
	pub fn push_node<V>(&mut self, field: ListField<T, V>, node: Node<V>) -> &mut Self {
		self.shell.push(field.name(), node.into_scaffold());
		self
	}

	/// Scaffolds `spec` under this builder's context and appends it to `field`.
	pub fn push_nested<U: Model>(&mut self, field: ListField<T, U>, spec: &Spec<C, U>) -> &mut Self
	where
		C: Clone,
	{
		let node = spec.create_scaffold(self.context.clone());
		self.push_node(field, node)
	}

	/// Scaffolds `spec` under an explicit context and appends it to `field`.
	pub fn push_nested_with<C2, U: Model>(&mut self, field: ListField<T, U>, context: C2, spec: &Spec<C2, U>) -> &mut Self {
		let node = spec.create_scaffold(context);
		self.push_node(field, node)
	}

	/// Builds an element inline and appends it to `field`.
	pub fn push_build<U: Model>(&mut self, field: ListField<T, U>, recipe: impl FnOnce(&mut Builder<C, U>)) -> &mut Self
	where
		C: Clone,
	{
		let mut nested = Builder::new(self.context.clone());
		recipe(&mut nested);
		self.push_node(field, nested.into_node())
	}

	/// Builds an element inline under `context` and appends it to `field`.
	pub fn push_build_with<C2, U: Model>(
		&mut self,
		field: ListField<T, U>,
		context: C2,
		recipe: impl FnOnce(&mut Builder<C2, U>),
	) -> &mut Self {
		let mut nested = Builder::new(context);
		recipe(&mut nested);
		self.push_node(field, nested.into_node())
	}

	/// Appends a registry lookup to `field`.
	pub fn push_reference<U: Model>(&mut self, field: ListField<T, U>, reference: Reference<U>) -> &mut Self {
		self.push_node(field, Node::reference(reference))
	}

	/// Applies another spec for `T` to this builder and context.
	pub fn include(&mut self, spec: &Spec<C, T>) -> &mut Self {
		spec.apply(self);
		self
	}

	/// Applies an inline recipe to this builder and context.
	pub fn include_fn(&mut self, recipe: impl FnOnce(&mut Self)) -> &mut Self {
		recipe(self);
		self
	}

	/// Applies `spec` under `context`, then merges its shell back.
	pub fn include_with<C2>(&mut self, context: C2, spec: &Spec<C2, T>) -> &mut Self {
		let mut split = self.split(context);
		spec.apply(&mut split);
		self.merge(split)
	}

	/// [`Self::include_with`] once per context, in iteration order.
	pub fn include_for_each<C2, I>(&mut self, contexts: I, spec: &Spec<C2, T>) -> &mut Self
	where
		I: IntoIterator<Item = C2>,
	{
		for context in contexts {
			self.include_with(context, spec);
		}
		self
	}

	/// Moves the in-progress shell into a builder carrying `context`.
	///
	/// This builder is left with an empty shell until [`Self::merge`].
	pub fn split<C2>(&mut self, context: C2) -> Builder<C2, T> {
		let shell = std::mem::replace(&mut self.shell, Composite::new(T::def()));
		Builder::with_shell(context, shell)
	}

	/// Takes back the shell of a split builder, replacing this one's.
	pub fn merge<C2>(&mut self, split: Builder<C2, T>) -> &mut Self {
		self.shell = split.shell;
		self
	}
}

impl<C: fmt::Debug, T> fmt::Debug for Builder<C, T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Builder")
			.field("context", &self.context)
			.field("shell", &self.shell)
			.finish()
	}
}
