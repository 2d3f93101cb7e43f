use std::fmt;
use std::sync::Arc;

use crate::{Builder, Model, Node};

type Recipe<C, T> = dyn Fn(&mut Builder<C, T>) + Send + Sync;

/// Reusable recipe describing how to populate a `T` from a context `C`.
///
/// A spec performs no I/O and mutates nothing but the builder it is handed,
/// so one spec may be scaffolded any number of times, from any thread.
pub struct Spec<C, T> {
	recipe: Arc<Recipe<C, T>>,
}

impl<C, T: Model> Spec<C, T> {
	pub fn new(recipe: impl Fn(&mut Builder<C, T>) + Send + Sync + 'static) -> Self {
		Self { recipe: Arc::new(recipe) }
	}

	/// Runs the recipe against a fresh builder bound to `context`.
	pub fn create_scaffold(&self, context: C) -> Node<T> {
		let mut builder = Builder::new(context);
		self.apply(&mut builder);
		tracing::trace!(ty = %T::def().tag, "scaffold.create");
		builder.into_node()
	}

	/// Runs the recipe against an existing builder.
	pub fn apply(&self, builder: &mut Builder<C, T>) {
		(self.recipe)(builder);
	}
}

impl<C, T> Clone for Spec<C, T> {
	fn clone(&self) -> Self {
		Self {
			recipe: Arc::clone(&self.recipe),
		}
	}
}

impl<C, T> fmt::Debug for Spec<C, T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Spec").field("type", &std::any::type_name::<T>()).finish_non_exhaustive()
	}
}
