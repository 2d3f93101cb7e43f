use crate::{Model, Node, Registry, ResolveConfig, ResolveError, Spec};

/// Top-level entry point: pairs a spec with a context and runs both phases.
#[derive(Debug, Clone)]
pub struct Scaffolder<C, T> {
	spec: Spec<C, T>,
	config: ResolveConfig,
}

/// Result of one top-level resolution.
#[derive(Debug)]
pub struct Resolution<T> {
	/// The resolved top-level value.
	pub value: T,
	/// The pass's registry, for inspection. Nothing else holds it.
	pub registry: Registry,
}

impl<C, T: Model> Scaffolder<C, T> {
	/// Wraps `spec` with the default configuration.
	pub fn new(spec: Spec<C, T>) -> Self {
		Self {
			spec,
			config: ResolveConfig::default(),
		}
	}

	/// Replaces the resolution settings.
	pub fn with_config(mut self, config: ResolveConfig) -> Self {
		self.config = config;
		self
	}

	/// Current resolution settings.
	pub fn config(&self) -> &ResolveConfig {
		&self.config
	}

	/// Assembly phase only.
	pub fn scaffold(&self, context: C) -> Node<T> {
		self.spec.create_scaffold(context)
	}

	/// Scaffolds under `context` and resolves against a fresh registry.
	pub async fn resolve(&self, context: C) -> Result<Resolution<T>, ResolveError> {
		let node = self.scaffold(context);
		let registry = Registry::with_policy(self.config.duplicate_keys);
		let ty = T::def().tag;
		match node.resolve_with(&registry, &self.config).await {
			Ok(value) => {
				tracing::debug!(%ty, registered = registry.len(), "resolve.done");
				Ok(Resolution { value, registry })
			}
			Err(err) => {
				tracing::debug!(%ty, error = %err, path = %err.path(), "resolve.failed");
				Err(err)
			}
		}
	}
}
