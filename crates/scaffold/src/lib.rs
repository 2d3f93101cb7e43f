//! Declarative object-graph construction.
//!
//! Construction runs in two phases:
//! * Assembly: a [`Spec`] runs against a [`Builder`] and yields a [`Node`],
//!   a scaffold tree that may still hold unresolved [`Reference`]s.
//! * Resolution: [`Node::resolve`] turns the tree into a final value,
//!   resolving composite children concurrently and registering keyed records
//!   in a shared [`Registry`] so references elsewhere can find them.
//!
//! [`Scaffolder`] runs both phases against a fresh registry.

/// Spec execution and composition.
pub mod builder;
/// Resolution settings.
pub mod config;
/// Resolution errors.
pub mod error;
mod fanout;
mod future;
/// Scaffold tree shapes.
pub mod node;
/// Registry-backed placeholders.
pub mod reference;
mod resolve;
/// Top-level entry point.
pub mod scaffolder;
/// Static type descriptions.
pub mod schema;
/// Reusable recipes.
pub mod spec;
/// Resolved values and conversions.
pub mod value;

pub use builder::Builder;
pub use config::{ConfigError, ForwardRefs, ResolveConfig};
pub use error::ResolveError;
pub use node::{Composite, Node, RefTarget, Scaffold, Slot};
pub use reference::Reference;
pub use scaffolder::{Resolution, Scaffolder};
pub use schema::{Field, FieldDef, FieldKind, ListField, TypeDef};
pub use spec::Spec;
pub use trellis_registry::{DuplicatePolicy, Insert, Key, RegistryError, TypeTag};
pub use value::{FromValue, IntoValue, Model, Record, Value, ValueError};

/// Registry of resolved values for one resolution pass.
pub type Registry = trellis_registry::Registry<Value>;
