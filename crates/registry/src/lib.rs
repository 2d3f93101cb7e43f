//! Scope-bounded lookup table keyed by `(type tag, natural key)`.
//!
//! A [`Registry`] lives for exactly one top-level resolution pass. Resolution
//! tasks share it by handle: composites write themselves in once fully
//! assembled, references read from it.

/// Registry error types.
pub mod error;
/// Natural key values.
pub mod key;
/// Duplicate-key handling.
pub mod policy;
/// The shared table.
pub mod registry;
/// Type tags.
pub mod tag;

pub use error::RegistryError;
pub use key::Key;
pub use policy::{DuplicatePolicy, Insert};
pub use registry::Registry;
pub use tag::TypeTag;
