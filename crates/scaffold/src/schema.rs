//! Static type descriptions consumed by builders and the resolver.
//!
//! Every composite type is described once by a `static` [`TypeDef`]. Typed
//! [`Field`] and [`ListField`] handles tie builder setters to the owning type
//! and the value type of the slot.

use std::fmt;
use std::marker::PhantomData;

use trellis_registry::TypeTag;

use crate::Value;

/// How an omitted field is treated at resolve time.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
	/// Must be set before resolution.
	Required,
	/// Resolves to [`Value::Null`] when omitted.
	Optional,
	/// Resolves to the produced value when omitted.
	Defaulted(fn() -> Value),
	/// Ordered sequence; resolves to an empty list when omitted.
	List,
}

impl FieldKind {
	/// Value substituted for an omitted field, or `None` if omission is an error.
	pub fn omitted(&self) -> Option<Value> {
		match self {
			Self::Required => None,
			Self::Optional => Some(Value::Null),
			Self::Defaulted(default) => Some(default()),
			Self::List => Some(Value::List(Vec::new())),
		}
	}

	pub const fn is_required(&self) -> bool {
		matches!(self, Self::Required)
	}
}

#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
	pub name: &'static str,
	pub kind: FieldKind,
}

impl FieldDef {
	pub const fn required(name: &'static str) -> Self {
		Self {
			name,
			kind: FieldKind::Required,
		}
	}

	pub const fn optional(name: &'static str) -> Self {
		Self {
			name,
			kind: FieldKind::Optional,
		}
	}

	pub const fn defaulted(name: &'static str, default: fn() -> Value) -> Self {
		Self {
			name,
			kind: FieldKind::Defaulted(default),
		}
	}

	pub const fn list(name: &'static str) -> Self {
		Self {
			name,
			kind: FieldKind::List,
		}
	}
}

/// Declared shape of one composite type.
#[derive(Debug)]
pub struct TypeDef {
	pub tag: TypeTag,
	/// Fields in declaration order; resolved records keep this order.
	pub fields: &'static [FieldDef],
	/// Natural-key field; values of keyed types are registered once resolved.
	pub key: Option<&'static str>,
}

impl TypeDef {
	pub const fn new(tag: &'static str, fields: &'static [FieldDef]) -> Self {
		Self {
			tag: TypeTag::new(tag),
			fields,
			key: None,
		}
	}

	/// Designates `field` as the natural key.
	pub const fn keyed_by(mut self, field: &'static str) -> Self {
		self.key = Some(field);
		self
	}

	/// Declaration of `name`, if the type has one.
	pub fn field(&self, name: &str) -> Option<&FieldDef> {
		self.fields.iter().find(|field| field.name == name)
	}

	/// Declaration index of `name`.
	pub fn position(&self, name: &str) -> Option<usize> {
		self.fields.iter().position(|field| field.name == name)
	}
}

/// Handle to a single-valued field of `T` holding a `V`.
pub struct Field<T, V> {
	name: &'static str,
	_marker: PhantomData<fn() -> (T, V)>,
}

impl<T, V> Field<T, V> {
	pub const fn new(name: &'static str) -> Self {
		Self {
			name,
			_marker: PhantomData,
		}
	}

	pub const fn name(self) -> &'static str {
		self.name
	}
}

impl<T, V> Clone for Field<T, V> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<T, V> Copy for Field<T, V> {}

impl<T, V> fmt::Debug for Field<T, V> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Field").field(&self.name).finish()
	}
}

/// Handle to an ordered list field of `T` whose elements are `V`.
pub struct ListField<T, V> {
	name: &'static str,
	_marker: PhantomData<fn() -> (T, V)>,
}

impl<T, V> ListField<T, V> {
	pub const fn new(name: &'static str) -> Self {
		Self {
			name,
			_marker: PhantomData,
		}
	}

	pub const fn name(self) -> &'static str {
		self.name
	}
}

impl<T, V> Clone for ListField<T, V> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<T, V> Copy for ListField<T, V> {}

impl<T, V> fmt::Debug for ListField<T, V> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("ListField").field(&self.name).finish()
	}
}
