//! Resolved values and the typed conversions the generated layer builds on.

use std::sync::Arc;

use indexmap::IndexMap;
use trellis_registry::{Key, TypeTag};

use crate::TypeDef;

/// A fully resolved, immutable value.
///
/// Records are shared behind an [`Arc`], so cloning a value out of the
/// registry is cheap.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
	#[default]
	Null,
	Bool(bool),
	Int(i64),
	Float(f64),
	Str(String),
	List(Vec<Value>),
	Record(Arc<Record>),
}

impl Value {
	/// Short name of the variant, used in diagnostics.
	pub const fn kind(&self) -> &'static str {
		match self {
			Self::Null => "null",
			Self::Bool(_) => "bool",
			Self::Int(_) => "int",
			Self::Float(_) => "float",
			Self::Str(_) => "string",
			Self::List(_) => "list",
			Self::Record(_) => "record",
		}
	}

	pub const fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}

	/// Converts a scalar into a registry key. Floats, lists and records have none.
	pub fn as_key(&self) -> Option<Key> {
		match self {
			Self::Bool(b) => Some(Key::Bool(*b)),
			Self::Int(i) => Some(Key::Int(*i)),
			Self::Str(s) => Some(Key::from(s.as_str())),
			_ => None,
		}
	}

	/// Unwraps a record of the given type.
	pub fn into_record(self, def: &TypeDef) -> Result<Arc<Record>, ValueError> {
		match self {
			Self::Record(record) if record.ty() == def.tag => Ok(record),
			Self::Record(record) => Err(ValueError::WrongRecord {
				expected: def.tag,
				found: record.ty(),
			}),
			other => Err(ValueError::TypeMismatch {
				expected: "record",
				found: other.kind(),
			}),
		}
	}
}

/// Assembled composite value: its type tag plus one value per declared field.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
	ty: TypeTag,
	fields: IndexMap<&'static str, Value>,
}

impl Record {
	/// Creates a record of type `ty` with no fields.
	pub fn new(ty: TypeTag) -> Self {
		Self {
			ty,
			fields: IndexMap::new(),
		}
	}

	/// Type this record was assembled as.
	pub fn ty(&self) -> TypeTag {
		self.ty
	}

	/// Sets `name`, keeping its original position if already present.
	pub fn insert(&mut self, name: &'static str, value: impl IntoValue) {
		self.fields.insert(name, value.into_value());
	}

	/// Builder-style [`Self::insert`].
	pub fn with(mut self, name: &'static str, value: impl IntoValue) -> Self {
		self.insert(name, value);
		self
	}

	/// Raw value of `name`, if present.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.fields.get(name)
	}

	/// Reads and converts one field.
	pub fn field<V: FromValue>(&self, name: &str) -> Result<V, ValueError> {
		let value = self.get(name).ok_or_else(|| ValueError::MissingField {
			ty: self.ty,
			field: name.to_string(),
		})?;
		V::from_value(value.clone())
	}

	/// Fields in declaration order.
	pub fn fields(&self) -> impl Iterator<Item = (&'static str, &Value)> {
		self.fields.iter().map(|(name, value)| (*name, value))
	}

	pub fn len(&self) -> usize {
		self.fields.len()
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
	#[error("expected {expected}, found {found}")]
	TypeMismatch { expected: &'static str, found: &'static str },
	#[error("expected a `{expected}` record, found `{found}`")]
	WrongRecord { expected: TypeTag, found: TypeTag },
	#[error("`{ty}` record has no field `{field}`")]
	MissingField { ty: TypeTag, field: String },
	#[error("{value} does not fit in {target}")]
	OutOfRange { value: i64, target: &'static str },
}

/// Conversion out of a resolved [`Value`].
pub trait FromValue: Sized {
	fn from_value(value: Value) -> Result<Self, ValueError>;

	/// Record type this conversion accepts, if it only accepts one.
	///
	/// Checked against a composite root before resolution starts.
	fn record_tag() -> Option<TypeTag> {
		None
	}
}

/// Conversion into a [`Value`] for scalar setters.
pub trait IntoValue {
	fn into_value(self) -> Value;
}

/// A composite type with a static description.
///
/// Implemented by schema-derived code: a `static` [`TypeDef`] plus the two
/// conversions between the Rust struct and its [`Record`].
pub trait Model: FromValue + IntoValue + Send + Sync + 'static {
	fn def() -> &'static TypeDef;
}

impl FromValue for Value {
	fn from_value(value: Value) -> Result<Self, ValueError> {
		Ok(value)
	}
}

impl IntoValue for Value {
	fn into_value(self) -> Value {
		self
	}
}

fn mismatch(expected: &'static str, found: &Value) -> ValueError {
	ValueError::TypeMismatch {
		expected,
		found: found.kind(),
	}
}

impl FromValue for bool {
	fn from_value(value: Value) -> Result<Self, ValueError> {
		match value {
			Value::Bool(b) => Ok(b),
			other => Err(mismatch("bool", &other)),
		}
	}
}

impl FromValue for i64 {
	fn from_value(value: Value) -> Result<Self, ValueError> {
		match value {
			Value::Int(i) => Ok(i),
			other => Err(mismatch("int", &other)),
		}
	}
}

impl FromValue for i32 {
	fn from_value(value: Value) -> Result<Self, ValueError> {
		let wide = i64::from_value(value)?;
		i32::try_from(wide).map_err(|_| ValueError::OutOfRange { value: wide, target: "i32" })
	}
}

impl FromValue for u32 {
	fn from_value(value: Value) -> Result<Self, ValueError> {
		let wide = i64::from_value(value)?;
		u32::try_from(wide).map_err(|_| ValueError::OutOfRange { value: wide, target: "u32" })
	}
}

impl FromValue for f64 {
	fn from_value(value: Value) -> Result<Self, ValueError> {
		match value {
			Value::Float(f) => Ok(f),
			Value::Int(i) => Ok(i as f64),
			other => Err(mismatch("float", &other)),
		}
	}
}

impl FromValue for String {
	fn from_value(value: Value) -> Result<Self, ValueError> {
		match value {
			Value::Str(s) => Ok(s),
			other => Err(mismatch("string", &other)),
		}
	}
}

impl<T: FromValue> FromValue for Option<T> {
	fn from_value(value: Value) -> Result<Self, ValueError> {
		match value {
			Value::Null => Ok(None),
			other => T::from_value(other).map(Some),
		}
	}
}

impl<T: FromValue> FromValue for Vec<T> {
	fn from_value(value: Value) -> Result<Self, ValueError> {
		match value {
			Value::List(items) => items.into_iter().map(T::from_value).collect(),
			other => Err(mismatch("list", &other)),
		}
	}
}

impl IntoValue for bool {
	fn into_value(self) -> Value {
		Value::Bool(self)
	}
}

impl IntoValue for i64 {
	fn into_value(self) -> Value {
		Value::Int(self)
	}
}

impl IntoValue for i32 {
	fn into_value(self) -> Value {
		Value::Int(i64::from(self))
	}
}

impl IntoValue for u32 {
	fn into_value(self) -> Value {
		Value::Int(i64::from(self))
	}
}

impl IntoValue for f64 {
	fn into_value(self) -> Value {
		Value::Float(self)
	}
}

impl IntoValue for String {
	fn into_value(self) -> Value {
		Value::Str(self)
	}
}

impl IntoValue for &str {
	fn into_value(self) -> Value {
		Value::Str(self.to_string())
	}
}

impl<T: IntoValue> IntoValue for Option<T> {
	fn into_value(self) -> Value {
		self.map_or(Value::Null, IntoValue::into_value)
	}
}

impl<T: IntoValue> IntoValue for Vec<T> {
	fn into_value(self) -> Value {
		Value::List(self.into_iter().map(IntoValue::into_value).collect())
	}
}

impl IntoValue for Arc<Record> {
	fn into_value(self) -> Value {
		Value::Record(self)
	}
}
