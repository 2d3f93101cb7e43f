//! Concurrent resolution of scaffold trees.
//!
//! # Role
//!
//! Turns a [`Scaffold`] into a [`Value`], registering keyed records as they
//! complete. All per-shape behavior lives in [`resolve`]; composites fan out
//! over a [`FanOut`] join set, one task per child field and list element.
//!
//! # Invariants
//!
//! - Slot shapes and required fields are checked before any child is launched.
//! - A keyed record is registered only after it is fully assembled, so a
//!   registry lookup never observes a partially constructed value.
//! - References are looked up after the composite's other children have
//!   joined; a reference to a keyed sibling always sees its registration.
//! - List elements land at their insertion index regardless of completion
//!   order.

use std::sync::Arc;

use tracing::Instrument;

use crate::fanout::FanOut;
use crate::future::BoxFuture;
use crate::{Composite, FieldKind, Record, Registry, ResolveConfig, ResolveError, Scaffold, Slot, TypeDef, Value, reference};

/// State threaded through every resolution task.
#[derive(Debug, Clone)]
pub(crate) struct ResolveCx {
	pub registry: Registry,
	pub config: ResolveConfig,
}

impl ResolveCx {
	pub fn new(registry: Registry, config: ResolveConfig) -> Self {
		Self { registry, config }
	}
}

/// Resolves one node of any shape.
pub(crate) fn resolve(scaffold: Scaffold, cx: ResolveCx) -> BoxFuture<'static, Result<Value, ResolveError>> {
	match scaffold {
		Scaffold::Value(value) => Box::pin(std::future::ready(Ok(value))),
		Scaffold::Reference(target) => Box::pin(async move { reference::lookup(target, &cx).await }),
		Scaffold::Composite(composite) => {
			let span = tracing::debug_span!("resolve.composite", ty = %composite.def().tag);
			Box::pin(resolve_composite(composite, cx).instrument(span))
		}
	}
}

/// Destination of one child value in the assembled record.
#[derive(Debug, Clone, Copy)]
struct Target {
	field: usize,
	index: Option<usize>,
}

/// Resolved contents of one populated field.
enum Filled {
	Single(Value),
	List(Vec<Value>),
}

impl Filled {
	fn place(&mut self, index: Option<usize>, value: Value) {
		match (self, index) {
			(Self::List(items), Some(index)) => items[index] = value,
			(Self::Single(slot), _) => *slot = value,
			(Self::List(_), None) => {}
		}
	}

	fn into_value(self) -> Value {
		match self {
			Self::Single(value) => value,
			Self::List(items) => Value::List(items),
		}
	}
}

/// Children grouped by the wave they resolve in.
#[derive(Default)]
struct Waves {
	composites: Vec<(Target, Scaffold)>,
	references: Vec<(Target, Scaffold)>,
}

async fn resolve_composite(composite: Composite, cx: ResolveCx) -> Result<Value, ResolveError> {
	let def = composite.def();
	check_fields(&composite)?;

	let mut filled: Vec<Option<Filled>> = def.fields.iter().map(|_| None).collect();
	let mut waves = Waves::default();

	for (name, slot) in composite.into_slots() {
		let Some(field) = def.position(name) else {
			return Err(ResolveError::UnknownField { ty: def.tag, field: name });
		};
		match slot {
			Slot::Single(node) => {
				let mut cell = Filled::Single(Value::Null);
				route(Target { field, index: None }, node, &mut cell, &mut waves);
				filled[field] = Some(cell);
			}
			Slot::List(nodes) => {
				let mut cell = Filled::List(vec![Value::Null; nodes.len()]);
				for (index, node) in nodes.into_iter().enumerate() {
					route(Target { field, index: Some(index) }, node, &mut cell, &mut waves);
				}
				filled[field] = Some(cell);
			}
		}
	}

	join_wave(def, waves.composites, &cx, &mut filled).await?;
	join_wave(def, waves.references, &cx, &mut filled).await?;

	let record = Arc::new(assemble(def, filled)?);
	register(def, &record, &cx)?;
	Ok(Value::Record(record))
}

/// Fails on undeclared slots, slots shaped unlike their field, and required
/// fields left unset.
fn check_fields(composite: &Composite) -> Result<(), ResolveError> {
	let def = composite.def();
	for (name, slot) in composite.slots() {
		let Some(field) = def.field(name) else {
			return Err(ResolveError::UnknownField { ty: def.tag, field: name });
		};
		let is_list = matches!(field.kind, FieldKind::List);
		if is_list != matches!(slot, Slot::List(_)) {
			return Err(ResolveError::SlotShape {
				ty: def.tag,
				field: name,
				expected: if is_list { "a list" } else { "a single value" },
			});
		}
	}
	match def.fields.iter().find(|field| field.kind.is_required() && composite.slot(field.name).is_none()) {
		Some(field) => Err(ResolveError::MissingRequiredField {
			ty: def.tag,
			field: field.name,
		}),
		None => Ok(()),
	}
}

/// Places ready values directly and queues everything else by wave.
fn route(target: Target, node: Scaffold, cell: &mut Filled, waves: &mut Waves) {
	match node {
		Scaffold::Value(value) => cell.place(target.index, value),
		node @ Scaffold::Composite(_) => waves.composites.push((target, node)),
		node @ Scaffold::Reference(_) => waves.references.push((target, node)),
	}
}

/// Resolves one wave concurrently and waits for all of it.
async fn join_wave(
	def: &'static TypeDef,
	tasks: Vec<(Target, Scaffold)>,
	cx: &ResolveCx,
	filled: &mut [Option<Filled>],
) -> Result<(), ResolveError> {
	if tasks.is_empty() {
		return Ok(());
	}

	let mut fanout = FanOut::new(def.tag);
	for (target, node) in tasks {
		let cx = cx.clone();
		fanout.spawn(async move { (target, resolve(node, cx).await) });
	}

	let mut first_err = None;
	while let Some(joined) = fanout.join_next().await {
		let err = match joined {
			Ok((target, Ok(value))) => {
				if let Some(cell) = filled[target.field].as_mut() {
					cell.place(target.index, value);
				}
				continue;
			}
			Ok((target, Err(source))) => ResolveError::ChildResolution {
				ty: def.tag,
				field: def.fields[target.field].name,
				index: target.index,
				source: Box::new(source),
			},
			Err(join_err) if first_err.is_some() && join_err.is_cancelled() => continue,
			Err(join_err) => ResolveError::TaskFailed {
				ty: def.tag,
				message: join_err.to_string(),
			},
		};

		tracing::debug!(ty = %def.tag, error = %err, remaining = fanout.len(), "resolve.child_failed");
		if cx.config.cancel_siblings_on_failure {
			fanout.abort_all();
			return Err(err);
		}
		first_err.get_or_insert(err);
	}

	match first_err {
		Some(err) => Err(err),
		None => Ok(()),
	}
}

/// Builds the final record in declaration order, defaulting omitted fields.
fn assemble(def: &'static TypeDef, filled: Vec<Option<Filled>>) -> Result<Record, ResolveError> {
	let mut record = Record::new(def.tag);
	for (field, cell) in def.fields.iter().zip(filled) {
		let value = match cell {
			Some(cell) => cell.into_value(),
			None => field.kind.omitted().ok_or_else(|| ResolveError::MissingRequiredField {
				ty: def.tag,
				field: field.name,
			})?,
		};
		record.insert(field.name, value);
	}
	Ok(record)
}

/// Registers a keyed record under its natural key. Null keys are not registered.
fn register(def: &'static TypeDef, record: &Arc<Record>, cx: &ResolveCx) -> Result<(), ResolveError> {
	let Some(key_field) = def.key else {
		return Ok(());
	};
	let key_value = record.get(key_field).unwrap_or(&Value::Null);
	if key_value.is_null() {
		tracing::trace!(ty = %def.tag, field = key_field, "resolve.register.null_key");
		return Ok(());
	}
	let key = key_value.as_key().ok_or_else(|| ResolveError::InvalidKey {
		ty: def.tag,
		field: key_field,
		found: key_value.kind(),
	})?;

	let outcome = cx.registry.put(def.tag, key.clone(), Value::Record(Arc::clone(record)))?;
	tracing::debug!(ty = %def.tag, %key, ?outcome, "resolve.register");
	Ok(())
}
