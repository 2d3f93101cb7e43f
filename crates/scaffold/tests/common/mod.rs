//! Sample models in the shape schema-derived code takes.

#![allow(dead_code)]

use std::sync::Arc;

use trellis_scaffold::{Field, FieldDef, FromValue, IntoValue, ListField, Model, Record, TypeDef, TypeTag, Value, ValueError};

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt::try_init();
}

fn no_retries() -> Value {
	Value::Int(0)
}

static PIPELINE_FIELDS: [FieldDef; 4] = [
	FieldDef::required("name"),
	FieldDef::defaulted("retries", no_retries),
	FieldDef::optional("trigger"),
	FieldDef::list("steps"),
];
pub static PIPELINE: TypeDef = TypeDef::new("pipeline", &PIPELINE_FIELDS);

#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
	pub name: String,
	pub retries: i64,
	pub trigger: Option<String>,
	pub steps: Vec<Step>,
}

impl Pipeline {
	pub const NAME: Field<Pipeline, String> = Field::new("name");
	pub const RETRIES: Field<Pipeline, i64> = Field::new("retries");
	pub const TRIGGER: Field<Pipeline, String> = Field::new("trigger");
	pub const STEPS: ListField<Pipeline, Step> = ListField::new("steps");
}

impl Model for Pipeline {
	fn def() -> &'static TypeDef {
		&PIPELINE
	}
}

impl FromValue for Pipeline {
	fn from_value(value: Value) -> Result<Self, ValueError> {
		let record = value.into_record(&PIPELINE)?;
		Ok(Self {
			name: record.field("name")?,
			retries: record.field("retries")?,
			trigger: record.field("trigger")?,
			steps: record.field("steps")?,
		})
	}

	fn record_tag() -> Option<TypeTag> {
		Some(PIPELINE.tag)
	}
}

impl IntoValue for Pipeline {
	fn into_value(self) -> Value {
		let record = Record::new(PIPELINE.tag)
			.with("name", self.name)
			.with("retries", self.retries)
			.with("trigger", self.trigger)
			.with("steps", self.steps);
		Value::Record(Arc::new(record))
	}
}

static STEP_FIELDS: [FieldDef; 3] = [
	FieldDef::required("id"),
	FieldDef::required("command"),
	FieldDef::list("needs"),
];
pub static STEP: TypeDef = TypeDef::new("step", &STEP_FIELDS).keyed_by("id");

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
	pub id: String,
	pub command: String,
	pub needs: Vec<Step>,
}

impl Step {
	pub const ID: Field<Step, String> = Field::new("id");
	pub const COMMAND: Field<Step, String> = Field::new("command");
	pub const NEEDS: ListField<Step, Step> = ListField::new("needs");

	pub fn new(id: &str, command: &str) -> Self {
		Self {
			id: id.to_string(),
			command: command.to_string(),
			needs: Vec::new(),
		}
	}
}

impl Model for Step {
	fn def() -> &'static TypeDef {
		&STEP
	}
}

impl FromValue for Step {
	fn from_value(value: Value) -> Result<Self, ValueError> {
		let record = value.into_record(&STEP)?;
		Ok(Self {
			id: record.field("id")?,
			command: record.field("command")?,
			needs: record.field("needs")?,
		})
	}

	fn record_tag() -> Option<TypeTag> {
		Some(STEP.tag)
	}
}

impl IntoValue for Step {
	fn into_value(self) -> Value {
		let record = Record::new(STEP.tag)
			.with("id", self.id)
			.with("command", self.command)
			.with("needs", self.needs);
		Value::Record(Arc::new(record))
	}
}

static SCENE_FIELDS: [FieldDef; 2] = [FieldDef::list("palette"), FieldDef::list("shapes")];
pub static SCENE: TypeDef = TypeDef::new("scene", &SCENE_FIELDS);

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
	pub palette: Vec<Paint>,
	pub shapes: Vec<Shape>,
}

impl Scene {
	pub const PALETTE: ListField<Scene, Paint> = ListField::new("palette");
	pub const SHAPES: ListField<Scene, Shape> = ListField::new("shapes");
}

impl Model for Scene {
	fn def() -> &'static TypeDef {
		&SCENE
	}
}

impl FromValue for Scene {
	fn from_value(value: Value) -> Result<Self, ValueError> {
		let record = value.into_record(&SCENE)?;
		Ok(Self {
			palette: record.field("palette")?,
			shapes: record.field("shapes")?,
		})
	}

	fn record_tag() -> Option<TypeTag> {
		Some(SCENE.tag)
	}
}

impl IntoValue for Scene {
	fn into_value(self) -> Value {
		let record = Record::new(SCENE.tag)
			.with("palette", self.palette)
			.with("shapes", self.shapes);
		Value::Record(Arc::new(record))
	}
}

static PAINT_FIELDS: [FieldDef; 2] = [FieldDef::required("name"), FieldDef::required("rgb")];
pub static PAINT: TypeDef = TypeDef::new("paint", &PAINT_FIELDS).keyed_by("name");

#[derive(Debug, Clone, PartialEq)]
pub struct Paint {
	pub name: String,
	pub rgb: i64,
}

impl Paint {
	pub const NAME: Field<Paint, String> = Field::new("name");
	pub const RGB: Field<Paint, i64> = Field::new("rgb");
}

impl Model for Paint {
	fn def() -> &'static TypeDef {
		&PAINT
	}
}

impl FromValue for Paint {
	fn from_value(value: Value) -> Result<Self, ValueError> {
		let record = value.into_record(&PAINT)?;
		Ok(Self {
			name: record.field("name")?,
			rgb: record.field("rgb")?,
		})
	}

	fn record_tag() -> Option<TypeTag> {
		Some(PAINT.tag)
	}
}

impl IntoValue for Paint {
	fn into_value(self) -> Value {
		let record = Record::new(PAINT.tag).with("name", self.name).with("rgb", self.rgb);
		Value::Record(Arc::new(record))
	}
}

static SHAPE_FIELDS: [FieldDef; 2] = [FieldDef::required("label"), FieldDef::required("fill")];
pub static SHAPE: TypeDef = TypeDef::new("shape", &SHAPE_FIELDS);

#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
	pub label: String,
	pub fill: Paint,
}

impl Shape {
	pub const LABEL: Field<Shape, String> = Field::new("label");
	pub const FILL: Field<Shape, Paint> = Field::new("fill");
}

impl Model for Shape {
	fn def() -> &'static TypeDef {
		&SHAPE
	}
}

impl FromValue for Shape {
	fn from_value(value: Value) -> Result<Self, ValueError> {
		let record = value.into_record(&SHAPE)?;
		Ok(Self {
			label: record.field("label")?,
			fill: record.field("fill")?,
		})
	}

	fn record_tag() -> Option<TypeTag> {
		Some(SHAPE.tag)
	}
}

impl IntoValue for Shape {
	fn into_value(self) -> Value {
		let record = Record::new(SHAPE.tag).with("label", self.label).with("fill", self.fill);
		Value::Record(Arc::new(record))
	}
}
