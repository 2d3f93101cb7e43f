//! Assembly phase: specs, builders and composition.

mod common;

use common::{PAINT, Paint, Pipeline, STEP, Shape, Step};
use pretty_assertions::assert_eq;
use trellis_scaffold::{Builder, Reference, Scaffold, Slot, Spec, Value};

#[derive(Debug, Clone, PartialEq)]
struct Env {
	branch: String,
	jobs: u32,
}

fn ci_spec() -> Spec<Env, Pipeline> {
	Spec::<Env, Pipeline>::new(|b| {
		let env = b.context().clone();
		b.set(Pipeline::NAME, format!("ci-{}", env.branch));
		for job in 0..env.jobs {
			b.push_build(Pipeline::STEPS, move |s| {
				s.set(Step::ID, format!("job-{job}")).set(Step::COMMAND, "make".to_string());
			});
		}
	})
}

fn single(value: &str) -> Slot {
	Slot::Single(Scaffold::Value(Value::Str(value.into())))
}

fn step_ids(builder: &Builder<&'static str, Pipeline>) -> Vec<Slot> {
	match builder.shell().slot("steps") {
		Some(Slot::List(items)) => items
			.iter()
			.filter_map(|item| match item {
				Scaffold::Composite(step) => step.slot("id").cloned(),
				_ => None,
			})
			.collect(),
		_ => Vec::new(),
	}
}

#[test]
fn create_scaffold_is_idempotent() {
	let spec = ci_spec();
	let env = Env {
		branch: "main".into(),
		jobs: 3,
	};

	let first = spec.create_scaffold(env.clone());
	let second = spec.create_scaffold(env);
	assert_eq!(first, second);
}

#[test]
fn create_scaffold_leaves_context_untouched() {
	let spec = Spec::<Vec<u32>, Pipeline>::new(|b| {
		let count = b.context().len();
		b.set(Pipeline::RETRIES, count as i64);
	});
	let context = vec![1, 2, 3];
	let node = spec.create_scaffold(context.clone());

	assert_eq!(context, vec![1, 2, 3]);
	let Scaffold::Composite(shell) = node.scaffold() else {
		panic!("expected a composite, got {node:?}");
	};
	assert_eq!(shell.slot("retries"), Some(&Slot::Single(Scaffold::Value(Value::Int(3)))));
}

#[test]
fn set_overwrites_and_unset_omits() {
	let mut b = Builder::<(), Pipeline>::new(());
	b.set(Pipeline::NAME, "one".to_string()).set(Pipeline::NAME, "two".to_string());
	assert_eq!(b.shell().slot("name"), Some(&single("two")));

	b.set(Pipeline::TRIGGER, "push".to_string()).unset(Pipeline::TRIGGER);
	assert_eq!(b.shell().slot("trigger"), None);
}

#[test]
fn split_moves_shell_and_merge_replaces_it() {
	let mut parent = Builder::<(), Pipeline>::new(());
	parent.set(Pipeline::NAME, "parent".to_string()).set(Pipeline::RETRIES, 2);

	let mut split = parent.split("other context");
	assert!(parent.shell().is_empty());
	assert_eq!(split.context(), &"other context");
	assert_eq!(split.shell().slot("retries"), Some(&Slot::Single(Scaffold::Value(Value::Int(2)))));

	split.set(Pipeline::NAME, "child".to_string());
	parent.merge(split);

	assert_eq!(parent.shell().slot("name"), Some(&single("child")));
	assert_eq!(parent.shell().slot("retries"), Some(&Slot::Single(Scaffold::Value(Value::Int(2)))));
}

#[test]
fn include_with_overwrites_conflicting_fields() {
	let rename = Spec::<String, Pipeline>::new(|b| {
		let name = b.context().clone();
		b.set(Pipeline::NAME, name);
	});

	let mut seeded = Builder::<(), Pipeline>::new(());
	seeded.set(Pipeline::NAME, "parent".to_string()).set(Pipeline::RETRIES, 1);
	let mut expected = Builder::<String, Pipeline>::with_shell("release".to_string(), seeded.shell().clone());
	rename.apply(&mut expected);

	seeded.include_with("release".to_string(), &rename);

	assert_eq!(seeded.shell(), expected.shell());
	assert_eq!(seeded.shell().slot("name"), Some(&single("release")));
	assert_eq!(seeded.shell().slot("retries"), Some(&Slot::Single(Scaffold::Value(Value::Int(1)))));
}

#[test]
fn include_for_each_applies_in_iteration_order() {
	let per_service = Spec::<&'static str, Pipeline>::new(|b| {
		let service = *b.context();
		b.push_build(Pipeline::STEPS, move |s| {
			s.set(Step::ID, service.to_string()).set(Step::COMMAND, format!("deploy {service}"));
		});
	});

	let mut b = Builder::<&'static str, Pipeline>::new("root");
	b.include_for_each(["api", "web", "worker"], &per_service);

	assert_eq!(step_ids(&b), vec![single("api"), single("web"), single("worker")]);
	assert_eq!(b.context(), &"root");
}

#[test]
fn include_and_include_fn_share_the_builder() {
	let naming = Spec::<&'static str, Pipeline>::new(|b| {
		let name = b.context().to_string();
		b.set(Pipeline::NAME, name);
	});

	let mut b = Builder::<&'static str, Pipeline>::new("nightly");
	b.include(&naming).include_fn(|b| {
		b.set(Pipeline::RETRIES, 5);
	});

	assert_eq!(b.shell().slot("name"), Some(&single("nightly")));
	assert_eq!(b.shell().slot("retries"), Some(&Slot::Single(Scaffold::Value(Value::Int(5)))));
}

#[test]
fn nested_specs_take_parent_or_explicit_context() {
	let step = Spec::<&'static str, Step>::new(|s| {
		let id = s.context().to_string();
		s.set(Step::ID, id).set(Step::COMMAND, "test".to_string());
	});

	let mut b = Builder::<&'static str, Pipeline>::new("inherited");
	b.push_nested(Pipeline::STEPS, &step)
		.push_nested_with(Pipeline::STEPS, "explicit", &step);

	assert_eq!(step_ids(&b), vec![single("inherited"), single("explicit")]);
}

#[test]
fn inline_builds_take_an_explicit_context() {
	let mut b = Builder::<&'static str, Pipeline>::new("inherited");
	b.push_build_with(Pipeline::STEPS, String::from("explicit"), |s| {
		let id = s.context().clone();
		s.set(Step::ID, id).set(Step::COMMAND, "test".to_string());
	});
	assert_eq!(step_ids(&b), vec![single("explicit")]);

	let mut shape = Builder::<(), Shape>::new(());
	shape.build_with(Shape::FILL, 0x00ff00_i64, |p| {
		let rgb = *p.context();
		p.set(Paint::NAME, "green".to_string()).set(Paint::RGB, rgb);
	});
	let Some(Slot::Single(Scaffold::Composite(fill))) = shape.shell().slot("fill") else {
		panic!("fill not built: {:?}", shape.shell());
	};
	assert_eq!(fill.def().tag, PAINT.tag);
	assert_eq!(fill.slot("rgb"), Some(&Slot::Single(Scaffold::Value(Value::Int(0x00ff00)))));
}

#[test]
fn references_stay_unresolved_in_the_scaffold() {
	let mut b = Builder::<(), Step>::new(());
	b.set(Step::ID, "deploy".to_string())
		.set(Step::COMMAND, "ship".to_string())
		.push_reference(Step::NEEDS, Reference::new("build"));

	let Some(Slot::List(needs)) = b.shell().slot("needs") else {
		panic!("needs not populated: {:?}", b.shell());
	};
	assert_eq!(needs.len(), 1);
	match &needs[0] {
		Scaffold::Reference(target) => {
			assert_eq!(target.ty, STEP.tag);
			assert_eq!(target.to_string(), "step(\"build\")");
		}
		other => panic!("expected a reference, got {other:?}"),
	}
}
