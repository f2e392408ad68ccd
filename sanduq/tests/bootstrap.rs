use std::fs;
use std::sync::Arc;

use parking_lot::RwLock;
use sanduq::prelude::*;

const DIST: &str = r#"
parameters:
  box.console.name: Greeter

types:
  app::GreetCommand: ['console::command::Command']

services:
  app.greet:
    class: app::GreetCommand
    tags: [box.console.command]
"#;

struct Harness {
    dir: tempfile::TempDir,
    shared: SharedBuilder,
    resolver: Arc<LoaderResolver>,
}

impl Harness {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let shared: SharedBuilder = Arc::new(RwLock::new(Container::builder()));
        let yaml = YamlFileLoader::new(shared.clone(), FileLocator::new([dir.path()]));
        let resolver = Arc::new(LoaderResolver::new().with_loader(Arc::new(yaml)));
        Self { dir, shared, resolver }
    }

    fn write(&self, name: &str, content: &str) {
        fs::write(self.dir.path().join(name), content).unwrap();
    }

    fn compile(&self) -> sanduq::Result<Container> {
        let mut builder = std::mem::take(&mut *self.shared.write());
        builder.add_provider(&ConsoleProvider::default())?;
        builder.compile()
    }
}

fn added_commands(container: &Container) -> Vec<String> {
    container
        .definition("box.console")
        .unwrap()
        .method_calls()
        .iter()
        .filter(|call| call.method == "add")
        .map(|call| call.arguments[0].to_string())
        .collect()
}

#[test]
fn dist_file_loaded_through_support_pair() {
    let harness = Harness::new();
    harness.write("console.yml.dist", DIST);

    let loader = ResourceLoader::new(harness.resolver.clone());
    let resource = Resource::with_support("console.yml.dist", "console.yml");

    assert!(loader.supports(&resource));
    loader.load(&resource).unwrap();

    let container = harness.compile().unwrap();
    assert_eq!(
        container.parameter("box.console.name"),
        Some(&ParameterValue::from("Greeter"))
    );
    assert_eq!(
        added_commands(&container),
        vec!["@app.greet", "@box.console.command.help", "@box.console.command.list"]
    );
}

#[test]
fn local_override_wins_over_dist() {
    let harness = Harness::new();
    harness.write("console.yml.dist", DIST);
    harness.write("console.yml", "parameters:\n  box.console.name: Local\n");

    let retry = RetryLoader::new(harness.resolver.clone()).add_modifier(strip_suffix(".dist"));
    let collection = ResourceCollectionLoader::new(Arc::new(LoaderResolver::new().with_loader(Arc::new(retry))));

    let resources = ResourceCollection::new()
        .attach(Resource::new("console.yml"))
        .attach(Resource::new("console.yml.dist"));
    collection.load(&resources).unwrap();

    let container = harness.compile().unwrap();
    assert_eq!(
        container.parameter("box.console.name"),
        Some(&ParameterValue::from("Local"))
    );
    assert!(!container.has("app.greet"));
}

#[test]
fn missing_local_falls_back_to_dist() {
    let harness = Harness::new();
    harness.write("console.yml.dist", DIST);

    let retry = RetryLoader::new(harness.resolver.clone()).add_modifier(strip_suffix(".dist"));
    assert!(retry.supports("console.yml.dist", None));

    let collection = ResourceCollectionLoader::new(Arc::new(LoaderResolver::new().with_loader(Arc::new(retry))));
    let resources = ResourceCollection::new()
        .attach(Resource::new("console.yml"))
        .attach(Resource::new("console.yml.dist"));
    collection.load(&resources).unwrap();

    let container = harness.compile().unwrap();
    assert!(container.has("app.greet"));
}

#[test]
fn nothing_to_load_is_an_error() {
    let harness = Harness::new();
    let collection = ResourceCollectionLoader::new(harness.resolver.clone());

    let resources = ResourceCollection::new().attach(Resource::new("console.yml"));
    assert!(matches!(
        collection.load(&resources),
        Err(LoadError::CannotLoad { .. })
    ));
    assert!(!collection.load_optional(&resources).unwrap());
}

#[test]
fn malformed_optional_file_propagates() {
    let harness = Harness::new();
    harness.write("console.yml", "services: [oops");

    let loader = ResourceLoader::new(harness.resolver.clone());
    assert!(matches!(
        loader.load_optional(&Resource::new("console.yml")),
        Err(LoadError::Invalid { .. })
    ));
}

#[test]
fn untyped_yaml_command_is_rejected_at_compile() {
    let harness = Harness::new();
    harness.write(
        "console.yml",
        "services:\n  app.rogue:\n    class: app::Rogue\n    tags: [box.console.command]\n",
    );

    ResourceLoader::new(harness.resolver.clone())
        .load(&Resource::new("console.yml"))
        .unwrap();

    match harness.compile().unwrap_err() {
        ContainerError::Configuration(err) => {
            assert_eq!(err.id, "app.rogue");
            assert_eq!(err.tag, "box.console.command");
        }
        other => panic!("Expected Configuration, got: {other:?}"),
    }
}
