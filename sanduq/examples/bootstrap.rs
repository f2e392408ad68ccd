//! Bootstraps a console application container from a distributed
//! configuration file.
//!
//! Run with `RUST_LOG=debug` to see every loader and pass decision.

use std::sync::Arc;

use parking_lot::RwLock;
use sanduq::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

const CONFIG: &str = r#"
parameters:
  box.console.name: Greeter
  box.console.version: 1.2.0

types:
  app::GreetCommand: ['console::command::Command']
  app::AuditSubscriber: ['event::EventSubscriber']

services:
  app.greet:
    class: app::GreetCommand
    arguments: ['%box.console.name%']
    tags:
      - box.console.command
      - { name: box.console.event.listener, event: console.terminate }

  app.audit:
    class: app::AuditSubscriber
    tags: [box.console.event.subscriber]
"#;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sanduq_container=info")),
        )
        .init();

    // Only the distributed file exists; the local override is optional
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("console.yml.dist"), CONFIG)?;

    let shared: SharedBuilder = Arc::new(RwLock::new(Container::builder()));
    let yaml = YamlFileLoader::new(shared.clone(), FileLocator::new([dir.path()]));

    let retry = RetryLoader::new(Arc::new(LoaderResolver::new().with_loader(Arc::new(yaml))))
        .add_modifier(strip_suffix(".dist"));
    let loader = ResourceCollectionLoader::new(Arc::new(LoaderResolver::new().with_loader(Arc::new(retry))));

    let resources = ResourceCollection::new()
        .attach(Resource::new("console.yml"))
        .attach(Resource::new("console.yml.dist"));
    loader.load(&resources)?;
    info!(%resources, "Configuration loaded");

    let mut builder = std::mem::take(&mut *shared.write());
    builder.add_provider(&ConsoleProvider::default())?;
    let container = builder.compile()?;

    let ids = ServiceIds::default();
    let app = container
        .definition(&ids.application)
        .ok_or("application definition missing")?;

    println!("{} services", container.len());
    println!("application: {}", app.class().unwrap_or("?"));
    for call in app.method_calls() {
        let arguments: Vec<String> = call.arguments.iter().map(ToString::to_string).collect();
        println!("  {}({})", call.method, arguments.join(", "));
    }

    if let Some(dispatcher) = container.definition(&ids.event_dispatcher) {
        println!("event dispatcher:");
        for call in dispatcher.method_calls() {
            let arguments: Vec<String> = call.arguments.iter().map(ToString::to_string).collect();
            println!("  {}({})", call.method, arguments.join(", "));
        }
    }

    Ok(())
}
