//! Composes a store, registry, and engine, then streams two
//! executions, printing each event as a JSON line.
//!
//! Run with:
//!
//! ```text
//! RUST_LOG=debug cargo run -p relay-engine --example echo_stream
//! ```

use relay_auth::{AuthEngine, GroupSnapshot, GroupStore};
use relay_command::CommandRegistry;
use relay_engine::{commands, ExecutionEngine, ExecutionRequest};
use serde_json::json;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let store = Arc::new(GroupStore::from_snapshot(
        &GroupSnapshot::new().with_group("users", ["jane"]),
    ));

    let mut registry = CommandRegistry::new();
    registry.register(commands::echo()).expect("register echo");
    registry
        .register(commands::countdown())
        .expect("register countdown");

    let engine = ExecutionEngine::new(Arc::new(registry), AuthEngine::new(store));

    for request in [
        ExecutionRequest::new("echo", "jane", json!({"text": "hello, relay"})),
        ExecutionRequest::new("countdown", "jane", json!({"steps": 3, "interval_ms": 200})),
        // Denied: mallory is in no group.
        ExecutionRequest::new("echo", "mallory", json!({"text": "hi"})),
    ] {
        println!("--- {} as {}", request.command, request.principal);
        let mut stream = engine.execute(request);
        while let Some(event) = stream.recv().await {
            println!("{}", serde_json::to_string(&event).expect("serialize"));
        }
    }
}
