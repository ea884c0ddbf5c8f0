//! Traffic Light State Machine
//!
//! This example demonstrates a simple cyclic state machine.
//!
//! Key concepts:
//! - Cyclic state transitions (states repeat)
//! - Generic transition listeners
//! - Per-event operations
//! - Graphviz export of the transition table
//!
//! Run with: cargo run --example traffic_light

use std::time::Duration;
use switchyard::core::State;
use switchyard::{state_enum, DotOptions, ListenerError, StateMachine, StateMachineBuilder};
use tracing_subscriber::EnvFilter;

state_enum! {
    enum TrafficLight {
        Green => "green",
        Yellow => "yellow",
        Red => "red",
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into()))
        .init();

    println!("=== Traffic Light State Machine ===\n");

    let machine: StateMachine<TrafficLight, (), &'static str> = StateMachineBuilder::new()
        .initial(TrafficLight::Green)
        .event("warn", [TrafficLight::Green], TrafficLight::Yellow)
        .event("panic", [TrafficLight::Yellow], TrafficLight::Red)
        .event("calm", [TrafficLight::Red], TrafficLight::Yellow)
        .event("clear", [TrafficLight::Yellow], TrafficLight::Green)
        .build()?;

    machine.on_transition(|event| async move {
        println!(
            "  {} -> {} via {}",
            event.from.name(),
            event.to.name(),
            event.event
        );
        Ok::<_, ListenerError>("logged")
    });

    // The light only switches once the lamp has warmed up.
    machine.on("panic", |_| async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        Ok("lamp warmed")
    });

    println!("Initial state: {}\n", machine.state().name());

    for event in ["warn", "panic", "calm", "clear"] {
        let results = machine.fire(event, ()).await?;
        println!("  results: {results:?}");
    }

    println!("\nBack to: {}", machine.state().name());

    // Firing from the wrong state leaves the light as it is.
    if let Err(err) = machine.fire("calm", ()).await {
        println!("Rejected: {err}");
    }

    println!("\nAvailable from {}:", machine.state().name());
    for operation in machine.operations().filter(|op| op.can()) {
        println!("  {} -> {}", operation.name(), operation.to().name());
    }

    if let Some(dot) = machine.to_dot(&DotOptions::new()) {
        println!("\n{dot}");
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
