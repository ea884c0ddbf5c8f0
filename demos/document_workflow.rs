//! Document Approval Workflow
//!
//! This example demonstrates a multi-stage approval workflow whose listeners
//! can veto a transition.
//!
//! Key concepts:
//! - Machine declared from JSON configuration
//! - Arguments passed through to listeners
//! - Rejecting listeners cancel the transition (state is kept)
//! - Once listeners for one-off notifications
//! - Accepting state (published) drawn as a double circle
//!
//! Run with: cargo run --example document_workflow

use switchyard::{DotElement, DotOptions, ListenerError, StateMachine};
use tracing_subscriber::EnvFilter;

const WORKFLOW: &str = r#"{
    "initial": "draft",
    "events": {
        "submit": { "from": "draft", "to": "review" },
        "approve": { "from": "review", "to": "approved" },
        "revise": { "from": ["review", "approved"], "to": "draft" },
        "publish": { "from": "approved", "to": "published" }
    }
}"#;

#[derive(Clone, Debug)]
struct Document {
    id: u64,
    word_count: usize,
}

type Workflow = StateMachine<String, Document, String>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    println!("=== Document Approval Workflow ===\n");

    let workflow: Workflow = StateMachine::from_json(WORKFLOW)?;

    // Audit every transition.
    workflow.on_transition(|event| async move {
        Ok(format!(
            "document {} moved {} -> {}",
            event.args.id, event.from, event.to
        ))
    });

    workflow.on("submit", |event| async move {
        if event.args.word_count < 100 {
            return Err(ListenerError::new(format!(
                "document {} is too short ({} words)",
                event.args.id, event.args.word_count
            )));
        }
        Ok("ready for review".to_string())
    });

    workflow.once("publish", |event| async move {
        Ok(format!("first publication after {:?}", event.elapsed()))
    });

    let draft = Document {
        id: 123,
        word_count: 40,
    };
    match workflow.fire("submit", draft.clone()).await {
        Ok(results) => println!("Submitted: {results:?}"),
        Err(err) => println!("Submit rejected: {err}"),
    }
    println!("  state is still {}\n", workflow.state());

    let doc = Document {
        word_count: 250,
        ..draft
    };
    println!("Submitted: {:?}", workflow.fire("submit", doc.clone()).await?);
    println!("Approved: {:?}", workflow.fire("approve", doc.clone()).await?);

    if let Some(publish) = workflow.operation("publish") {
        println!("Published: {:?}", publish.fire(doc.clone()).await?);
    }
    println!("  final state: {}\n", workflow.state());

    let options = DotOptions::new().replacer(|element| match element {
        DotElement::Node { name } => DotElement::Node {
            name: format!("\"{name}\""),
        },
        edge => edge,
    });
    if let Some(dot) = workflow.to_dot(&options) {
        println!("{dot}");
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
