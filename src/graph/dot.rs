//! Graphviz DOT rendering of transition tables.

use crate::core::{State, TransitionTable};
use std::mem;

/// Data passed through a [`DotOptions`] replacer before rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DotElement {
    /// One edge per (event, source state) pair.
    Edge {
        from: String,
        to: String,
        label: String,
    },
    /// An accepting node.
    Node { name: String },
}

impl DotElement {
    fn render(self) -> String {
        match self {
            Self::Edge { from, to, label } => format!("{from} -> {to} [label=\"{label}\"]"),
            Self::Node { name } => name,
        }
    }
}

/// Rewrites elements before they are rendered.
pub type Replacer = Box<dyn Fn(DotElement) -> DotElement + Send + Sync>;

/// Rendering options. The default renders names unchanged.
#[derive(Default)]
pub struct DotOptions {
    replacer: Option<Replacer>,
}

impl DotOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Relabel edges and accepting nodes, e.g. to quote names Graphviz would
    /// reject.
    ///
    /// An element returned as the other variant is ignored and the original
    /// is rendered.
    pub fn replacer<F>(mut self, replacer: F) -> Self
    where
        F: Fn(DotElement) -> DotElement + Send + Sync + 'static,
    {
        self.replacer = Some(Box::new(replacer));
        self
    }

    fn apply(&self, element: DotElement) -> DotElement {
        let Some(replacer) = &self.replacer else {
            return element;
        };

        let replaced = replacer(element.clone());
        if mem::discriminant(&replaced) == mem::discriminant(&element) {
            replaced
        } else {
            element
        }
    }
}

/// Render `table` as a left-to-right digraph.
///
/// States that are only ever destinations are drawn as double circles.
/// Returns `None` for a table without events.
///
/// ```
/// use switchyard::builder::TransitionTableBuilder;
/// use switchyard::graph::{to_dot, DotOptions};
///
/// let table = TransitionTableBuilder::<String>::new()
///     .event("warn", ["green"], "yellow")
///     .event("panic", ["yellow"], "red")
///     .build()
///     .unwrap();
///
/// let dot = to_dot(&table, &DotOptions::new()).unwrap();
/// assert!(dot.contains("node [shape=doublecircle fixedsize=true width=1]; red;"));
/// assert!(dot.contains("green -> yellow [label=\"warn\"]"));
/// ```
pub fn to_dot<S: State>(table: &TransitionTable<S>, options: &DotOptions) -> Option<String> {
    let edges: Vec<String> = table
        .iter()
        .flat_map(|(event, definition)| {
            definition.from().iter().map(move |from| DotElement::Edge {
                from: from.name().to_string(),
                to: definition.to().name().to_string(),
                label: event.to_string(),
            })
        })
        .map(|edge| options.apply(edge).render())
        .collect();

    if edges.is_empty() {
        return None;
    }

    let accepting: Vec<String> = table
        .accepting_states()
        .into_iter()
        .map(|state| {
            options
                .apply(DotElement::Node {
                    name: state.name().to_string(),
                })
                .render()
        })
        .collect();

    let mut dot = String::from("digraph G {\n    rankdir=LR;\n\n");
    if !accepting.is_empty() {
        dot.push_str(&format!(
            "    node [shape=doublecircle fixedsize=true width=1]; {};\n",
            accepting.join(" ")
        ));
    }
    dot.push_str("    node [shape=circle fixedsize=true width=1];\n\n    ");
    dot.push_str(&edges.join(";\n    "));
    dot.push_str(";\n}");

    Some(dot)
}

impl<S: State> TransitionTable<S> {
    /// Render this table; see [`to_dot`].
    pub fn to_dot(&self, options: &DotOptions) -> Option<String> {
        to_dot(self, options)
    }
}
