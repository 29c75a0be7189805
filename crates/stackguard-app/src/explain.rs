//! The `explain` use case: look up rule documentation.

use stackguard_types::explain::{self, Explanation};

/// Output from the explain use case.
#[derive(Clone, Debug)]
pub enum ExplainOutput {
    /// Found an explanation for the identifier.
    Found(Explanation),
    /// Unknown identifier; includes the available rule ids.
    NotFound {
        identifier: String,
        available_rule_ids: &'static [&'static str],
    },
}

/// Look up an explanation for a rule id.
pub fn run_explain(identifier: &str) -> ExplainOutput {
    match explain::lookup_explanation(identifier.trim()) {
        Some(exp) => ExplainOutput::Found(exp),
        None => ExplainOutput::NotFound {
            identifier: identifier.to_string(),
            available_rule_ids: explain::all_rule_ids(),
        },
    }
}

/// Format an explanation for terminal display.
pub fn format_explanation(exp: &Explanation) -> String {
    let mut out = String::new();

    out.push_str(exp.title);
    out.push('\n');
    out.push_str(&"=".repeat(exp.title.len()));
    out.push_str("\n\n");
    out.push_str(exp.description);
    out.push_str("\n\n");
    out.push_str("Remediation\n");
    out.push_str("-----------\n");
    out.push_str(exp.remediation);
    out.push_str("\n\n");
    out.push_str("Examples\n");
    out.push_str("--------\n\n");
    out.push_str("Before (violation):\n");
    out.push_str("```ts\n");
    out.push_str(exp.examples.before);
    out.push('\n');
    out.push_str("```\n\n");
    out.push_str("After (fixed):\n");
    out.push_str("```ts\n");
    out.push_str(exp.examples.after);
    out.push('\n');
    out.push_str("```\n");

    out
}

/// Format the "not found" error message for terminal display.
pub fn format_not_found(identifier: &str, rule_ids: &[&'static str]) -> String {
    let mut out = format!("Unknown rule id: {identifier}\n\nAvailable rule ids:\n");
    for id in rule_ids {
        out.push_str(&format!("  - {id}\n"));
    }
    out
}
