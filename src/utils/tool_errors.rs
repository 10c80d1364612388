use crate::constants::limits::{MAX_LISTED_ACTIONS, MAX_SUGGESTIONS};
use crate::errors::ToolError;
use crate::utils::suggest::suggest;

fn build_hint(suggestions: &[String], known: &[String]) -> Option<String> {
    let shown: Vec<&str> = known
        .iter()
        .take(MAX_LISTED_ACTIONS)
        .map(String::as_str)
        .collect();
    let suffix = if known.len() > shown.len() { ", ..." } else { "" };
    let mut parts = Vec::new();
    if !suggestions.is_empty() {
        parts.push(format!("Did you mean: {}?", suggestions.join(", ")));
    }
    if !shown.is_empty() {
        parts.push(format!("Use one of: {}{}.", shown.join(", "), suffix));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// `invalid_params` error for an unknown `what` value, with close-match suggestions.
pub fn unknown_value_error(what: &str, value: &str, known: &[String]) -> ToolError {
    let suggestions = suggest(value, known, MAX_SUGGESTIONS);
    let mut err = ToolError::invalid_params(format!("Unknown {}: {}", what, value));
    if let Some(hint) = build_hint(&suggestions, known) {
        err = err.with_hint(hint);
    }
    if !known.is_empty() {
        err = err.with_details(serde_json::json!({
            "known": known,
            "did_you_mean": suggestions,
        }));
    }
    err
}

pub fn unknown_action_error(tool: &str, action: &str, known_actions: &[&str]) -> ToolError {
    let known: Vec<String> = known_actions.iter().map(|s| s.to_string()).collect();
    unknown_value_error(&format!("{} action", tool), action, &known)
}
