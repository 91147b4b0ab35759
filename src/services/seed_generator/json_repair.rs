//! Lenient extraction of a JSON object from free-form model output.
//!
//! Strategies run in order and the first one that yields a value wins.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static OUTERMOST_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("static regex is valid"));
static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json)?\s*").expect("static regex is valid"));
static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([}\]])").expect("static regex is valid"));

type ParseStrategy = fn(&str) -> Option<Value>;

const STRATEGIES: [(&str, ParseStrategy); 3] = [
    ("direct", parse_direct),
    ("embedded_object", parse_embedded_object),
    ("repaired", parse_repaired),
];

/// Try every strategy in order; returns the first parsed value and the name
/// of the strategy that produced it.
pub fn parse_lenient(content: &str) -> Option<(Value, &'static str)> {
    STRATEGIES
        .iter()
        .find_map(|(name, strategy)| strategy(content).map(|value| (value, *name)))
}

fn parse_direct(content: &str) -> Option<Value> {
    serde_json::from_str(content.trim()).ok()
}

/// From the first `{` to the last `}`, ignoring any prose around it
fn parse_embedded_object(content: &str) -> Option<Value> {
    let found = OUTERMOST_OBJECT.find(content)?;
    serde_json::from_str(found.as_str()).ok()
}

/// Strip markdown fences and trailing commas before parsing
fn parse_repaired(content: &str) -> Option<Value> {
    let unfenced = CODE_FENCE.replace_all(content, "");
    let fixed = TRAILING_COMMA.replace_all(&unfenced, "$1");
    serde_json::from_str(fixed.trim())
        .ok()
        .or_else(|| parse_embedded_object(&fixed))
}
