//! Template conditions evaluated against legacy flavor parts.
//!
//! Template conditions are written against the host-info document the
//! verification service collects at registration time. A legacy flavor part
//! has a different shape, so each known condition is first translated into
//! an equivalent query over the legacy document through
//! [`FLAVOR_TEMPLATE_CONDITIONS`], then evaluated.
//!
//! Queries use a small path subset:
//!
//! ```text
//! //seg/seg/.../seg//*[text()='X']
//! ```
//!
//! The first segment is matched at any depth; each following segment is a
//! direct child key. The query holds when the addressed node, or any scalar
//! below it, renders as the text `X`. Arrays are traversed transparently.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::debug;

/// Template condition → legacy flavor part query.
///
/// Conditions missing from this table translate to the empty query, which
/// never holds.
pub const FLAVOR_TEMPLATE_CONDITIONS: &[(&str, &str)] = &[
    (
        "//host_info/tboot_installed//*[text()='true']",
        "//meta/description/tboot_installed//*[text()='true']",
    ),
    (
        "//host_info/hardware_features/SUEFI/enabled//*[text()='true']",
        "//hardware/feature/SUEFI/enabled//*[text()='true']",
    ),
    (
        "//host_info/hardware_features/cbnt/enabled//*[text()='true']",
        "//hardware/feature/CBNT/enabled//*[text()='true']",
    ),
    (
        "//host_info/vendor//*[text()='Linux']",
        "//meta/vendor//*[text()='INTEL']",
    ),
    (
        "//host_info/tpm_version//*[text()='2.0']",
        "//meta/description/tpm_version//*[text()='2.0']",
    ),
];

fn query_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^//(?P<path>[A-Za-z0-9_]+(?:/[A-Za-z0-9_]+)*)//\*\[text\(\)='(?P<text>[^']*)'\]$")
            .expect("document query regex must compile")
    })
}

/// The legacy document query for a template condition, or `""` when the
/// condition is unknown.
pub fn legacy_query_for(condition: &str) -> &'static str {
    FLAVOR_TEMPLATE_CONDITIONS
        .iter()
        .find_map(|(template_condition, query)| (*template_condition == condition).then_some(*query))
        .unwrap_or("")
}

/// A parsed `//path//*[text()='X']` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentQuery<'a> {
    path: Vec<&'a str>,
    text: &'a str,
}

impl<'a> DocumentQuery<'a> {
    /// Parse a query string. Anything outside the supported subset,
    /// including the empty string, yields `None`.
    pub fn parse(query: &'a str) -> Option<Self> {
        let captures = query_re().captures(query)?;
        let path = captures.name("path")?.as_str().split('/').collect();
        let text = captures.name("text")?.as_str();
        Some(Self { path, text })
    }

    pub fn path(&self) -> &[&'a str] {
        &self.path
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Every scalar node the query selects, in document order.
    pub fn select<'v>(&self, document: &'v Value) -> Vec<&'v Value> {
        let Some((anchor, rest)) = self.path.split_first() else {
            return Vec::new();
        };

        let mut nodes = Vec::new();
        collect_descendants_named(document, anchor, &mut nodes);
        for segment in rest {
            nodes = nodes
                .into_iter()
                .filter_map(|node| node.as_object()?.get(*segment))
                .flat_map(expand_array)
                .collect();
        }

        let mut selected = Vec::new();
        for node in nodes {
            collect_text_matches(node, self.text, &mut selected);
        }
        selected
    }

    pub fn holds(&self, document: &Value) -> bool {
        !self.select(document).is_empty()
    }
}

/// True iff `condition` translates to a query that selects at least one
/// non-null node of `document`.
pub fn condition_holds(condition: &str, document: &Value) -> bool {
    let query = legacy_query_for(condition);
    let Some(parsed) = DocumentQuery::parse(query) else {
        debug!(condition, "condition has no legacy query; treating as unsatisfied");
        return false;
    };
    parsed.holds(document)
}

fn expand_array(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

fn collect_descendants_named<'v>(value: &'v Value, key: &str, out: &mut Vec<&'v Value>) {
    match value {
        Value::Object(map) => {
            for (name, child) in map {
                if name == key {
                    out.extend(expand_array(child));
                }
                collect_descendants_named(child, key, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_descendants_named(item, key, out);
            }
        }
        _ => {}
    }
}

fn collect_text_matches<'v>(value: &'v Value, text: &str, out: &mut Vec<&'v Value>) {
    match value {
        Value::Null => {}
        Value::Bool(flag) => {
            let rendered = if *flag { "true" } else { "false" };
            if rendered == text {
                out.push(value);
            }
        }
        Value::Number(number) => {
            if number.to_string() == text {
                out.push(value);
            }
        }
        Value::String(s) => {
            if s == text {
                out.push(value);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_text_matches(item, text, out);
            }
        }
        Value::Object(map) => {
            for child in map.values() {
                collect_text_matches(child, text, out);
            }
        }
    }
}
