//! Template selection.
//!
//! A template applies to a legacy flavor part when its label is non-empty
//! and every one of its conditions holds. A template with no conditions
//! never applies.

use crate::condition::condition_holds;
use flavor_migrate_schema::FlavorTemplate;
use serde_json::Value;
use tracing::{debug, info};

/// Whether every condition of `template` holds against `document`.
///
/// Evaluation stops at the first failing condition.
pub fn template_applies(template: &FlavorTemplate, document: &Value) -> bool {
    if template.label.is_empty() {
        debug!(id = %template.id, "skipping template without label");
        return false;
    }
    if template.condition.is_empty() {
        debug!(label = %template.label, "template has no conditions; not applied");
        return false;
    }

    match template
        .condition
        .iter()
        .find(|condition| !condition_holds(condition, document))
    {
        Some(failed) => {
            debug!(label = %template.label, condition = %failed, "template condition not met");
            false
        }
        None => true,
    }
}

/// Templates from `library` that apply to `document`, in library order.
/// Duplicate labels are kept.
pub fn select_templates(document: &Value, library: Vec<FlavorTemplate>) -> Vec<FlavorTemplate> {
    let selected: Vec<FlavorTemplate> = library
        .into_iter()
        .filter(|template| template_applies(template, document))
        .collect();
    for template in &selected {
        info!(label = %template.label, id = %template.id, "template selected");
    }
    selected
}
