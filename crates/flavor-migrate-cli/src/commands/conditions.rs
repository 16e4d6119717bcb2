use flavor_migrate_kernel::FLAVOR_TEMPLATE_CONDITIONS;
use serde_json::json;

use crate::support::{EXIT_FAILURE, exit_with};

pub fn run(json_output: bool) {
    if json_output {
        let payload: Vec<_> = FLAVOR_TEMPLATE_CONDITIONS
            .iter()
            .map(|(condition, query)| json!({ "condition": condition, "legacyQuery": query }))
            .collect();
        let rendered = serde_json::to_string_pretty(&payload).unwrap_or_else(|e| {
            exit_with(EXIT_FAILURE, format!("failed to render conditions json: {e}"))
        });
        println!("{rendered}");
        return;
    }

    println!("flavor-migrate conditions");
    println!();
    for (condition, query) in FLAVOR_TEMPLATE_CONDITIONS {
        println!("  {condition}");
        println!("    -> {query}");
    }
}
