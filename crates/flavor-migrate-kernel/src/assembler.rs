//! Document assembly: one legacy flavor part in, one flavor collection out.

use crate::error::MigrateError;
use crate::projector::project_measurements;
use crate::rule_index::PcrRuleIndex;
use crate::selector::select_templates;
use flavor_migrate_schema::{Flavor, FlavorTemplate, LegacyDocument, SignedFlavor};
use serde_json::Value;
use tracing::debug;

/// Result of converting one legacy flavor part.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    /// Converted signed flavors, in input order, signatures cleared.
    pub flavors: Vec<SignedFlavor>,
    /// Templates whose conditions held, in library order.
    pub templates: Vec<FlavorTemplate>,
}

/// Convert the raw bytes of a legacy flavor part using `library`.
///
/// Templates are selected once for the whole document and then applied to
/// every signed flavor that carries a legacy PCR map.
pub fn convert_flavor_part(
    document: &[u8],
    library: Vec<FlavorTemplate>,
) -> Result<Conversion, MigrateError> {
    let tree: Value = serde_json::from_slice(document)
        .map_err(|source| MigrateError::MalformedDocument { source })?;
    let templates = select_templates(&tree, library);

    let legacy = LegacyDocument::from_value(tree)?;

    let flavors = legacy
        .signed_flavors
        .into_iter()
        .enumerate()
        .map(|(position, signed)| convert_signed_flavor(position, signed, &templates))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        flavors = flavors.len(),
        templates = templates.len(),
        "flavor part converted"
    );
    Ok(Conversion { flavors, templates })
}

/// Convert one signed flavor against the already selected templates.
///
/// `position` only labels errors.
pub fn convert_signed_flavor(
    position: usize,
    signed: SignedFlavor,
    templates: &[FlavorTemplate],
) -> Result<SignedFlavor, MigrateError> {
    // The collection is not signed per flavor; the signature is dropped.
    let SignedFlavor { mut flavor, .. } = signed;

    if flavor.pcr_logs.is_some() {
        return Err(MigrateError::AlreadyConverted { position });
    }

    apply_feature_flags(&mut flavor);

    let Some(pcrs) = flavor.pcrs.take() else {
        debug!(position, "flavor has no pcrs; copied through");
        return Ok(SignedFlavor {
            flavor,
            signature: String::new(),
        });
    };

    let category = flavor.category();
    let mut pcr_logs = None;
    for template in templates {
        flavor.meta.description.flavor_template_ids.push(template.id);

        let Some(category) = category else {
            continue;
        };
        let Some(index) = PcrRuleIndex::build(category, template) else {
            continue;
        };
        // Last template with rules for the category wins.
        pcr_logs = Some(project_measurements(&pcrs, &index));
    }

    if category.is_none() {
        debug!(
            position,
            flavor_part = %flavor.meta.description.flavor_part,
            "unknown flavor part; pcrs dropped without projection"
        );
    }

    flavor.pcr_logs = pcr_logs;
    Ok(SignedFlavor {
        flavor,
        signature: String::new(),
    })
}

/// CBNT takes precedence over SUEFI; at most one flag is set.
fn apply_feature_flags(flavor: &mut Flavor) {
    if flavor.cbnt_enabled() {
        flavor.meta.description.cbnt_enabled = true;
    } else if flavor.suefi_enabled() {
        flavor.meta.description.suefi_enabled = true;
    }
}
