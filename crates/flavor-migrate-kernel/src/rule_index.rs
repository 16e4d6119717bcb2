//! PCR rule index for one (flavor part category, template) pairing.

use flavor_migrate_schema::{FlavorPartCategory, FlavorTemplate, PcrRule};
use tracing::debug;

/// Ordered PCR index → bank map plus the template's rule list.
///
/// Slot order is the order in which each PCR index first appears in the
/// rule list. A repeated index keeps its first slot and takes the bank of
/// its last occurrence. The projector addresses `rules` by slot position,
/// so the two must be built from the same list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PcrRuleIndex {
    slots: Vec<(u32, String)>,
    rules: Vec<PcrRule>,
}

impl PcrRuleIndex {
    /// Index for `category` in `template`, or `None` when the template has
    /// no rule list for that category.
    pub fn build(category: FlavorPartCategory, template: &FlavorTemplate) -> Option<Self> {
        let Some(rules) = template.rules_for(category) else {
            debug!(
                label = %template.label,
                category = %category,
                "template has no pcr rules for category"
            );
            return None;
        };
        Some(Self::from_rules(rules.to_vec()))
    }

    pub fn from_rules(rules: Vec<PcrRule>) -> Self {
        let mut slots: Vec<(u32, String)> = Vec::with_capacity(rules.len());
        for rule in &rules {
            match slots.iter_mut().find(|(index, _)| *index == rule.pcr.index) {
                Some(slot) => slot.1 = rule.pcr.bank.clone(),
                None => slots.push((rule.pcr.index, rule.pcr.bank.clone())),
            }
        }
        Self { slots, rules }
    }

    /// (PCR index, bank) pairs in slot order.
    pub fn slots(&self) -> &[(u32, String)] {
        &self.slots
    }

    pub fn rules(&self) -> &[PcrRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
