//! Measurement projection: legacy per-bank PCR maps to PCR log slots.
//!
//! For every legacy bank the projector walks the rule index in slot order
//! with a cursor that starts at zero:
//!
//! 1. a rule whose bank algorithm differs from the legacy bank ends the walk
//!    for that legacy bank (later rules are not visited);
//! 2. when the legacy bank has a measurement for the rule's PCR index, slot
//!    `cursor` is filled from it, with the match flag and event log policy
//!    taken from the rule at position `cursor`;
//! 3. the cursor advances after every visited rule, filled or not.
//!
//! The output is pre-sized to the index length, so slots without a legacy
//! measurement stay empty. Slots are shared between legacy banks; a later
//! bank overwrites what an earlier one wrote at the same position. Only the
//! fields the later bank sets are replaced; event blocks written by the
//! earlier bank stay when the later bank has no events.

use crate::rule_index::PcrRuleIndex;
use flavor_migrate_schema::{
    EventEntry, EventlogEquals, HashAlgorithm, LegacyPcrMap, NewEvent, Pcr, PcrEx, PcrLog,
    PcrRule, bank_entry,
};
use tracing::debug;

pub fn project_measurements(pcrs: &LegacyPcrMap, index: &PcrRuleIndex) -> Vec<PcrLog> {
    let mut logs = vec![PcrLog::default(); index.len()];

    for (bank, measurements) in pcrs {
        let bank_algorithm = HashAlgorithm::from_bank_name(bank);
        let mut cursor = 0;

        for (pcr_index, rule_bank) in index.slots() {
            if bank_algorithm != HashAlgorithm::from_bank_name(rule_bank) {
                debug!(
                    legacy_bank = %bank,
                    rule_bank = %rule_bank,
                    position = cursor,
                    "bank mismatch; remaining rules skipped for this bank"
                );
                break;
            }

            if let Some(expected) = bank_entry(measurements, *pcr_index) {
                let rule = positional_rule(index.rules(), cursor);
                fill_slot(&mut logs[cursor], *pcr_index, bank, expected, rule);
            }

            cursor += 1;
        }
    }

    logs
}

/// The rule that governs output slot `slot`.
///
/// This is the rule at the same ordinal position in the template's rule
/// list, not necessarily the rule whose (index, bank) selected the
/// measurement. The two differ when a PCR index repeats in the rule list.
fn positional_rule(rules: &[PcrRule], slot: usize) -> Option<&PcrRule> {
    rules.get(slot)
}

fn fill_slot(
    slot: &mut PcrLog,
    pcr_index: u32,
    bank: &str,
    expected: &PcrEx,
    rule: Option<&PcrRule>,
) {
    slot.pcr = Pcr::new(pcr_index, bank);
    slot.measurement = expected.value.clone();
    slot.pcr_matches = rule.is_some_and(|rule| rule.pcr_matches);

    let (Some(events), Some(rule)) = (expected.event.as_deref(), rule) else {
        return;
    };

    if let Some(equals) = &rule.eventlog_equals {
        slot.eventlog_equals = Some(EventlogEquals {
            events: translate_events(events),
            exclude_tags: equals.excluding_tags.clone(),
        });
    }

    if rule.eventlog_includes.is_some() {
        slot.eventlog_includes = Some(translate_events(events));
    }
}

/// Legacy events in PCR log form: label → tag, value → measurement,
/// digest type → type id. Order is preserved.
pub fn translate_events(events: &[EventEntry]) -> Vec<NewEvent> {
    events
        .iter()
        .map(|event| NewEvent {
            tags: vec![event.label.clone()],
            measurement: event.value.clone(),
            type_id: event.digest_type.clone(),
        })
        .collect()
}
