//! PCR log flavor format (`pcr_logs`).

use crate::pcr::Pcr;
use serde::{Deserialize, Serialize};

/// One projected PCR slot.
///
/// A default value is an unfilled slot: the projector pre-sizes its output
/// to the template's rule count and only fills the slots it finds legacy
/// measurements for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PcrLog {
    pub pcr: Pcr,
    pub measurement: String,
    pub pcr_matches: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eventlog_equals: Option<EventlogEquals>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eventlog_includes: Option<Vec<NewEvent>>,
}

impl PcrLog {
    pub fn is_filled(&self) -> bool {
        !self.measurement.is_empty() || !self.pcr.bank.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventlogEquals {
    pub events: Vec<NewEvent>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    pub tags: Vec<String>,
    pub measurement: String,
    pub type_id: String,
}
