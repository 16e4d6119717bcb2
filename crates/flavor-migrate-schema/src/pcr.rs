//! PCR identity and the legacy `pcr_<n>` key.

use serde::{Deserialize, Serialize};

const PCR_KEY_PREFIX: &str = "pcr_";

/// A PCR slot identified by (bank, index).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pcr {
    pub index: u32,
    pub bank: String,
}

impl Pcr {
    pub fn new(index: u32, bank: impl Into<String>) -> Self {
        Self {
            index,
            bank: bank.into(),
        }
    }
}

/// Key under which a legacy bank map stores the measurement of PCR `index`.
pub fn pcr_key(index: u32) -> String {
    format!("{PCR_KEY_PREFIX}{index}")
}
