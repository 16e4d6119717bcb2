//! Flavor templates.
//!
//! A template is gated by `condition` (every entry must hold against the
//! legacy document) and carries, per flavor part category, the ordered PCR
//! rules used to build `pcr_logs`.

use crate::error::SchemaError;
use crate::legacy::FlavorPartCategory;
use crate::pcr::Pcr;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlavorTemplate {
    #[serde(default)]
    pub id: Uuid,

    /// An empty label marks the template invalid; it is never applied.
    #[serde(default)]
    pub label: String,

    #[serde(default)]
    pub condition: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flavor_parts: Option<FlavorParts>,
}

impl FlavorTemplate {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SchemaError> {
        serde_json::from_slice(bytes).map_err(|source| SchemaError::Template { source })
    }

    /// Ordered PCR rules for `category`, or `None` when the template does
    /// not describe that flavor part.
    pub fn rules_for(&self, category: FlavorPartCategory) -> Option<&[PcrRule]> {
        self.flavor_parts
            .as_ref()?
            .part(category)
            .map(|part| part.pcr_rules.as_slice())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlavorParts {
    #[serde(rename = "PLATFORM", default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<FlavorPartRules>,

    #[serde(rename = "OS", default, skip_serializing_if = "Option::is_none")]
    pub os: Option<FlavorPartRules>,

    #[serde(rename = "HOST_UNIQUE", default, skip_serializing_if = "Option::is_none")]
    pub host_unique: Option<FlavorPartRules>,
}

impl FlavorParts {
    pub fn part(&self, category: FlavorPartCategory) -> Option<&FlavorPartRules> {
        match category {
            FlavorPartCategory::Platform => self.platform.as_ref(),
            FlavorPartCategory::Os => self.os.as_ref(),
            FlavorPartCategory::HostUnique => self.host_unique.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlavorPartRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,

    #[serde(default)]
    pub pcr_rules: Vec<PcrRule>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PcrRule {
    pub pcr: Pcr,

    #[serde(default)]
    pub pcr_matches: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eventlog_equals: Option<EventlogEqualsRule>,

    /// Event tags the PCR's log must include.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eventlog_includes: Option<Vec<String>>,
}

impl PcrRule {
    pub fn new(index: u32, bank: impl Into<String>, pcr_matches: bool) -> Self {
        Self {
            pcr: Pcr::new(index, bank),
            pcr_matches,
            eventlog_equals: None,
            eventlog_includes: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventlogEqualsRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excluding_tags: Option<Vec<String>>,
}
