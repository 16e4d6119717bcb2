//! Legacy flavor part documents.
//!
//! The same `Flavor` struct carries both shapes: a legacy flavor has
//! `pcrs` and no `pcr_logs`, a converted one the reverse.

use crate::error::SchemaError;
use crate::pcr::pcr_key;
use crate::pcr_log::PcrLog;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Legacy per-bank PCR map: bank name → `pcr_<n>` → measurement.
pub type LegacyPcrMap = BTreeMap<String, LegacyPcrBank>;

/// One bank of a legacy PCR map, keyed by `pcr_<n>`.
pub type LegacyPcrBank = BTreeMap<String, PcrEx>;

/// Top-level legacy flavor part file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyDocument {
    pub signed_flavors: Vec<SignedFlavor>,
}

impl LegacyDocument {
    /// Decode an already parsed JSON tree.
    pub fn from_value(tree: Value) -> Result<Self, SchemaError> {
        serde_json::from_value(tree).map_err(|source| SchemaError::LegacyDocument { source })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedFlavor {
    pub flavor: Flavor,
    #[serde(default)]
    pub signature: String,
}

/// Flavor part category (`meta.description.flavor_part`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlavorPartCategory {
    Platform,
    Os,
    HostUnique,
}

impl FlavorPartCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Platform => "PLATFORM",
            Self::Os => "OS",
            Self::HostUnique => "HOST_UNIQUE",
        }
    }
}

impl std::fmt::Display for FlavorPartCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FlavorPartCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PLATFORM" => Ok(Self::Platform),
            "OS" => Ok(Self::Os),
            "HOST_UNIQUE" => Ok(Self::HostUnique),
            _ => Err(format!("unknown flavor part: {s}")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Flavor {
    #[serde(default)]
    pub meta: Meta,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardware: Option<Hardware>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pcrs: Option<LegacyPcrMap>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pcr_logs: Option<Vec<PcrLog>>,

    /// `bios`, `external`, and whatever else the flavor carries.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Flavor {
    /// The category named by `meta.description.flavor_part`, if it is one
    /// the migration knows.
    pub fn category(&self) -> Option<FlavorPartCategory> {
        self.meta.description.flavor_part.parse().ok()
    }

    pub fn cbnt_enabled(&self) -> bool {
        self.hardware
            .as_ref()
            .and_then(|hw| hw.feature.as_ref())
            .and_then(|feature| feature.cbnt.as_ref())
            .is_some_and(FeatureFlag::is_enabled)
    }

    pub fn suefi_enabled(&self) -> bool {
        self.hardware
            .as_ref()
            .and_then(|hw| hw.feature.as_ref())
            .and_then(|feature| feature.suefi.as_ref())
            .is_some_and(FeatureFlag::is_enabled)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub description: Description,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Description {
    #[serde(default)]
    pub flavor_part: String,

    /// Ids of the templates applied during conversion.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flavor_template_ids: Vec<Uuid>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub cbnt_enabled: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub suefi_enabled: bool,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hardware {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature: Option<HardwareFeature>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HardwareFeature {
    #[serde(rename = "CBNT", default, skip_serializing_if = "Option::is_none")]
    pub cbnt: Option<FeatureFlag>,

    #[serde(rename = "SUEFI", default, skip_serializing_if = "Option::is_none")]
    pub suefi: Option<FeatureFlag>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A hardware feature block such as `{"enabled": true, "profile": "BTGP5"}`.
///
/// Flavors in the wild write `enabled` either as a JSON boolean or as the
/// string `"true"`; both are accepted and written back as read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureFlag {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<FlagValue>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FeatureFlag {
    pub fn enabled(value: bool) -> Self {
        Self {
            enabled: Some(FlagValue::Bool(value)),
            extra: Map::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        match &self.enabled {
            Some(FlagValue::Bool(value)) => *value,
            Some(FlagValue::Text(text)) => text.eq_ignore_ascii_case("true"),
            None => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Text(String),
}

/// Expected value of one legacy PCR, with its optional event log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PcrEx {
    #[serde(default)]
    pub value: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<Vec<EventEntry>>,
}

impl PcrEx {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            event: None,
        }
    }
}

/// One legacy measurement event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventEntry {
    #[serde(default)]
    pub label: String,

    #[serde(default)]
    pub digest_type: String,

    #[serde(default)]
    pub value: String,

    /// `info` and vendor additions; dropped by projection.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EventEntry {
    pub fn new(
        label: impl Into<String>,
        digest_type: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            digest_type: digest_type.into(),
            value: value.into(),
            extra: Map::new(),
        }
    }
}

/// Render a converted flavor collection as the output document: a bare JSON
/// list of signed flavors.
pub fn render_flavor_collection(flavors: &[SignedFlavor]) -> Result<String, SchemaError> {
    serde_json::to_string_pretty(flavors).map_err(|source| SchemaError::Serialize { source })
}

/// Look up PCR `index` in one legacy bank.
pub fn bank_entry(bank: &LegacyPcrBank, index: u32) -> Option<&PcrEx> {
    bank.get(&pcr_key(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_flavor_json() -> Value {
        json!({
            "signed_flavors": [{
                "flavor": {
                    "meta": {
                        "id": "4d3b1ff0-4e5a-4b1c-8b47-1f5b0b6b6f10",
                        "vendor": "INTEL",
                        "description": {
                            "flavor_part": "PLATFORM",
                            "tpm_version": "2.0",
                            "source": "host-01"
                        }
                    },
                    "bios": {"bios_name": "Intel Corporation", "bios_version": "SE5C620"},
                    "hardware": {
                        "processor_info": "54 06 05 00",
                        "feature": {
                            "TXT": {"enabled": true},
                            "CBNT": {"enabled": "true", "profile": "BTGP5"}
                        }
                    },
                    "pcrs": {
                        "SHA256": {
                            "pcr_0": {
                                "value": "abc123",
                                "event": [{
                                    "digest_type": "com.intel.mtwilson.core.common.model.MeasurementSha256",
                                    "value": "ev0",
                                    "label": "HASH_START",
                                    "info": {"ComponentName": "HASH_START"}
                                }]
                            }
                        }
                    }
                },
                "signature": "c2lnbmF0dXJl"
            }]
        })
    }

    #[test]
    fn legacy_document_decodes_typed_fields() {
        let doc = LegacyDocument::from_value(sample_flavor_json()).expect("document should decode");

        let signed = &doc.signed_flavors[0];
        assert_eq!(signed.signature, "c2lnbmF0dXJl");
        assert_eq!(signed.flavor.category(), Some(FlavorPartCategory::Platform));
        assert!(signed.flavor.cbnt_enabled());
        assert!(!signed.flavor.suefi_enabled());

        let pcrs = signed.flavor.pcrs.as_ref().expect("pcrs should decode");
        let entry = bank_entry(&pcrs["SHA256"], 0).expect("pcr_0 should exist");
        assert_eq!(entry.value, "abc123");
        let events = entry.event.as_ref().expect("events should decode");
        assert_eq!(events[0].label, "HASH_START");
        assert!(events[0].extra.contains_key("info"));
    }

    #[test]
    fn untouched_fields_round_trip() {
        let input = sample_flavor_json();
        let doc: LegacyDocument =
            serde_json::from_value(input.clone()).expect("document should decode");
        let output = serde_json::to_value(&doc).expect("document should encode");
        assert_eq!(output, input);
    }

    #[test]
    fn converted_collection_is_not_a_legacy_document() {
        let converted = json!([{ "flavor": { "meta": {} }, "signature": "" }]);
        assert!(matches!(
            LegacyDocument::from_value(converted),
            Err(SchemaError::LegacyDocument { .. })
        ));
    }

    #[test]
    fn unknown_flavor_part_has_no_category() {
        let mut flavor = Flavor::default();
        flavor.meta.description.flavor_part = "ASSET_TAG".to_string();
        assert_eq!(flavor.category(), None);
        assert_eq!(
            "HOST_UNIQUE".parse::<FlavorPartCategory>(),
            Ok(FlavorPartCategory::HostUnique)
        );
    }

    #[test]
    fn feature_flag_accepts_bool_and_text() {
        assert!(FeatureFlag::enabled(true).is_enabled());
        assert!(!FeatureFlag::enabled(false).is_enabled());
        let text: FeatureFlag =
            serde_json::from_value(json!({"enabled": "TRUE"})).expect("flag should decode");
        assert!(text.is_enabled());
        let missing: FeatureFlag =
            serde_json::from_value(json!({"profile": "BTGP0"})).expect("flag should decode");
        assert!(!missing.is_enabled());
    }
}
