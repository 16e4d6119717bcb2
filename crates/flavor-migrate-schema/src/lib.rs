//! # flavor-migrate-schema
//!
//! Serde models for the three document shapes the migration touches:
//!
//! - the legacy flavor part (`signed_flavors`, per-bank `pcrs` maps),
//! - the flavor template (activation conditions plus per-category PCR rules),
//! - the PCR log flavor format that replaces `pcrs` with `pcr_logs`.
//!
//! Legacy and converted flavors share one `Flavor` type: conversion swaps
//! the `pcrs` field for `pcr_logs` and leaves every other field as read.
//! Fields the migration never interprets are kept in flattened `extra` maps
//! so they round-trip into the output untouched.
//!
//! ## Data model
//!
//! ```text
//! LegacyDocument
//!   └─ signed_flavors: [SignedFlavor]
//!        ├─ signature                     (cleared on conversion)
//!        └─ flavor: Flavor
//!             ├─ meta.description.flavor_part   → FlavorPartCategory
//!             ├─ hardware.feature.{CBNT,SUEFI}
//!             ├─ pcrs: bank → pcr_<n> → PcrEx   (legacy)
//!             └─ pcr_logs: [PcrLog]             (converted)
//! ```

pub mod algorithm;
pub mod error;
pub mod legacy;
pub mod pcr;
pub mod pcr_log;
pub mod template;

pub use algorithm::HashAlgorithm;
pub use error::SchemaError;
pub use legacy::{
    Description, EventEntry, FeatureFlag, Flavor, FlavorPartCategory, Hardware, HardwareFeature,
    FlagValue, LegacyDocument, LegacyPcrBank, LegacyPcrMap, Meta, PcrEx, SignedFlavor, bank_entry,
    render_flavor_collection,
};
pub use pcr::{Pcr, pcr_key};
pub use pcr_log::{EventlogEquals, NewEvent, PcrLog};
pub use template::{EventlogEqualsRule, FlavorPartRules, FlavorParts, FlavorTemplate, PcrRule};
