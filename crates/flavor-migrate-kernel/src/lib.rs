//! # Flavor migration kernel
//!
//! Converts a legacy flavor part into the template-driven PCR log format.
//! The kernel owns no I/O: it takes the raw legacy document and the decoded
//! template library and returns the converted flavor collection.
//!
//! ## Pipeline
//!
//! ```text
//! legacy document ──► condition   ← template condition → legacy query table
//!        │               │
//!        │           selector     ← every condition must hold
//!        │               │
//!        ▼               ▼
//!    assembler ──► rule_index     ← category's rule list, slot order
//!        │               │
//!        │           projector    ← per-bank walk, positional rule policy
//!        ▼
//!  flavor collection (signatures cleared, pcrs → pcr_logs)
//! ```

pub mod assembler;
pub mod condition;
pub mod error;
pub mod projector;
pub mod rule_index;
pub mod selector;

pub use assembler::{Conversion, convert_flavor_part, convert_signed_flavor};
pub use condition::{DocumentQuery, FLAVOR_TEMPLATE_CONDITIONS, condition_holds, legacy_query_for};
pub use error::MigrateError;
pub use projector::{project_measurements, translate_events};
pub use rule_index::PcrRuleIndex;
pub use selector::{select_templates, template_applies};
