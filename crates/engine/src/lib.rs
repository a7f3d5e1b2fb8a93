//! # diagsync Engine
//!
//! The reconciliation core: build a diagnostic catalog from AOI
//! definitions, extract per-instance overrides, classify every
//! (bit, language) pair, repair instances toward their template, and
//! gap-fill freshly copied instances.
//!
//! ## Pipeline
//!
//! ```text
//! Document ──> build_catalog ──> Catalog (immutable per load)
//!    │
//!    ├──> extract_overrides ──> InstanceOverride (sparse, per tag)
//!    │
//!    ├──> classify ──────────> Classification (pure, read-only)
//!    │
//!    ├──> repair_instance / repair_all_eligible (mutates the tree)
//!    │
//!    └──> gap_fill (mutates the tree, fixed 3 x 32 matrix)
//! ```
//!
//! All comparison rules live in [`classify`]; the repair, bulk-repair
//! and reporting paths share it instead of carrying their own drifting
//! copies. Classification is pure; repair and gap-fill mutate the
//! document tree and must not run concurrently against the same
//! document.

mod catalog;
mod classify;
mod error;
mod extract;
mod gapfill;
mod repair;
mod report;

pub use catalog::build_catalog;
pub use classify::{classify, BitClassification, Classification};
pub use error::{EngineError, Result};
pub use extract::extract_overrides;
pub use gapfill::{gap_fill, GapFillOutcome};
pub use repair::{repair_all_eligible, repair_instance, repair_named, BulkRepairOutcome, RepairOutcome};
pub use report::{classify_tag, report_document, BitRow, InstanceReport};
