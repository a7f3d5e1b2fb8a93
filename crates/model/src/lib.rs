//! # diagsync Model
//!
//! Pure data model for localized diagnostic-bit descriptions in L5X
//! controller exports.
//!
//! An AOI template defines up to five 32-bit diagnostic words
//! (`iDiagnostic1`..`iDiagnostic5`); every bit carries default text per
//! language. An instance of that template may locally override some bits.
//! This crate holds the shared vocabulary for the engines that compare
//! and repair the two sides:
//!
//! - [`BitKey`] — composite (word, bit) address parsed from comment operands
//! - [`BitText`] — language code → text for one bit
//! - [`DiagnosticTemplate`] / [`Catalog`] — immutable template snapshots
//! - [`InstanceOverride`] — sparse local overrides of one instance
//! - [`BitStatus`] / [`InstanceStatus`] — computed consistency verdicts
//! - [`DiagConfig`] — site policy (languages, placeholders, type prefixes)
//!
//! No I/O happens here; the document collaborator and the engines live in
//! their own crates.

mod catalog;
mod config;
mod key;
mod status;
mod text;

pub use catalog::{Catalog, DiagnosticTemplate, InstanceOverride};
pub use config::DiagConfig;
pub use key::BitKey;
pub use status::{BitStatus, InstanceStatus};
pub use text::BitText;
