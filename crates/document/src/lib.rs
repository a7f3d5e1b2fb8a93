//! # diagsync Document
//!
//! The document collaborator: a mutable XML element tree for Rockwell
//! L5X controller exports, parsed and serialized with `quick-xml`.
//!
//! Two properties matter to the reconciliation engines sitting on top:
//!
//! - CDATA payloads are stored raw and re-emitted as CDATA sections, so
//!   an unresolved-marker sequence (`<@...`) survives load/save
//!   round-trips and keeps triggering classification on reload.
//! - Missing structure is never fatal. Only unparseable XML raises a
//!   [`DocumentError`]; a tag without `Comments`, a definition without
//!   `Parameters`, and similar gaps surface as `Option`/empty results.

mod error;
pub mod l5x;
mod tree;

pub use error::{DocumentError, Result};
pub use tree::{Document, Element, Node};
