//! Protocol decoding modules.
//!
//! Each protocol follows a layered structure:
//! - `layout`: byte offsets and ranges (source of truth)
//! - `reader`/`writer`: safe byte access and protocol conventions
//! - codecs: domain-level decoding and encoding (no direct byte indexing)
//! - `error`: explicit, actionable errors
//!
//! Codecs are pure and contain no I/O; sources and analysis layers handle
//! file access and aggregation.

pub mod meter;
