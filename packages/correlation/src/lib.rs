#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geospatial correlation engine for barrio triage.
//!
//! Takes validated barrio records, an optional user-marked region, and
//! an optional point-of-interest dataset, and produces one
//! deterministic result record per barrio: overlap classification
//! against the marked region plus per-category point tallies. All
//! computation is synchronous and pure; per-record problems surface as
//! diagnostics on the affected record, never as batch failures.

pub mod aggregate;
pub mod ingest;
pub mod overlap;
pub mod points;

pub use aggregate::correlate;
pub use ingest::{IngestError, ParsedNeighborhoods, ParsedPoints, parse_neighborhoods, parse_points};
pub use overlap::classify_overlap;
pub use points::tally_points;
