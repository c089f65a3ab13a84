//! Multilingual fuzzy search over the catalog
//!
//! Pipeline: a raw query fans out into script variants (planner), each
//! variant is matched against the immutable document corpus (matcher), and
//! the engine merges per-variant hits into one ranked list with exact
//! registry-number promotion.

pub mod doc;
pub mod engine;
pub mod matcher;
pub mod planner;
pub mod translit;

pub use doc::{DocKind, Payload, SearchDoc};
pub use engine::{SearchHit, SearchIndex, SharedIndex};
pub use matcher::{FieldWeights, MatchConfig};
