#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;
mod index;

pub use error::{IndexError, IndexResult};
pub use index::{ScoredEntry, VectorEntry, VectorIndex};

/// Tracing target for index operations.
pub const TRACING_TARGET: &str = "docqa_index";
