#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod token;

/// Tracing target for the core library.
pub const TRACING_TARGET: &str = "docqa_core";
