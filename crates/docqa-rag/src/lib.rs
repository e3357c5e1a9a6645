#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod assembler;
mod config;
mod error;
pub mod generator;
mod indexer;
mod loader;
pub mod provider;
mod retriever;
mod service;
pub mod splitter;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use assembler::ContextAssembler;
pub use config::RagConfig;
pub use error::{Error, Result};
pub use generator::{ContinuationPolicy, Generator, GeneratorConfig};
pub use indexer::Indexer;
pub use loader::extract_text;
pub use retriever::{RetrievedChunk, Retriever};
pub use service::RagService;

/// Tracing target for the main library.
pub const TRACING_TARGET: &str = "docqa_rag";
