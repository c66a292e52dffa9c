#![deny(missing_docs)]

//! # pgplain Core
//!
//! Extraction + substitution + injection pipeline: pulls `Params`/`Row`
//! struct declarations out of sqlc-generated sources, rewrites their
//! storage-wrapper field types into plain scalars, re-emits them as
//! standalone package artifacts, and mirrors the type vocabulary into a
//! generated TypeScript client by balanced-region replacement.

/// Shared error types.
pub mod error;

/// Structural block discovery in raw source text.
pub mod extractor;

/// Type mapping table and projection passes.
pub mod type_mapping;

/// Artifact rendering and atomic writes.
pub mod assembler;

/// Depth-balanced foreign-region replacement.
pub mod region;

/// Task configuration, including the static content blobs.
pub mod config;

/// Task orchestration.
pub mod pipeline;

pub use assembler::{write_atomic, Artifact};
pub use config::{ExtractionConfig, GeneratorConfig, RegionPatch, StaticOutput, TaskConfig};
pub use error::{AppError, AppResult};
pub use extractor::{extract_blocks, ExtractedBlock, SourceUnit, StructuralPattern};
pub use pipeline::{Driver, RunReport, Stage};
pub use region::replace_region;
pub use type_mapping::{Projector, QualifierRemap, TypeTable};
