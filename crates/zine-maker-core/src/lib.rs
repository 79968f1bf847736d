//! Zine Maker Core Library
//!
//! This library provides the core functionality for building printable zine
//! booklets:
//! - Page aggregation of source PDFs into a single booklet document
//! - Passthrough normalization of a single document
//! - Acquisition of a preconfigured booklet from a well-known location

pub mod config;
pub mod error;
pub mod pdf;
pub mod source;
pub mod util;

pub use config::{AppConfig, AutoLoadConfig, OutputConfig};
pub use error::{Error, Result};
pub use pdf::{merge_documents, passthrough_copy, MergedDocument};
pub use source::{auto_load, create_source, BookletSource, FileSource, HttpSource};
