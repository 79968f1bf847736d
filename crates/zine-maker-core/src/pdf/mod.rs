//! PDF page aggregation.

pub mod merge;

pub use merge::{merge_documents, passthrough_copy, MergedDocument};
