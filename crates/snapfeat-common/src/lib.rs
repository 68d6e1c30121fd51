//! snapfeat common library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, utilities, and error handling for the snapfeat workspace.
//!
//! # Overview
//!
//! - **Error Handling**: [`SnapfeatError`] and the [`Result`] alias
//! - **Logging**: tracing subscriber setup driven by [`logging::LogConfig`]
//! - **Checksums**: sha256 of written output files
//! - **Types**: feature records shared by decoders and writers
//!
//! # Example
//!
//! ```no_run
//! use snapfeat_common::checksum::compute_file_checksum;
//!
//! fn main() -> snapfeat_common::Result<()> {
//!     let digest = compute_file_checksum("features.tsv")?;
//!     println!("features.tsv: {}", digest);
//!     Ok(())
//! }
//! ```

pub mod checksum;
pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{Result, SnapfeatError};
pub use types::FeatureRecord;
