//! # conscope-core
//!
//! Core library for conscope - a terminal reviewer for behavioral-analysis
//! transcript archives.
//!
//! This library provides:
//! - Domain types for transcript summaries, analysis records, and documents
//! - An HTTP client for the static archive (listing scrape, transcript and
//!   analysis fetches)
//! - Best-effort parsers for transcript and analysis bodies
//! - Filename-based behavior classification
//! - The filter & sort engine behind the summary table
//! - Configuration management and logging infrastructure
//!
//! ## Data flow
//!
//! file discovery → per-file metadata merge → in-memory summary list →
//! filter/sort → (on selection) full-content fetch → document render
//!
//! ## Example
//!
//! ```rust,no_run
//! use conscope_core::{ArchiveClient, Config};
//!
//! # async fn demo() -> conscope_core::Result<()> {
//! let config = Config::load()?;
//! let client = ArchiveClient::new(&config.archive)?;
//! let summaries = conscope_core::catalog::load_catalog(&client).await?;
//! println!("{} transcripts", summaries.len());
//! # Ok(())
//! # }
//! ```

// Re-export commonly used items at the crate root
pub use archive::ArchiveClient;
pub use config::Config;
pub use error::{Error, Result};
pub use types::*;

// Public modules
pub mod analysis;
pub mod archive;
pub mod catalog;
pub mod classify;
pub mod config;
pub mod error;
pub mod filter;
pub mod listing;
pub mod logging;
pub mod transcript;
pub mod types;
