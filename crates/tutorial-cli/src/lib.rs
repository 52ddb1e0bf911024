//! # tutorial-cli — Command-line Client for the Tutorials API
//!
//! Provides the `tutorials` binary:
//!
//! ```bash
//! tutorials list --title rust
//! tutorials published
//! tutorials create --title "Intro" --description "first steps" --published
//! tutorials update <id> --published false
//! tutorials delete <id>
//! tutorials delete-all --yes
//! ```
//!
//! The base URL comes from `--base-url` or `TUTORIALS_API_URL`.

pub mod client;
pub mod commands;
pub mod error;

pub use client::{MutationResult, TutorialClient};
pub use commands::{run, Command, OutputFormat};
pub use error::ClientError;

/// API base URL used when neither flag nor environment names one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
