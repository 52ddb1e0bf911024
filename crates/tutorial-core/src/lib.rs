#![deny(missing_docs)]

//! # tutorial-core — Domain Types for the Tutorials Service
//!
//! Everything the API and the CLI agree on lives here: the [`Tutorial`]
//! record, the create/update payloads, the title filter, and the
//! validation error hierarchy. The crate has no internal dependencies and
//! performs no I/O.
//!
//! ## Design Principles
//!
//! 1. **Newtype identifier.** [`TutorialId`] wraps a UUID; parsing a
//!    malformed id yields [`ValidationError::InvalidId`], never a panic.
//!
//! 2. **Payloads validate themselves.** [`NewTutorial::into_tutorial`] and
//!    [`TutorialPatch::apply`] are the only paths that construct or mutate
//!    a record, so a blank title cannot reach storage.
//!
//! 3. **One filter definition.** [`TitleFilter`] is the single place where
//!    title search semantics (case-insensitive substring) are defined.

pub mod error;
pub mod filter;
pub mod tutorial;

pub use error::ValidationError;
pub use filter::TitleFilter;
pub use tutorial::{NewTutorial, Tutorial, TutorialId, TutorialPatch};
