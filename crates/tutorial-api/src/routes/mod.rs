//! # API Route Modules
//!
//! - `tutorials` — CRUD, title search, and the published listing under
//!   `/api/tutorials`.

pub mod tutorials;
