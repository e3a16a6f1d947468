//! Content sources: where posts, pages and settings come from.
//!
//! | Source | Used for | Transport |
//! |---|---|---|
//! | [`SanityClient`] | normal builds | Sanity HTTP query API (GROQ) |
//! | [`FileSource`] | offline builds, tests | JSON export on disk |
//!
//! Both implement [`ContentSource`], so the fetch stage never knows which
//! one it is talking to.

pub mod backend;
mod file;
pub mod queries;
mod sanity;

pub use backend::{ContentSource, SourceError};
pub use file::{Export, FileSource};
pub use sanity::{Perspective, SanityClient};
