//! Shared types for the Orderly platform
//!
//! Data model entities, enums and small utilities used by both the
//! store client and the application core.

pub mod models;
pub mod slug;
pub mod util;

pub use models::*;
