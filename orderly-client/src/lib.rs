//! Orderly Client - typed access to the hosted backend
//!
//! Two collaborators live behind this crate: the tenant data store (a
//! PostgREST-style relational API) and the session provider (a
//! GoTrue-style auth API). The application core is written against the
//! traits in [`store`] and [`session`]; the remote implementations talk
//! HTTP via reqwest, and the `memory` feature provides in-process
//! backends for tests.

pub mod config;
pub mod error;
#[cfg(feature = "memory")]
pub mod memory;
pub mod remote;
pub mod rest;
pub mod session;
pub mod store;

pub use config::ClientConfig;
pub use error::{AuthError, AuthResult, StoreError, StoreResult};
#[cfg(feature = "memory")]
pub use memory::{MemoryAuth, MemoryStore};
pub use remote::RemoteStore;
pub use rest::{Query, RestClient};
pub use session::{
    AuthClient, AuthEvent, AuthEventKind, AuthUser, RemoteAuth, Session, SignupMetadata,
};
pub use store::{CatalogStore, IdentityStore, LookupOutcome, OrderStore, PromotionStore, TenantStore};
