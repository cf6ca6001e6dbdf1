//! # Infra Registry
//!
//! Registries for the organizational entities of the infrastructure catalog:
//! - **Users** own identity records (name, email, password hash)
//! - **Projects** are owned by exactly one user
//! - **Application teams** group users into a flat member set
//! - **Applications** belong to exactly one team and one project
//!
//! Each registry validates its input, resolves cross-entity references through
//! the other registries, and delegates persistence to a store backend. A thin
//! search facade forwards free-text queries to an external index.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use infra_registry::Registries;
//! use infra_registry::storage::MemoryStorage;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registries = Registries::new(Arc::new(MemoryStorage::new()));
//!
//! let alice = registries.users.create("Alice", "alice@example.com", "s3cret").await?;
//! let project = registries
//!     .projects
//!     .create("Billing", Some("Invoices and payments".into()), Some("Alice".into()))
//!     .await?;
//! assert_eq!(project.owner_id, alice.id);
//! # Ok(())
//! # }
//! ```

pub mod entities;
pub mod error;
pub mod page;
pub mod password;
pub mod registry;
pub mod search;
pub mod storage;

pub use entities::*;
pub use error::{RegistryError, Result};
pub use page::{Page, PageRequest};
pub use registry::{
    ApplicationRegistry, ApplicationUpdate, ProjectRegistry, ProjectUpdate, Registries,
    TeamRegistry, UserRegistry, UserUpdate,
};
pub use search::{ApplicationDocument, SearchIndex};

#[cfg(feature = "sqlite")]
pub use storage::sqlite_storage::SqliteStorage;

#[cfg(feature = "elasticsearch")]
pub use search::elasticsearch::ElasticsearchIndex;
