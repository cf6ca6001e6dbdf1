//! API models for requests and responses

pub mod api;
pub mod application;
pub mod project;
pub mod team;
pub mod user;

// Re-export commonly used types
pub use api::*;
pub use application::*;
pub use project::*;
pub use team::*;
pub use user::*;
