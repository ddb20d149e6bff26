//! Permission catalog for K9Ops
//!
//! Canonical registry of declared permission keys with Arabic display
//! metadata, the immutable capability structure used for validation and
//! matrix building, and the idempotent, additive catalog seeder.

pub mod catalog;
pub mod error;
pub mod models;
pub mod naming;
pub mod seeder;
pub mod source;
pub mod structure;

pub use catalog::PermissionCatalog;
pub use error::{Error, Result};
pub use models::{PermissionAction, PermissionDefinition, PermissionKey};
pub use seeder::{CatalogSeeder, SeedReport};
pub use source::{CatalogEntry, CatalogSource};
pub use structure::{DeclaredSection, DeclaredSubsection};
