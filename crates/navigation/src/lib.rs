//! Role-aware navigation for Wingman
//!
//! This crate holds the declarative role and navigation registry, the
//! resolution functions that turn a role into navigation entries and page
//! metadata, a validator for registry documents, and the persisted role
//! selection.
//!
//! # Example
//!
//! ```
//! use navigation::{NavigationOptions, Resolver, builtin_registry};
//! use std::sync::Arc;
//!
//! let resolver = Resolver::new(Arc::new(builtin_registry()));
//! let role = resolver.registry().default_role().cloned().unwrap();
//! let items = resolver.generate_navigation_for_role(&role, NavigationOptions::all());
//! assert!(items.windows(2).all(|w| w[0].order <= w[1].order));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builtin;
pub mod registry;
pub mod resolve;
pub mod selection;
pub mod validation;

use thiserror::Error;

pub use builtin::{builtin_registry, NAVIGATION_CONFIG, REGISTRY, ROLE_CONFIG};
pub use registry::{
    ContextName, CustomNav, EntitySchema, HotkeyBinding, NavOverride, NavigationConfig,
    NavigationItem, Registry, Role, RoleConfig, RoleGroup,
};
pub use resolve::{GeneratedNavItem, NavigationOptions, PageInfo, Resolver, ResolverConfig};
pub use selection::{RoleSelection, SELECTED_ROLE_KEY};
pub use validation::{NavigationValidator, ValidationCode, ValidationIssue, ValidationResult};

/// Navigation error types
#[derive(Debug, Error)]
pub enum NavigationError {
    /// Role data could not be interpreted
    #[error("Invalid role: {0}")]
    InvalidRole(String),

    /// Registry or resolver configuration is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No role with this id exists
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] storage::KvError),

    /// Cache error
    #[error("Cache error: {0}")]
    Cache(#[from] storage::CacheError),
}

/// Result type for navigation operations
pub type Result<T> = std::result::Result<T, NavigationError>;
