//! Wingman navigation core
//!
//! Facade over the workspace crates:
//!
//! - [`storage`]: the navigation cache and key-value persistence
//! - [`navigation`]: the role registry, resolution, validation and role
//!   selection

#![warn(missing_docs)]
#![warn(clippy::all)]

pub use navigation;
pub use storage;

pub use navigation::{
    builtin_registry, NavigationError, NavigationOptions, NavigationValidator, Registry, Resolver,
    RoleSelection, ValidationResult,
};
pub use storage::{CacheConfig, KvStore, MemoryKvStore, NavigationCache};
