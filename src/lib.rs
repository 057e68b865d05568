//! # keystone-di
//!
//! Token-keyed dependency injection with singleton and transient lifetimes.
//!
//! ## Features
//!
//! - **Identity tokens**: types act as their own token, or create symbolic
//!   tokens that stay unique even when their labels collide
//! - **Two lifetimes**: one shared instance per container, or a fresh instance
//!   per resolution
//! - **Circular dependency detection**: errors carry the full cycle path
//! - **Captive dependency detection**: a singleton may not hold a transient
//! - **Isolated containers**: named containers never see each other's bindings
//! - **Thread-safe**: a singleton is constructed exactly once, even under races
//!
//! ## Quick Start
//!
//! ```rust
//! use keystone_di::{Container, Dependencies, DiResult, Injectable, Key};
//! use std::sync::Arc;
//!
//! struct Config {
//!     url: String,
//! }
//!
//! impl Injectable for Config {
//!     fn construct(_: &mut Dependencies) -> DiResult<Self> {
//!         Ok(Config { url: "postgres://localhost".to_string() })
//!     }
//! }
//!
//! struct Repository {
//!     config: Arc<Config>,
//! }
//!
//! impl Injectable for Repository {
//!     fn dependencies() -> Vec<Key> {
//!         vec![Key::of::<Config>()]
//!     }
//!
//!     fn construct(deps: &mut Dependencies) -> DiResult<Self> {
//!         Ok(Repository { config: deps.next()? })
//!     }
//! }
//!
//! let container = Container::new();
//! container.register_singleton::<Config>().unwrap();
//! container.register_transient::<Repository>().unwrap();
//!
//! let repo = container.get::<Repository>().unwrap();
//! assert_eq!(repo.config.url, "postgres://localhost");
//! ```
//!
//! ## Tokens and Trait Objects
//!
//! ```rust
//! use keystone_di::{Container, Implementation, Token};
//! use std::sync::Arc;
//!
//! trait Logger: Send + Sync {
//!     fn log(&self, message: &str) -> String;
//! }
//!
//! struct ConsoleLogger;
//! impl Logger for ConsoleLogger {
//!     fn log(&self, message: &str) -> String {
//!         format!("LOG: {}", message)
//!     }
//! }
//!
//! let logger = Token::<dyn Logger>::new("logger");
//!
//! let container = Container::new();
//! container
//!     .register_singleton_as(
//!         &logger,
//!         Implementation::factory([], |_| Ok(Arc::new(ConsoleLogger) as Arc<dyn Logger>)),
//!     )
//!     .unwrap();
//!
//! assert_eq!(container.resolve(&logger).unwrap().log("hi"), "LOG: hi");
//! ```
//!
//! ## Lifetimes
//!
//! - **Singleton**: built on first resolution, cached for the container's lifetime
//! - **Transient**: built on every resolution, never cached
//!
//! A singleton must not depend directly on a transient: the transient would be
//! captured for the singleton's whole lifetime. Resolution fails with
//! [`DiError::Captive`] instead.
//!
//! ## Containers
//!
//! [`Container::new`] creates a detached container. [`Container::of`] returns
//! the process-wide container for an identifier, creating it on first use;
//! [`Container::default_container`] returns the reserved default one.

// Core modules
pub mod config;
pub mod container;
pub mod descriptors;
pub mod error;
pub mod key;
pub mod lifetime;
pub mod observer;
pub mod registration;
pub mod token;
pub mod traits;
pub mod validation;

mod captivity;
mod internal;

// Re-exports for public API
pub use config::ContainerConfig;
pub use container::{Container, ContainerId, ContainerRegistry, Dependencies, ResolvedInstance};
pub use descriptors::BindingDescriptor;
pub use error::{DiError, DiResult};
pub use key::Key;
pub use lifetime::Lifetime;
pub use observer::{ResolutionObserver, TracingObserver};
pub use registration::{Implementation, RegistrationOptions};
pub use token::{create_dependency_token, create_token, Token};
pub use traits::Injectable;
pub use validation::ValidationReport;
