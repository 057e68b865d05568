//! Error types for the dependency injection container.

use thiserror::Error;

use crate::key::Key;
use crate::lifetime::Lifetime;

/// Dependency injection errors
///
/// Every variant is a structural failure: none of them is retried, and the
/// first one raised aborts the whole resolution call.
///
/// # Examples
///
/// ```rust
/// use keystone_di::{Container, DiError, Key};
///
/// struct Missing;
///
/// let container = Container::new();
/// match container.get::<Missing>() {
///     Err(DiError::Unregistered { token, required_by }) => {
///         assert_eq!(token, Key::of::<Missing>());
///         assert!(required_by.is_none());
///     }
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone, Error)]
pub enum DiError {
    /// Token already bound in the same container
    #[error("Duplicate binding: {} is already registered", .0.display_name())]
    DuplicateBinding(Key),

    /// Token has no binding, either as resolution root or as a declared dependency
    #[error("No binding registered for {}{}", .token.display_name(), required_by_suffix(.required_by))]
    Unregistered {
        /// The token that could not be found.
        token: Key,
        /// The binding that declared it as a dependency, `None` for the root.
        required_by: Option<Key>,
    },

    /// Circular dependency detected (path from the first occurrence back to itself)
    #[error("Circular dependency: {}", join_path(.0))]
    Circular(Vec<Key>),

    /// Singleton binding directly depends on a transient binding
    #[error(
        "Captive dependency: {parent_lifetime} {} depends on {child_lifetime} {}",
        .parent.display_name(),
        .child.display_name()
    )]
    Captive {
        parent: Key,
        parent_lifetime: Lifetime,
        child: Key,
        child_lifetime: Lifetime,
    },

    /// Resolved instance is not of the type the token promised
    #[error("Type mismatch for {}: expected {expected}", .token.display_name())]
    TypeMismatch { token: Key, expected: &'static str },

    /// Constructor consumed its dependency list incorrectly
    #[error("Argument mismatch constructing {}: {detail}", .owner.display_name())]
    ArgumentMismatch { owner: Key, detail: String },

    /// Constructor reported a failure of its own
    #[error("Construction of {} failed: {message}", .token.display_name())]
    Construction { token: Key, message: String },

    /// Maximum recursion depth exceeded
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),
}

impl DiError {
    /// Convenience constructor for failing user constructors.
    pub fn construction(token: impl Into<Key>, message: impl Into<String>) -> Self {
        DiError::Construction {
            token: token.into(),
            message: message.into(),
        }
    }

    /// The cycle path for `Circular` errors.
    pub fn cycle_path(&self) -> Option<&[Key]> {
        match self {
            DiError::Circular(path) => Some(path),
            _ => None,
        }
    }
}

fn join_path(path: &[Key]) -> String {
    path.iter()
        .map(Key::display_name)
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn required_by_suffix(required_by: &Option<Key>) -> String {
    match required_by {
        Some(parent) => format!(" (required by {})", parent.display_name()),
        None => String::new(),
    }
}

/// Result type for DI operations
pub type DiResult<T> = Result<T, DiError>;
