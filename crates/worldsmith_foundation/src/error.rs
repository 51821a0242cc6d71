//! Error types for the Worldsmith system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::entity::EntityId;

/// The main error type for Worldsmith operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an entity not found error.
    #[must_use]
    pub fn entity_not_found(id: EntityId) -> Self {
        Self::new(ErrorKind::EntityNotFound(id))
    }

    /// Creates a component not found error.
    #[must_use]
    pub fn component_not_found(entity: EntityId, component: impl Into<String>) -> Self {
        Self::new(ErrorKind::ComponentNotFound {
            entity,
            component: component.into(),
        })
    }

    /// Creates a parent/child invariant violation error.
    #[must_use]
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvariantViolation(message.into()))
    }

    /// Creates an invalid operation error.
    #[must_use]
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidOperation(message.into()))
    }

    /// Creates an external call failure.
    #[must_use]
    pub fn dispatch(entrypoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Dispatch {
            entrypoint: entrypoint.into(),
            message: message.into(),
        })
    }

    /// Returns true if this error reports a corrupted parent/child relation.
    #[must_use]
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self.kind, ErrorKind::InvariantViolation(_))
    }

    /// Returns true if this error reports a missing entity or component.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::EntityNotFound(_) | ErrorKind::ComponentNotFound { .. }
        )
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Parent/child relation components disagree.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// Entity was not found in the data pool.
    #[error("entity not found: {0:?}")]
    EntityNotFound(EntityId),

    /// Component not found on entity.
    #[error("component not found: {component} on entity {entity:?}")]
    ComponentNotFound {
        /// The entity that was queried.
        entity: EntityId,
        /// The component name that was not found.
        component: String,
    },

    /// Operation is not valid for the current state.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// External contract call failed.
    #[error("call {entrypoint} failed: {message}")]
    Dispatch {
        /// Entrypoint that was called.
        entrypoint: String,
        /// Failure reported by the dispatcher.
        message: String,
    },

    /// Persisted data does not have the expected shape.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// File access failed.
    #[error("io error: {0}")]
    Io(String),

    /// A numeric string could not be parsed as a felt.
    #[error("invalid felt {input:?}: {reason}")]
    InvalidFelt {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation that failed (e.g. `remove_entity`).
    pub operation: Option<String>,
    /// Entity the operation targeted.
    pub entity: Option<EntityId>,
    /// Chain of nested operations, outermost last.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the failing operation.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Sets the targeted entity.
    #[must_use]
    pub fn with_entity(mut self, entity: EntityId) -> Self {
        self.entity = Some(entity);
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(operation) = &self.operation {
            write!(f, "in {operation}")?;
            if let Some(entity) = &self.entity {
                write!(f, " on {entity}")?;
            }
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  in {frame}")?;
            }
        }
        Ok(())
    }
}
