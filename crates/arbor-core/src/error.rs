//! Unified application error types for Arbor.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator.

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// A folder or file could not be found by id, name, or path.
    NotFound,
    /// A rename or move target collides with an existing sibling.
    NameConflict,
    /// The arguments are not acceptable (root mutation, empty name, ...).
    InvalidArgument,
    /// A temporary resource or byte stream failed.
    Resource,
    /// The metadata store reported an error.
    Database,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// The archive writer reported an error.
    Archive,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::NameConflict => write!(f, "NAME_CONFLICT"),
            Self::InvalidArgument => write!(f, "INVALID_ARGUMENT"),
            Self::Resource => write!(f, "RESOURCE"),
            Self::Database => write!(f, "DATABASE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Archive => write!(f, "ARCHIVE"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The node an error refers to.
///
/// Lookups by name fill in `name`, `extension` and the `parent_id` that
/// was searched; lookups by identifier fill in `id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ErrorSubject {
    /// Identifier of the missing or conflicting node.
    pub id: Option<Uuid>,
    /// Folder that was searched.
    pub parent_id: Option<Uuid>,
    /// Attempted name.
    pub name: Option<String>,
    /// Attempted file extension.
    pub extension: Option<String>,
}

/// The unified application error used throughout Arbor.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// The node the error is about, when known.
    pub subject: Option<ErrorSubject>,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            subject: None,
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            subject: None,
            source: Some(Box::new(source)),
        }
    }

    /// Attach the node this error refers to.
    pub fn about(mut self, subject: ErrorSubject) -> Self {
        self.subject = Some(subject);
        self
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// A folder id that does not resolve.
    pub fn folder_not_found(id: impl Into<Uuid>) -> Self {
        let id = id.into();
        Self::not_found(format!("Folder with ID {id} doesn't exist")).about(ErrorSubject {
            id: Some(id),
            ..Default::default()
        })
    }

    /// A file id that does not resolve.
    pub fn file_not_found(id: impl Into<Uuid>) -> Self {
        let id = id.into();
        Self::not_found(format!("File with ID {id} doesn't exist")).about(ErrorSubject {
            id: Some(id),
            ..Default::default()
        })
    }

    /// A folder name missing under the given parent.
    pub fn folder_name_not_found(name: &str, parent_id: impl Into<Uuid>) -> Self {
        let parent_id = parent_id.into();
        Self::not_found(format!(
            "Folder with name '{name}' and parent folder {parent_id} doesn't exist"
        ))
        .about(ErrorSubject {
            parent_id: Some(parent_id),
            name: Some(name.to_string()),
            ..Default::default()
        })
    }

    /// A file name/extension pair missing under the given parent.
    pub fn file_name_not_found(name: &str, extension: &str, parent_id: impl Into<Uuid>) -> Self {
        let parent_id = parent_id.into();
        Self::not_found(format!(
            "File with name '{name}', extension '{extension}' and parent folder {parent_id} doesn't exist"
        ))
        .about(ErrorSubject {
            parent_id: Some(parent_id),
            name: Some(name.to_string()),
            extension: Some(extension.to_string()),
            ..Default::default()
        })
    }

    /// Create a name-conflict error.
    pub fn name_conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NameConflict, message)
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    /// Create a resource error.
    pub fn resource(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Resource, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Returns `true` if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            subject: self.subject.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Resource, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

impl From<zip::result::ZipError> for AppError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::with_source(ErrorKind::Archive, format!("Archive error: {err}"), err)
    }
}
