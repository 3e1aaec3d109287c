use std::{error::Error as StdError, fmt::Debug};
use thiserror::Error;

use crate::access::AccessName;
use crate::batch::BatchElementErrorCode;

/// Result alias for calls that cross into a [`crate::manager_interface::ManagerInterface`]
/// plug-in. The plug-in's own errors are boxed and propagate unchanged.
pub type ManagerInterfaceResult<T> = Result<T, Box<dyn StdError + Send + Sync>>;

/// Caller supplied malformed or inconsistent inputs.
#[derive(Error, Debug)]
pub enum InputValidationError {
    #[error("Invalid entity reference: {0}")]
    InvalidEntityReference(String),
    #[error("Parameter lists must be of the same length: {refs} entity references vs. {data} traits hints.")]
    PreflightLengthMismatch { refs: usize, data: usize },
    #[error("Parameter lists must be of the same length: {refs} entity references vs. {data} traits datas.")]
    RegisterLengthMismatch { refs: usize, data: usize },
    #[error("pageSize must be greater than zero")]
    ZeroPageSize,
}

/// Manager lacks one or more required capabilities after `initialize`.
#[derive(Error, Debug)]
#[error(
    "Manager implementation for '{identifier}' does not support the required capabilities: {missing}"
)]
pub struct ConfigurationError {
    pub identifier: String,
    pub missing: String,
}

/// Wrong argument kind at the API surface.
#[derive(Error, Debug)]
pub enum TypeError {
    #[error("Expected traits data, got none")]
    MissingTraitsData,
}

/// The plug-in returned an ill-typed value where the contract requires a specific shape.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Expected `{expected}` from manager implementation, got something else")]
    UnexpectedType { expected: &'static str },
}

/// A single element-level failure surfaced via a throwing batch policy.
///
/// Renders as `"<codeName>: <message> [index=<i>] [access=<accessName>] [entity=<ref>]"`,
/// with the bracketed `access`/`entity` segments present only when supplied.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{rendered}")]
pub struct BatchElementException {
    pub index: usize,
    pub code: BatchElementErrorCode,
    pub message: String,
    pub access: Option<AccessName>,
    pub entity: Option<String>,
    rendered: String,
}

impl BatchElementException {
    pub fn new(
        index: usize,
        code: BatchElementErrorCode,
        message: impl Into<String>,
        access: Option<AccessName>,
        entity: Option<String>,
    ) -> Self {
        let message = message.into();

        let mut rendered = format!("{}: {} [index={}]", code.name(), message, index);
        if let Some(access) = &access {
            rendered.push_str(&format!(" [access={}]", access));
        }
        if let Some(entity) = &entity {
            rendered.push_str(&format!(" [entity={}]", entity));
        }

        Self {
            index,
            code,
            message,
            access,
            entity,
            rendered,
        }
    }
}

/// Unifies the three ways a batched or singular Manager operation can fail:
/// a synchronous input-validation failure, the plug-in's own error, or (for
/// throwing policies) a per-element [`BatchElementException`].
#[derive(Error, Debug)]
pub enum BatchDispatchError {
    #[error(transparent)]
    InputValidation(#[from] InputValidationError),
    #[error(transparent)]
    Interface(#[from] Box<dyn StdError + Send + Sync>),
    #[error(transparent)]
    Element(#[from] BatchElementException),
}

/// Failure of [`crate::manager::Manager::initialize`].
#[derive(Error, Debug)]
pub enum InitializeError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("Manager implementation failed to initialize")]
    Interface(#[from] Box<dyn StdError + Send + Sync>),
}

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to read plugin directory `{path}`: {source}")]
    ReadDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to load plugin library at `{path}`: {source}")]
    LoadLibrary {
        path: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
    #[error("Plugin at `{path}` does not export the expected `plugin` entry point")]
    MissingEntryPoint { path: String },
}

#[derive(Error, Debug)]
pub enum CreateManagerError {
    #[error("Unknown manager identifier `{0}`")]
    UnknownIdentifier(String),
    #[error("Failed to instantiate manager plug-in: {0}")]
    Interface(Box<dyn StdError + Send + Sync>),
    #[error(transparent)]
    Initialize(#[from] InitializeError),
}
