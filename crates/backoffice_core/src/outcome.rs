//! crates/backoffice_core/src/outcome.rs
//!
//! Errors raised inside the stores and the result object they hand back to callers.

use crate::ports::PortError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("User not authenticated")]
    NotAuthenticated,
    #[error(transparent)]
    Port(#[from] PortError),
}

/// What a mutating store operation reports instead of returning an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MutationOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MutationOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }
}

impl From<Result<(), StoreError>> for MutationOutcome {
    fn from(result: Result<(), StoreError>) -> Self {
        match result {
            Ok(()) => MutationOutcome::ok(),
            Err(e) => MutationOutcome::failed(e.to_string()),
        }
    }
}
