// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The structured error body a node returns alongside a non-2xx status.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct AptosError {
    pub message: String,
    pub error_code: Option<String>,
    pub vm_error_code: Option<u64>,
}

impl fmt::Display for AptosError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(code) = &self.error_code {
            write!(f, " (error code {})", code)?;
        }
        if let Some(vm_code) = self.vm_error_code {
            write!(f, " (vm error code {})", vm_code)?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum RestError {
    /// The node answered with a structured error body.
    #[error("API error {0}")]
    Api(AptosErrorResponse),
    #[error("BCS error {0}")]
    Bcs(#[from] aptos_bcs::Error),
    #[error("JSON error {0}")]
    Json(#[from] serde_json::Error),
    #[error("URL parse error {0}")]
    UrlParse(#[from] url::ParseError),
    /// A non-2xx status whose body was not a structured node error.
    #[error("HTTP error {0}: {1}")]
    Http(reqwest::StatusCode, #[source] reqwest::Error),
    #[error("timed out waiting for transaction {hash} after {timeout_secs}s")]
    Timeout { hash: String, timeout_secs: u64 },
    #[error("request error {0}")]
    Request(#[from] reqwest::Error),
    #[error("unknown error {0}")]
    Unknown(#[from] anyhow::Error),
}

#[derive(Debug)]
pub struct AptosErrorResponse {
    pub error: AptosError,
    pub status_code: reqwest::StatusCode,
}

impl AptosErrorResponse {
    pub fn is_not_found(&self) -> bool {
        self.status_code == reqwest::StatusCode::NOT_FOUND
    }
}

impl fmt::Display for AptosErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status_code, self.error)
    }
}

impl RestError {
    pub fn status_code(&self) -> Option<reqwest::StatusCode> {
        match self {
            RestError::Api(response) => Some(response.status_code),
            RestError::Http(status_code, _) => Some(*status_code),
            _ => None,
        }
    }

    /// True when the node simply has not seen the entity yet, which polling
    /// treats as "retry", never as failure.
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(reqwest::StatusCode::NOT_FOUND)
    }
}
