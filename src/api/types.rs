//! Rewards API wire types.
//!
//! Every response is an envelope `{code, msg, data}`; `code != 0` is the
//! uniform error signal. Payloads are validated into typed structs here so
//! nothing downstream touches raw JSON.

use serde::Deserialize;
use thiserror::Error;

/// Errors from the rewards API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request could not be sent or the body could not be read.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Body was not the expected JSON shape.
    #[error("unexpected response from {endpoint}: {reason}")]
    Decode {
        endpoint: &'static str,
        reason: String,
    },

    /// The API answered with a non-zero code.
    #[error("API returned code {code}: {msg}")]
    Rejected { code: i64, msg: String },

    /// Header values or base URL from config are unusable.
    #[error("invalid API configuration: {0}")]
    InvalidConfig(String),

    /// `code == 0` but the expected `data` was absent.
    #[error("response from {0} is missing data")]
    MissingData(&'static str),
}

/// Generic response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub code: i64,
    pub msg: Option<String>,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// `Ok(data)` when `code == 0`, [`ApiError::Rejected`] otherwise.
    pub fn into_result(self) -> Result<Option<T>, ApiError> {
        if self.code == 0 {
            Ok(self.data)
        } else {
            Err(ApiError::Rejected {
                code: self.code,
                msg: self.msg.unwrap_or_else(|| "Unknown error".to_string()),
            })
        }
    }

    /// Like [`Envelope::into_result`] but `data` is required.
    pub fn into_data(self, endpoint: &'static str) -> Result<T, ApiError> {
        self.into_result()?.ok_or(ApiError::MissingData(endpoint))
    }

    pub fn message(&self) -> &str {
        self.msg.as_deref().unwrap_or("")
    }
}

/// `data` of `/user/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    pub jwt: String,
}

/// `data` of `/faucet/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FaucetStatusData {
    #[serde(default)]
    pub is_able_to_faucet: bool,
    /// Unix seconds of the next allowed claim. The API spells it this way.
    #[serde(default, rename = "avaliable_timestamp")]
    pub available_timestamp: i64,
}

/// `data` of `/user/profile`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileData {
    #[serde(default)]
    pub user_info: UserInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserInfo {
    #[serde(default, rename = "TotalPoints")]
    pub total_points: u64,
}
