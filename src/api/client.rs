//! HTTP client for the rewards API.
//!
//! # Responsibilities
//! - Attach browser headers, the address query parameter and the bearer token
//! - Decode every response into a typed envelope
//! - Record one metric per call

use alloy::primitives::{Address, TxHash};
use reqwest::header::{HeaderMap, HeaderValue, ORIGIN, REFERER};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::api::session::Session;
use crate::api::types::{ApiError, Envelope, FaucetStatusData, LoginData, ProfileData};
use crate::config::ApiConfig;
use crate::observability::metrics;

pub const LOGIN: &str = "/user/login";
pub const CHECK_IN: &str = "/sign/in";
pub const FAUCET_STATUS: &str = "/faucet/status";
pub const CLAIM_FAUCET: &str = "/faucet/daily";
pub const PROFILE: &str = "/user/profile";
pub const TASK_VERIFY: &str = "/task/verify";

/// Rewards API client.
#[derive(Debug, Clone)]
pub struct RewardsApi {
    http: Client,
    base_url: String,
}

impl RewardsApi {
    /// Build a client from configuration.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ORIGIN, header_value(&config.origin)?);
        headers.insert(REFERER, header_value(&config.referer)?);

        let http = Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Exchange a signed login message for a session.
    pub async fn login(&self, address: Address, signature: &str) -> Result<Session, ApiError> {
        let query = [
            ("address", address.to_string()),
            ("signature", signature.to_string()),
        ];
        let data: LoginData = self
            .request(Method::POST, LOGIN, &query, None)
            .await?
            .into_data(LOGIN)?;
        if data.jwt.trim().is_empty() {
            return Err(ApiError::MissingData(LOGIN));
        }
        Ok(Session::new(address, data.jwt))
    }

    pub async fn profile(&self, session: &Session) -> Result<ProfileData, ApiError> {
        self.request(Method::GET, PROFILE, &address_query(session), Some(session))
            .await?
            .into_data(PROFILE)
    }

    /// Daily check-in. The server enforces the once-per-day limit.
    pub async fn check_in(&self, session: &Session) -> Result<(), ApiError> {
        self.request::<serde_json::Value>(Method::POST, CHECK_IN, &address_query(session), Some(session))
            .await?
            .into_result()
            .map(|_| ())
    }

    pub async fn faucet_status(&self, session: &Session) -> Result<FaucetStatusData, ApiError> {
        self.request(Method::GET, FAUCET_STATUS, &address_query(session), Some(session))
            .await?
            .into_data(FAUCET_STATUS)
    }

    pub async fn claim_faucet(&self, session: &Session) -> Result<(), ApiError> {
        self.request::<serde_json::Value>(
            Method::POST,
            CLAIM_FAUCET,
            &address_query(session),
            Some(session),
        )
        .await?
        .into_result()
        .map(|_| ())
    }

    /// Submit proof of an on-chain action. Returns the API's message.
    pub async fn verify_task(
        &self,
        session: &Session,
        task_id: u64,
        tx_hash: TxHash,
    ) -> Result<String, ApiError> {
        let query = [
            ("address", session.address().to_string()),
            ("task_id", task_id.to_string()),
            ("tx_hash", tx_hash.to_string()),
        ];
        let envelope = self
            .request::<serde_json::Value>(Method::POST, TASK_VERIFY, &query, Some(session))
            .await?;
        let msg = envelope.message().to_string();
        envelope.into_result()?;
        Ok(msg)
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &'static str,
        query: &[(&str, String)],
        session: Option<&Session>,
    ) -> Result<Envelope<T>, ApiError> {
        let mut request = self
            .http
            .request(method, format!("{}{}", self.base_url, endpoint))
            .query(query);
        if let Some(session) = session {
            request = request.bearer_auth(session.token());
        }

        let result: Result<Envelope<T>, ApiError> = async {
            let body = request.send().await?.text().await?;
            serde_json::from_str::<Envelope<T>>(&body).map_err(|e| ApiError::Decode {
                endpoint,
                reason: e.to_string(),
            })
        }
        .await;

        let ok = matches!(&result, Ok(env) if env.code == 0);
        metrics::record_api_call(endpoint, ok);
        tracing::debug!(endpoint, ok, "API call finished");
        result
    }
}

fn address_query(session: &Session) -> [(&'static str, String); 1] {
    [("address", session.address().to_string())]
}

fn header_value(value: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(value).map_err(|e| ApiError::InvalidConfig(format!("{}: {}", value, e)))
}
