use async_trait::async_trait;
use reqwest::{Client, Method, Request, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{Config, ConfigError};

pub mod model;

use model::{
    CenterInfo, SignupRequest, SignupResponse, TransactionPage, TransactionQuery,
    TransactionUpdate,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to reach backend: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("invalid response JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid endpoint URL: {0}")]
    Url(String),
}

impl ApiError {
    /// The backend answered, but with a non-success status.
    pub fn is_status(&self) -> bool {
        matches!(self, ApiError::Status { .. })
    }
}

#[async_trait]
pub trait SignupApi: Send + Sync {
    /// Submit a registration. Error codes the backend reports in the body are
    /// returned as `Ok` with `success == false`.
    async fn signup(&self, request: &SignupRequest) -> Result<SignupResponse, ApiError>;
}

#[async_trait]
pub trait TransactionApi: Send + Sync {
    async fn center_info(&self) -> Result<CenterInfo, ApiError>;

    async fn list_transactions(&self, query: &TransactionQuery)
        -> Result<TransactionPage, ApiError>;

    async fn update_transaction(&self, id: &str, update: &TransactionUpdate)
        -> Result<(), ApiError>;

    async fn delete_transaction(&self, id: &str) -> Result<(), ApiError>;
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    session_cookie: Option<String>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(
        base_url: Url,
        timeout: Duration,
        session_cookie: Option<String>,
    ) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(concat!("recycle-admin/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url,
            session_cookie: session_cookie.filter(|c| !c.trim().is_empty()),
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self, ApiError> {
        let base_url = cfg.api.url().map_err(|err: ConfigError| ApiError::Url(err.to_string()))?;
        Self::new(
            base_url,
            Duration::from_secs(cfg.api.timeout_secs),
            cfg.api.session_cookie.clone(),
        )
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|err| ApiError::Url(format!("{path}: {err}")))
    }

    fn transaction_url(&self, id: &str) -> Result<Url, ApiError> {
        let mut url = self.endpoint("api/transactions/")?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Url(format!("cannot append id to {}", self.base_url)))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.session_cookie {
            Some(cookie) => builder.header(reqwest::header::COOKIE, cookie),
            None => builder,
        }
    }

    pub fn build_signup_request(&self, body: &SignupRequest) -> Result<Request, ApiError> {
        let url = self.endpoint("api/signup")?;
        Ok(self.request(Method::POST, url).json(body).build()?)
    }

    pub fn build_center_info_request(&self) -> Result<Request, ApiError> {
        let url = self.endpoint("api/admin/center-info")?;
        Ok(self.request(Method::GET, url).build()?)
    }

    pub fn build_list_request(&self, query: &TransactionQuery) -> Result<Request, ApiError> {
        let url = self.endpoint("api/transactions")?;
        Ok(self
            .request(Method::GET, url)
            .query(&query.pairs())
            .build()?)
    }

    pub fn build_update_request(
        &self,
        id: &str,
        update: &TransactionUpdate,
    ) -> Result<Request, ApiError> {
        let url = self.transaction_url(id)?;
        Ok(self.request(Method::PUT, url).json(update).build()?)
    }

    pub fn build_delete_request(&self, id: &str) -> Result<Request, ApiError> {
        let url = self.transaction_url(id)?;
        Ok(self.request(Method::DELETE, url).build()?)
    }

    async fn send(&self, request: Request) -> Result<(StatusCode, String), ApiError> {
        debug!(method = %request.method(), url = %request.url(), "sending request");
        let res = self.http.execute(request).await?;
        let status = res.status();
        let body = res.text().await?;
        debug!(%status, len = body.len(), "received response");
        Ok((status, body))
    }

    async fn send_expecting<T: DeserializeOwned>(&self, request: Request) -> Result<T, ApiError> {
        let (status, body) = self.send(request).await?;
        if !status.is_success() {
            warn!(%status, %body, "backend error");
            return Err(ApiError::Status { status, body });
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn send_no_content(&self, request: Request) -> Result<(), ApiError> {
        let (status, body) = self.send(request).await?;
        if !status.is_success() {
            warn!(%status, %body, "backend error");
            return Err(ApiError::Status { status, body });
        }
        Ok(())
    }
}

/// Decode `body` when it holds a `T`, whatever the status; otherwise report
/// the status failure, or the decode failure for a 2xx.
fn decode_any_status<T: DeserializeOwned>(status: StatusCode, body: String) -> Result<T, ApiError> {
    match serde_json::from_str(&body) {
        Ok(value) => Ok(value),
        Err(_) if !status.is_success() => Err(ApiError::Status { status, body }),
        Err(err) => Err(ApiError::Decode(err)),
    }
}

#[async_trait]
impl SignupApi for ApiClient {
    async fn signup(&self, request: &SignupRequest) -> Result<SignupResponse, ApiError> {
        let req = self.build_signup_request(request)?;
        let (status, body) = self.send(req).await?;
        decode_any_status(status, body)
    }
}

#[async_trait]
impl TransactionApi for ApiClient {
    async fn center_info(&self) -> Result<CenterInfo, ApiError> {
        let req = self.build_center_info_request()?;
        self.send_expecting(req).await
    }

    async fn list_transactions(
        &self,
        query: &TransactionQuery,
    ) -> Result<TransactionPage, ApiError> {
        let req = self.build_list_request(query)?;
        self.send_expecting(req).await
    }

    async fn update_transaction(
        &self,
        id: &str,
        update: &TransactionUpdate,
    ) -> Result<(), ApiError> {
        let req = self.build_update_request(id, update)?;
        self.send_no_content(req).await
    }

    async fn delete_transaction(&self, id: &str) -> Result<(), ApiError> {
        let req = self.build_delete_request(id)?;
        self.send_no_content(req).await
    }
}
