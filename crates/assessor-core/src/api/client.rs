//! API client for communicating with the assessment backend.
//!
//! This module provides the `ApiClient` struct for the auth endpoints
//! (token issuance, profile lookup, registration) and the assessment
//! lookups used by the dashboard (current assessment, resume upload).

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::models::{Assessment, NewUser, ResumeUpload, TokenResponse, User};

use super::{ApiError, AuthBackend};

// ============================================================================
// Constants
// ============================================================================

/// Token issuance endpoint (form-encoded credentials)
const TOKEN_PATH: &str = "/api/auth/token";

/// Profile of the bearer of a token
const CURRENT_USER_PATH: &str = "/api/auth/users/me";

/// Account creation endpoint (JSON body)
const REGISTER_PATH: &str = "/api/auth/register";

/// The caller's most recent assessment
const CURRENT_ASSESSMENT_PATH: &str = "/api/assessments/current";

/// Resume upload endpoint (multipart)
const UPLOAD_RESUME_PATH: &str = "/api/assessments/upload-resume";

/// Multipart field the backend reads the resume from
const RESUME_FIELD: &str = "resume";

/// The backend only accepts PDF resumes
const RESUME_EXTENSION: &str = ".pdf";

/// API client for the assessment backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client rooted at `base_url`.
    ///
    /// Requests have no timeout unless one is given.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "Request rejected");
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Read a successful response body and parse it as JSON.
    async fn parse_json<T: DeserializeOwned>(
        response: reqwest::Response,
        what: &str,
    ) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse {}: {}", what, e)))
    }

    // ===== Auth Endpoints =====

    /// Exchange an identifier and password for an access token
    pub async fn issue_token(
        &self,
        username: &str,
        password: &str,
    ) -> Result<TokenResponse, ApiError> {
        let url = self.url(TOKEN_PATH);
        debug!(url = %url, "Requesting access token");

        let response = self
            .client
            .post(&url)
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        Self::parse_json(response, "token response").await
    }

    /// Fetch the profile of the account that owns `token`
    pub async fn current_user(&self, token: &str) -> Result<User, ApiError> {
        let url = self.url(CURRENT_USER_PATH);
        debug!(url = %url, "Fetching current user");

        let response = self.client.get(&url).bearer_auth(token).send().await?;

        let response = Self::check_response(response).await?;
        Self::parse_json(response, "user profile").await
    }

    /// Create a new account. Any 2xx counts as success.
    pub async fn register(&self, new_user: &NewUser) -> Result<(), ApiError> {
        let url = self.url(REGISTER_PATH);
        debug!(url = %url, username = %new_user.username, "Registering account");

        let response = self.client.post(&url).json(new_user).send().await?;

        Self::check_response(response).await?;
        Ok(())
    }

    // ===== Assessment Endpoints =====

    /// Fetch the caller's most recent assessment.
    ///
    /// `Ok(None)` when the user has not started one yet. The backend reports
    /// that as a 404, sometimes re-raised as a 500 with a `404:` detail.
    pub async fn current_assessment(&self, token: &str) -> Result<Option<Assessment>, ApiError> {
        let url = self.url(CURRENT_ASSESSMENT_PATH);
        debug!(url = %url, "Fetching current assessment");

        let response = self.client.get(&url).bearer_auth(token).send().await?;

        match Self::check_response(response).await {
            Ok(response) => Self::parse_json(response, "assessment").await.map(Some),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Upload a PDF resume for the current user's assessment
    pub async fn upload_resume(&self, token: &str, path: &Path) -> Result<ResumeUpload, ApiError> {
        let filename = Self::resume_filename(path)?;
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ApiError::InvalidInput(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let url = self.url(UPLOAD_RESUME_PATH);
        debug!(url = %url, filename = %filename, size = bytes.len(), "Uploading resume");

        let part = Part::bytes(bytes)
            .file_name(filename)
            .mime_str("application/pdf")?;
        let form = Form::new().part(RESUME_FIELD, part);

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        Self::parse_json(response, "upload response").await
    }

    /// File name to send for a resume, rejecting anything the backend won't take.
    fn resume_filename(path: &Path) -> Result<String, ApiError> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                ApiError::InvalidInput(format!("Not a file path: {}", path.display()))
            })?;

        if !filename.ends_with(RESUME_EXTENSION) {
            return Err(ApiError::InvalidInput(
                "Please upload a PDF file only".to_string(),
            ));
        }
        Ok(filename.to_string())
    }
}

#[async_trait]
impl AuthBackend for ApiClient {
    async fn issue_token(&self, username: &str, password: &str) -> Result<TokenResponse, ApiError> {
        ApiClient::issue_token(self, username, password).await
    }

    async fn current_user(&self, token: &str) -> Result<User, ApiError> {
        ApiClient::current_user(self, token).await
    }

    async fn register(&self, new_user: &NewUser) -> Result<(), ApiError> {
        ApiClient::register(self, new_user).await
    }
}
