use std::fmt;

use serde::{Deserialize, Serialize};

/// Profile of the logged-in account, as returned by `GET /api/auth/users/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_active: bool,
    pub role: String,
}

impl User {
    /// Role for display; accounts without a role show as inactive.
    pub fn role_display(&self) -> &str {
        if self.role.is_empty() {
            "Inactive"
        } else {
            &self.role
        }
    }

    pub fn status_display(&self) -> &'static str {
        if self.is_active {
            "Active"
        } else {
            "Inactive"
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.eq_ignore_ascii_case("admin")
    }
}

/// Registration payload for `POST /api/auth/register`.
#[derive(Clone, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl NewUser {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of a successful `POST /api/auth/token`.
///
/// Both fields are optional on the wire so that a response without a token
/// is reported as a protocol problem rather than a parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl TokenResponse {
    /// The issued token, if the backend actually sent a non-empty one.
    pub fn token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Body of a successful resume upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ResumeUpload {
    pub filename: String,
    pub file_path: String,
    #[serde(default)]
    pub assessment_id: Option<i64>,
}

/// The user's most recent assessment, from `GET /api/assessments/current`.
///
/// Only the fields the dashboard needs are read; scoring output is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Assessment {
    pub id: i64,
    #[serde(default)]
    pub candidate_id: Option<i64>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub resume_file_path: Option<String>,
}

impl Assessment {
    /// File name of the uploaded resume, if one is attached
    pub fn resume_filename(&self) -> Option<&str> {
        self.resume_file_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .and_then(|p| p.rsplit(['/', '\\']).next())
    }
}
