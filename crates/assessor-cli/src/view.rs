use chrono::{DateTime, Utc};

use assessor_core::{Assessment, ResumeUpload, User};

const NOT_AVAILABLE: &str = "Not available";

/// Dashboard profile block
pub fn profile(user: Option<&User>) -> String {
    let username = user.map(|u| u.username.as_str()).filter(|s| !s.is_empty());
    let email = user.map(|u| u.email.as_str()).filter(|s| !s.is_empty());
    let role = user.map(User::role_display).unwrap_or("Inactive");
    let status = user.map(User::status_display).unwrap_or("Inactive");

    format!(
        "User Profile\n  Username:       {}\n  Email:          {}\n  Role:           {}\n  Account Status: {}\n",
        username.unwrap_or(NOT_AVAILABLE),
        email.unwrap_or(NOT_AVAILABLE),
        role,
        status,
    )
}

pub fn upload(upload: &ResumeUpload) -> String {
    let mut out = format!("Uploaded resume: {}\n", upload.filename);
    match upload.assessment_id {
        Some(id) => out.push_str(&format!("Attached to assessment #{}\n", id)),
        None => out.push_str("No assessment in progress yet\n"),
    }
    out
}

/// Resume line of the dashboard, from the current assessment
pub fn assessment(assessment: Option<&Assessment>) -> String {
    match assessment {
        None => "No active assessment found. Please start a new assessment.\n".to_string(),
        Some(a) => match a.resume_filename() {
            Some(name) => format!("Uploaded Resume: {} (assessment #{})\n", name, a.id),
            None => format!("Assessment #{} has no resume yet\n", a.id),
        },
    }
}

/// How long ago the token was saved, e.g. "5m ago"
pub fn token_age(stored_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - stored_at).num_minutes();
    if minutes < 1 {
        // Also covers clock skew
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        format!("{}h ago", minutes / 60)
    } else {
        format!("{}d ago", minutes / 1440)
    }
}
