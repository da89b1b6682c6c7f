use std::io::{self, Write};
use std::path::Path;

use anyhow::{bail, Context as _, Result};
use chrono::Utc;
use tracing::{debug, warn};

use assessor_core::config::TokenStorage;
use assessor_core::{ApiClient, Config, NewUser, SessionController, TokenStore};

use crate::view;

/// Read the password from here instead of prompting
const PASSWORD_ENV: &str = "ASSESSOR_PASSWORD";

type Controller = SessionController<ApiClient, Box<dyn TokenStore>>;

/// Everything a command needs: the loaded config and a session controller
/// wired to the configured backend and token store.
pub struct Context {
    config: Config,
    controller: Controller,
}

impl Context {
    pub fn open(api_url: Option<String>, token_store: Option<TokenStorage>) -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        // Flags apply to this run only and are not saved back
        let mut effective = config.clone();
        if let Some(storage) = token_store {
            effective.token_storage = storage;
        }

        let base_url = api_url.unwrap_or_else(|| effective.base_url());
        debug!(base_url = %base_url, storage = %effective.token_storage, "Opening session");

        let api = ApiClient::new(&base_url, effective.request_timeout())?;
        let tokens = effective.token_store()?;

        Ok(Self {
            config,
            controller: SessionController::new(api, tokens),
        })
    }
}

fn prompt_line(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn read_password() -> Result<String> {
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        if !password.is_empty() {
            return Ok(password);
        }
    }
    rpassword::prompt_password("Password: ").context("Failed to read password")
}

fn require(value: String, what: &str) -> Result<String> {
    if value.trim().is_empty() {
        bail!("{} is required", what);
    }
    Ok(value)
}

pub async fn login(ctx: &mut Context, email: Option<String>) -> Result<()> {
    let email = match email.or_else(|| ctx.config.last_email.clone()) {
        Some(email) => email,
        None => prompt_line("Email")?,
    };
    let email = require(email, "Email")?;
    let password = require(read_password()?, "Password")?;

    let user = ctx.controller.login(&email, &password).await?;

    ctx.config.last_email = Some(email);
    if let Err(e) = ctx.config.save() {
        warn!(error = %e, "Failed to save config");
    }

    println!("Logged in as {} ({})", user.username, user.email);
    Ok(())
}

pub fn logout(ctx: &Context) -> Result<()> {
    ctx.controller.logout();
    println!("Logged out");
    Ok(())
}

pub async fn status(ctx: &Context) -> Result<()> {
    let Some(token) = ctx.controller.check_auth().await else {
        bail!("Not logged in. Run `assessor login` first.");
    };
    print!("{}", view::profile(ctx.controller.user().as_ref()));
    if let Some(stored_at) = ctx.controller.token_stored_at() {
        println!("  Logged In:      {}", view::token_age(stored_at, Utc::now()));
    }

    match ctx.controller.backend().current_assessment(&token).await {
        Ok(current) => print!("{}", view::assessment(current.as_ref())),
        Err(e) => {
            warn!(error = %e, "Failed to fetch current assessment");
            println!("Unable to load assessment data");
        }
    }
    Ok(())
}

pub async fn register(ctx: &Context, username: String, email: String) -> Result<()> {
    let username = require(username, "Username")?;
    let email = require(email, "Email")?;
    let password = require(read_password()?, "Password")?;

    ctx.controller
        .register(&NewUser::new(username, email.clone(), password))
        .await?;

    println!(
        "Registration successful. Log in with `assessor login --email {}`",
        email
    );
    Ok(())
}

pub async fn upload_resume(ctx: &Context, path: &Path) -> Result<()> {
    let Some(token) = ctx.controller.check_auth().await else {
        bail!("Not logged in. Run `assessor login` first.");
    };

    // The backend replaces an earlier resume; say which one is going away
    match ctx.controller.backend().current_assessment(&token).await {
        Ok(Some(current)) => {
            if let Some(previous) = current.resume_filename() {
                println!("Replacing previously uploaded resume: {}", previous);
            }
        }
        Ok(None) => {}
        Err(e) => warn!(error = %e, "Failed to fetch current assessment"),
    }

    let upload = ctx
        .controller
        .backend()
        .upload_resume(&token, path)
        .await
        .context("Failed to upload resume")?;

    print!("{}", view::upload(&upload));
    Ok(())
}
