use anyhow::Result;
use narrafied_core::auth::FileTokenStore;
use narrafied_core::{Config, TokenStorage};
use tracing::{error, warn};

use super::{password_or_prompt, prompt_line, Context};
use crate::cli::{LoginArgs, SignupArgs};
use crate::view::{self, Screen, SessionInfo};

pub async fn signup(ctx: &Context, args: SignupArgs) -> Result<Screen> {
    let password = password_or_prompt(args.password)?;

    let screen = match ctx
        .api
        .sign_up(&args.username, &args.email, &password, &args.region)
        .await
    {
        Ok(response) => view::signed_up(&response),
        Err(e) => {
            error!(error = %e, "Signup failed");
            view::api_error(&e, "Unable to sign up. Please try again.")
        }
    };
    Ok(screen)
}

pub async fn login(ctx: &mut Context, args: LoginArgs) -> Result<Screen> {
    let username = match args.username.or_else(|| ctx.config.last_username.clone()) {
        Some(username) => username,
        None => prompt_line("Username: ")?,
    };
    let password = password_or_prompt(args.password)?;

    match ctx.api.log_in(&username, &password).await {
        Ok(_) => {
            if ctx.storage.is_some() {
                if let Err(e) = Config::remember_username(&username) {
                    warn!(error = %e, "Failed to save config");
                }
            }
            ctx.config.last_username = Some(username);
            Ok(view::logged_in())
        }
        Err(e) => {
            error!(error = %e, "Login failed");
            Ok(view::api_error(&e, "Check your credentials and try again."))
        }
    }
}

pub fn logout(ctx: &mut Context) -> Screen {
    match ctx.api.log_out() {
        Ok(()) => view::logged_out(),
        Err(e) => view::api_error(&e, "Unable to sign out. Please try again."),
    }
}

pub fn status(ctx: &Context) -> Result<Screen> {
    let saved_at = match ctx.storage {
        Some(TokenStorage::File) if ctx.api.current_token().is_some() => {
            FileTokenStore::new(ctx.config.data_dir()?)
                .load_session()
                .ok()
                .flatten()
                .map(|s| s.saved_at)
        }
        _ => None,
    };

    let info = SessionInfo {
        environment: ctx.config.environment,
        base_url: ctx.api.base_url().to_string(),
        storage: ctx.storage,
        token: ctx.api.current_token().map(str::to_string),
        saved_at,
        last_username: ctx.config.last_username.clone(),
    };
    Ok(view::session_status(&info))
}
