use narrafied_core::{Dashboard, Library};
use tracing::error;

use super::{require_session, Context};
use crate::view::{self, Screen};

/// Profile dashboard: profile, subscription and library summary
pub async fn profile(ctx: &Context) -> Screen {
    if let Some(screen) = require_session(ctx) {
        return screen;
    }
    match Dashboard::load(&ctx.api).await {
        Ok(dashboard) => view::dashboard(&dashboard),
        Err(e) => {
            error!(error = %e, "Failed to load dashboard");
            view::api_error(&e, "Unable to load your profile. Please try again.")
        }
    }
}

pub async fn library(ctx: &Context) -> Screen {
    if let Some(screen) = require_session(ctx) {
        return screen;
    }
    match Library::load(&ctx.api).await {
        Ok(library) => view::library(&library),
        Err(e) => {
            error!(error = %e, "Failed to load library");
            view::api_error(&e, "Unable to load your library. Please try again.")
        }
    }
}

pub async fn remove_book(ctx: &Context, book_id: i64) -> Screen {
    if let Some(screen) = require_session(ctx) {
        return screen;
    }
    match ctx.api.remove_book(book_id).await {
        Ok(response) => view::book_removed(book_id, &response),
        Err(e) => view::api_error(&e, "Unable to remove that book. Please try again."),
    }
}
