use super::{require_session, Context};
use crate::view::{self, Screen};

pub async fn most_played(ctx: &Context, limit: u32) -> Screen {
    if let Some(screen) = require_session(ctx) {
        return screen;
    }
    match ctx.api.fetch_most_played(limit).await {
        Ok(stats) => view::most_played(&stats),
        Err(e) => view::api_error(&e, "Unable to load listening stats. Please try again."),
    }
}

pub async fn genres(ctx: &Context) -> Screen {
    if let Some(screen) = require_session(ctx) {
        return screen;
    }
    match ctx.api.fetch_genre_stats().await {
        Ok(stats) => view::genre_stats(&stats),
        Err(e) => view::api_error(&e, "Unable to load listening stats. Please try again."),
    }
}
