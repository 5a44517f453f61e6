use super::{require_session, Context};
use crate::view::{self, Screen};

pub async fn status(ctx: &Context) -> Screen {
    if let Some(screen) = require_session(ctx) {
        return screen;
    }
    match ctx.api.fetch_subscription_status().await {
        Ok(status) => view::subscription(&status),
        Err(e) => view::api_error(&e, "Unable to load your subscription. Please try again."),
    }
}

pub async fn cancel(ctx: &Context) -> Screen {
    if let Some(screen) = require_session(ctx) {
        return screen;
    }
    match ctx.api.cancel_subscription().await {
        Ok(response) => view::subscription_canceled(&response),
        Err(e) => view::api_error(&e, "Unable to cancel your subscription. Please try again."),
    }
}
