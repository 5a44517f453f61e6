use anyhow::Result;
use tracing::error;

use super::{password_or_prompt, require_session, Context};
use crate::cli::DeleteAccountArgs;
use crate::view::{self, Screen};

pub async fn delete(ctx: &mut Context, args: DeleteAccountArgs) -> Result<Screen> {
    if let Some(screen) = require_session(ctx) {
        return Ok(screen);
    }
    if !args.yes {
        return Ok(view::delete_unconfirmed());
    }
    let password = password_or_prompt(args.password)?;

    let screen = match ctx.api.delete_account(&password, &args.reason).await {
        Ok(response) => view::account_deleted(&response),
        Err(e) => {
            error!(error = %e, "Account deletion failed");
            view::api_error(&e, "Unable to delete your account. Please try again.")
        }
    };
    Ok(screen)
}
