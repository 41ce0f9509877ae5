// Owner-only slash command registration
// Commands are registered globally at startup; this is for re-registering
// in a single test guild or removing stale ones without a restart.

use tracing::info;

use crate::{Context, Error};

/// Register or remove slash commands in this server or globally
#[poise::command(prefix_command, hide_in_help, owners_only = true)]
pub async fn register(ctx: Context<'_>) -> Result<(), Error> {
    info!(
        "Command registration requested by {} in {:?}",
        ctx.author().id,
        ctx.guild_id()
    );
    poise::builtins::register_application_commands_buttons(ctx).await?;
    Ok(())
}
