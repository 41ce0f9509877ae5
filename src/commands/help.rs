// Help command - show usage guide

use poise::serenity_prelude as serenity;
use crate::{Context, Error};
use crate::utils::config::colors;

/// Show help and usage guide
#[poise::command(slash_command, prefix_command)]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();
    let prefix = data.settings.effective_prefix(ctx.guild_id(), &data.default_prefix);

    let embed = serenity::CreateEmbed::new()
        .title("🎵 Help")
        .description(format!("Prefix in this server: `{}` (slash commands always work)", prefix))
        .color(colors::PRIMARY)
        .field(
            "⚙️ Settings",
            "`/settings show` - View this server's settings\n\
            `/settings textchannel` - Channel for music commands\n\
            `/settings voicechannel` - Channel for playback\n\
            `/settings djrole` - Role allowed to use DJ commands",
            false,
        )
        .field(
            "🎚️ Playback",
            "`/settings volume` - Default volume (0-150)\n\
            `/settings repeat` - Off, All or Single\n\
            `/settings playlist` - Playlist used when the queue is empty",
            false,
        )
        .field(
            "🔤 Prefix",
            "`/settings prefix` - Custom prefix for this server\n\
            Leave any option empty to reset it",
            false,
        )
        .field(
            "🛠️ Owner",
            "`register` (prefix only) - Register or remove slash commands",
            false,
        )
        .footer(serenity::CreateEmbedFooter::new(
            "Settings commands need Manage Server",
        ));

    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
