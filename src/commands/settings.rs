use std::sync::Arc;

use poise::serenity_prelude as serenity;
use tracing::info;

use crate::models::settings::{RepeatMode, Settings, DEFAULT_VOLUME};
use crate::utils::config::{colors, MAX_VOLUME};
use crate::utils::formatters::{channel_mention, code_or_none, role_mention};
use crate::{Context, Error};

/// Repeat options shown in the slash command picker
#[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
pub enum RepeatChoice {
    #[name = "Off"]
    Off,
    #[name = "All"]
    All,
    #[name = "Single"]
    Single,
}

impl From<RepeatChoice> for RepeatMode {
    fn from(choice: RepeatChoice) -> Self {
        match choice {
            RepeatChoice::Off => RepeatMode::None,
            RepeatChoice::All => RepeatMode::All,
            RepeatChoice::Single => RepeatMode::Single,
        }
    }
}

/// Manage this server's music settings
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    required_permissions = "MANAGE_GUILD",
    subcommands(
        "show",
        "textchannel",
        "voicechannel",
        "djrole",
        "volume",
        "repeat",
        "playlist",
        "prefix"
    ),
    subcommand_required
)]
pub async fn settings(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Settings of the guild the command was used in
async fn guild_settings(ctx: Context<'_>) -> Result<Option<Arc<Settings>>, Error> {
    match ctx.guild_id() {
        Some(guild_id) => Ok(Some(ctx.data().settings.get_settings(guild_id))),
        None => {
            ctx.say("This command can only be used in a server.").await?;
            Ok(None)
        }
    }
}

async fn reply_updated(ctx: Context<'_>, description: String) -> Result<(), Error> {
    let embed = serenity::CreateEmbed::new()
        .title("Settings Updated")
        .description(description)
        .color(colors::SUCCESS);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Show current settings
#[poise::command(slash_command, prefix_command)]
pub async fn show(ctx: Context<'_>) -> Result<(), Error> {
    let Some(settings) = guild_settings(ctx).await? else {
        return Ok(());
    };
    let default_prefix = &ctx.data().default_prefix;

    let embed = serenity::CreateEmbed::new()
        .title("Music Settings")
        .field("Text Channel", channel_mention(settings.text_channel_id()), true)
        .field("Voice Channel", channel_mention(settings.voice_channel_id()), true)
        .field("DJ Role", role_mention(settings.dj_role_id()), true)
        .field("Volume", settings.volume().to_string(), true)
        .field("Repeat", settings.repeat_mode().to_string(), true)
        .field(
            "Prefix",
            format!("`{}`", settings.prefix_or(default_prefix)),
            true,
        )
        .field(
            "Default Playlist",
            code_or_none(settings.default_playlist().as_deref(), 100),
            false,
        )
        .color(colors::INFO);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// Restrict music commands to a text channel (omit to allow any)
#[poise::command(slash_command, prefix_command)]
pub async fn textchannel(
    ctx: Context<'_>,
    #[description = "Text channel for music commands"] channel: Option<serenity::Channel>,
) -> Result<(), Error> {
    let Some(settings) = guild_settings(ctx).await? else {
        return Ok(());
    };

    let channel_id = channel.map(|c| c.id().get());
    settings.set_text_channel(channel_id);
    info!("Text channel for guild {} set to {:?}", settings.guild_id(), channel_id);

    reply_updated(ctx, format!("**Text Channel** set to {}", channel_mention(channel_id))).await
}

/// Restrict playback to a voice channel (omit to allow any)
#[poise::command(slash_command, prefix_command)]
pub async fn voicechannel(
    ctx: Context<'_>,
    #[description = "Voice channel for playback"] channel: Option<serenity::Channel>,
) -> Result<(), Error> {
    let Some(settings) = guild_settings(ctx).await? else {
        return Ok(());
    };

    let channel_id = channel.map(|c| c.id().get());
    settings.set_voice_channel(channel_id);
    info!("Voice channel for guild {} set to {:?}", settings.guild_id(), channel_id);

    reply_updated(ctx, format!("**Voice Channel** set to {}", channel_mention(channel_id))).await
}

/// Set the role allowed to use DJ commands (omit to clear)
#[poise::command(slash_command, prefix_command)]
pub async fn djrole(
    ctx: Context<'_>,
    #[description = "DJ role"] role: Option<serenity::Role>,
) -> Result<(), Error> {
    let Some(settings) = guild_settings(ctx).await? else {
        return Ok(());
    };

    let role_id = role.map(|r| r.id.get());
    settings.set_dj_role(role_id);
    info!("DJ role for guild {} set to {:?}", settings.guild_id(), role_id);

    reply_updated(ctx, format!("**DJ Role** set to {}", role_mention(role_id))).await
}

/// Set playback volume (omit to reset to 100)
#[poise::command(slash_command, prefix_command)]
pub async fn volume(
    ctx: Context<'_>,
    #[description = "Volume (0-150)"]
    #[min = 0]
    #[max = 150]
    level: Option<i32>,
) -> Result<(), Error> {
    let Some(settings) = guild_settings(ctx).await? else {
        return Ok(());
    };

    let level = level.unwrap_or(DEFAULT_VOLUME);
    // Prefix invocations skip the slash min/max checks
    if !(0..=MAX_VOLUME).contains(&level) {
        let embed = serenity::CreateEmbed::new()
            .description(format!("Volume must be between 0 and {}.", MAX_VOLUME))
            .color(colors::ERROR);
        ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true)).await?;
        return Ok(());
    }

    settings.set_volume(level);
    info!("Volume for guild {} set to {}", settings.guild_id(), level);

    reply_updated(ctx, format!("**Volume** set to {}", level)).await
}

/// Set repeat mode (omit to turn off)
#[poise::command(slash_command, prefix_command)]
pub async fn repeat(
    ctx: Context<'_>,
    #[description = "Repeat mode"] mode: Option<RepeatChoice>,
) -> Result<(), Error> {
    let Some(settings) = guild_settings(ctx).await? else {
        return Ok(());
    };

    let mode = mode.map(RepeatMode::from).unwrap_or_default();
    settings.set_repeat_mode(mode);
    info!("Repeat mode for guild {} set to {}", settings.guild_id(), mode.as_str());

    reply_updated(ctx, format!("**Repeat** set to {}", mode)).await
}

/// Set the playlist loaded when the queue is empty (omit to clear)
#[poise::command(slash_command, prefix_command)]
pub async fn playlist(
    ctx: Context<'_>,
    #[description = "Playlist name"] name: Option<String>,
) -> Result<(), Error> {
    let Some(settings) = guild_settings(ctx).await? else {
        return Ok(());
    };

    let name = name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
    settings.set_default_playlist(name.clone());
    info!("Default playlist for guild {} set to {:?}", settings.guild_id(), name);

    reply_updated(
        ctx,
        format!("**Default Playlist** set to {}", code_or_none(name.as_deref(), 100)),
    )
    .await
}

/// Set a command prefix for this server (omit to use the default)
#[poise::command(slash_command, prefix_command)]
pub async fn prefix(
    ctx: Context<'_>,
    #[description = "New prefix"] value: Option<String>,
) -> Result<(), Error> {
    let Some(settings) = guild_settings(ctx).await? else {
        return Ok(());
    };

    let value = value.map(|p| p.trim().to_string()).filter(|p| !p.is_empty());
    settings.set_prefix(value.clone());
    info!("Prefix for guild {} set to {:?}", settings.guild_id(), value);

    let shown = settings.prefix_or(&ctx.data().default_prefix);
    reply_updated(ctx, format!("**Prefix** set to `{}`", shown)).await
}
