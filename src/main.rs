// Guild settings bot
// Per-server music settings, persisted to serversettings.json

mod commands;
mod models;
mod store;
mod utils;

use std::env;
use std::sync::Arc;

use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use tracing::{info, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::store::SettingsManager;
use crate::utils::config::Config;

/// User data shared across all commands
#[derive(Debug)]
pub struct Data {
    pub settings: Arc<SettingsManager>,
    /// Prefix for guilds without their own, and for DMs
    pub default_prefix: String,
}

type Error = Box<dyn std::error::Error + Send + Sync>;
type Context<'a> = poise::Context<'a, Data, Error>;

/// Register all slash commands
fn get_commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        commands::settings::settings(),
        commands::help::help(),
        commands::register::register(),
    ]
}

/// Guild prefix if one is set, otherwise the global one
fn resolve_prefix(
    ctx: poise::PartialContext<'_, Data, Error>,
) -> poise::BoxFuture<'_, Result<Option<String>, Error>> {
    Box::pin(async move {
        let data = ctx.data;
        Ok(Some(data.settings.effective_prefix(ctx.guild_id, &data.default_prefix)))
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "guild_settings_bot=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    info!("Starting settings bot...");

    let settings = SettingsManager::load(&config.settings_file);
    if settings.is_empty() {
        info!("No saved server settings yet, will write to {}", settings.path().display());
    } else {
        info!(
            "Settings manager ready ({} guild(s), {})",
            settings.len(),
            settings.path().display()
        );
    }

    let default_prefix = config.prefix.clone();

    // Setup framework
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: get_commands(),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(config.prefix.clone()),
                dynamic_prefix: Some(resolve_prefix),
                ..Default::default()
            },
            on_error: |error| {
                Box::pin(async move {
                    match error {
                        poise::FrameworkError::Command { error, ctx, .. } => {
                            error!("Command error: {:?}", error);
                            let _ = ctx.say(format!("❌ Error: {}", error)).await;
                        }
                        err => {
                            error!("Framework error: {:?}", err);
                        }
                    }
                })
            },
            ..Default::default()
        })
        .setup(|ctx, _ready, framework| {
            Box::pin(async move {
                info!("Bot is ready! Registering commands...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("Commands registered successfully!");

                Ok(Data {
                    settings,
                    default_prefix,
                })
            })
        })
        .build();

    // MESSAGE_CONTENT is privileged, enable it in the Discord Dev Portal for prefix commands
    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::DIRECT_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    let mut client = serenity::ClientBuilder::new(&config.token, intents)
        .framework(framework)
        .await
        .context("Failed to create client")?;

    // Run with graceful shutdown
    let shard_manager = client.shard_manager.clone();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to register Ctrl+C handler: {:?}", e);
            return;
        }
        info!("Shutting down...");
        shard_manager.shutdown_all().await;
    });

    if let Err(why) = client.start().await {
        error!("Client error: {:?}", why);
    }

    info!("Goodbye!");

    Ok(())
}
