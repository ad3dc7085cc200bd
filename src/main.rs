use std::{process, sync::Arc, time::Duration};

use clap::{crate_description, Parser};

use env_logger::Builder;

use log::{error, info, LevelFilter};

use poise::serenity_prelude as serenity;

use yumbot::{commands, config::Config, interaction, watcher, Data, Error};

#[derive(Parser, Debug)]
#[command(about=crate_description!())]
#[command(version, long_about = None)]
struct CLArgs {
    #[arg(short, long, default_value = "none")]
    loglevel: String,
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
            process::exit(1);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            let reply = poise::CreateReply::default()
                .content("❌ Đã có lỗi xảy ra, vui lòng thử lại sau!")
                .ephemeral(true);
            if let Err(e) = ctx.send(reply).await {
                error!("Error while reporting command error: {}", e)
            }
        }
        // the prefix may be empty, so every chat message reaches the parser
        poise::FrameworkError::UnknownCommand { .. } => {}
        // "ip server la gi" runs `ip`, words after the command are chat
        poise::FrameworkError::ArgumentParse {
            error,
            ctx: poise::Context::Prefix(ctx),
            ..
        } if commands::is_trailing_text(error.as_ref()) => {
            let on_error = ctx.framework.options.on_error;
            let mut bare = ctx;
            bare.args = "";
            if let Err(e) = poise::run_invocation(bare).await {
                on_error(e).await;
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e)
            }
        }
    }
}

async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Ready { data_about_bot, .. } => {
            info!("{} is connected", data_about_bot.user.name);
            info!("Serving {} guilds", data_about_bot.guilds.len());
        }
        serenity::FullEvent::InteractionCreate { interaction } => {
            if let Err(e) = interaction::handle_interaction(ctx, interaction, data).await {
                error!("Error while handling interaction: {:?}", e);
            }
        }
        _ => {}
    }
    Ok(())
}

fn init_logging(loglevel: &str) {
    if loglevel == "none" {
        let env = env_logger::Env::new();
        env_logger::init_from_env(env);
        return;
    }

    match loglevel.parse::<LevelFilter>() {
        Ok(level) => Builder::new().filter_module("yumbot", level).init(),
        Err(_) => eprintln!("unknown log level '{loglevel}', logging disabled"),
    }
}

#[tokio::main]
async fn main() {
    let clargs = CLArgs::parse();
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");
    let _ = dotenvy::dotenv();

    init_logging(&clargs.loglevel);

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Cannot start: {e}");
            process::exit(1);
        }
    };

    info!("Starting...");
    info!(
        "gui permission: {}",
        if config.require_admin_only {
            "admin only"
        } else {
            "by role"
        }
    );
    if !config.allowed_role_ids.is_empty() {
        info!("{} role(s) allowed to use gui", config.allowed_role_ids.len());
    }

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::DIRECT_MESSAGES
        | serenity::GatewayIntents::GUILD_MEMBERS;

    let data = Data::new(config.clone());

    let options = poise::FrameworkOptions {
        commands: commands::commands(&data.policy),
        prefix_options: poise::PrefixFrameworkOptions {
            prefix: Some(config.prefix.clone()),
            case_insensitive_commands: true,
            edit_tracker: Some(Arc::new(poise::EditTracker::for_timespan(
                Duration::from_secs(3600),
            ))),
            ..Default::default()
        },
        on_error: |error| Box::pin(on_error(error)),
        pre_command: |ctx| {
            Box::pin(async move {
                info!("Executing command {}...", ctx.command().qualified_name);
            })
        },
        post_command: |ctx| {
            Box::pin(async move {
                info!("Executed command {}!", ctx.command().qualified_name);
            })
        },
        skip_checks_for_owners: false,
        event_handler: |ctx, event, framework, data| {
            Box::pin(event_handler(ctx, event, framework, data))
        },
        ..Default::default()
    };

    let framework = poise::Framework::builder()
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("Slash commands registered");

                ctx.set_activity(Some(serenity::ActivityData::watching(
                    &data.config.presence_name,
                )));
                // setup runs once per process, Ready may fire again on reconnect
                watcher::spawn(ctx.clone(), &data.config, data.probe.clone());

                Ok(data)
            })
        })
        .options(options)
        .build();

    let mut client = match serenity::ClientBuilder::new(&config.token, intents)
        .framework(framework)
        .await
    {
        Ok(client) => client,
        Err(e) => {
            error!("Error creating client: {:?}", e);
            process::exit(1);
        }
    };

    tokio::spawn(async move {
        if let Err(why) = client.start().await {
            error!("Cannot log in: {:?}", why);
            process::exit(1);
        }
    });

    let _signal_err = tokio::signal::ctrl_c().await;
    info!("Received Ctrl-C, shutting down.");
}
