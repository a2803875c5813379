use std::sync::Arc;

use teloxide::prelude::*;
use tracing::{debug, error, info, warn};
use tracing_subscriber::prelude::*;

use githelper::config::Config;
use githelper::helper::{Catalog, CatalogError, InboundMessage, Matcher, TelegramClient};
use githelper::{http, telegram_log};

struct BotState {
    config: Arc<Config>,
    matcher: Arc<Matcher>,
    telegram: TelegramClient,
}

#[tokio::main]
async fn main() {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "githelper.json".to_string());
    let config = match Config::load(&config_path) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let bot = config.telegram_bot_token.as_deref().map(Bot::new);

    // Setup logging
    let log_dir = config.data_dir.join("logs");
    std::fs::create_dir_all(&log_dir).ok();
    let log_file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("githelper.log"))
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to open log file in {}: {e}", log_dir.display());
            std::process::exit(1);
        }
    };
    let (non_blocking, _guard) = tracing_appender::non_blocking(log_file);

    let registry = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::INFO.into()),
                ),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::INFO.into()),
                ),
        );

    match (&bot, config.log_chat_id) {
        (Some(bot), Some(log_chat_id)) => {
            registry
                .with(telegram_log::TelegramLogLayer::new(bot.clone(), log_chat_id))
                .init();
        }
        _ => registry.init(),
    }

    info!("🚀 Starting githelper...");
    info!("Loaded config from {config_path}");

    let catalog = match load_catalog(&config) {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("Invalid catalog: {e}");
            std::process::exit(1);
        }
    };
    info!(
        "Catalog ready: {} topics, {} greetings",
        catalog.entries().len(),
        catalog.greeting_count()
    );
    let matcher = Arc::new(Matcher::new(catalog));

    let http_server = match config.http_addr {
        Some(addr) => match http::bind(addr).await {
            Ok(listener) => Some(tokio::spawn(http::serve(listener, matcher.clone()))),
            Err(e) => {
                error!("Failed to bind HTTP API on {addr}: {e}");
                std::process::exit(1);
            }
        },
        None => None,
    };

    if let Some(bot) = bot {
        let state = Arc::new(BotState {
            config: config.clone(),
            matcher,
            telegram: TelegramClient::new(bot.clone()),
        });
        run_bot(bot, state).await;
    }

    if let Some(server) = http_server {
        match server.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                error!("HTTP server failed: {e}");
                std::process::exit(1);
            }
            Err(e) => {
                error!("HTTP server task panicked: {e}");
                std::process::exit(1);
            }
        }
    }

    info!("👋 Shut down");
}

fn load_catalog(config: &Config) -> Result<Catalog, CatalogError> {
    match config.catalog_path {
        Some(ref path) => {
            info!("Loading catalog from {}", path.display());
            Catalog::load(path)
        }
        None => Catalog::builtin(),
    }
}

async fn run_bot(bot: Bot, state: Arc<BotState>) {
    match bot.get_me().await {
        Ok(me) => info!("🤖 Bot @{} ({}) polling", me.username(), me.id),
        Err(e) => warn!("Failed to get bot info: {e}"),
    }

    let handler = dptree::entry().branch(Update::filter_message().endpoint(handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn handle_message(msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    if !state.config.is_allowed_chat(msg.chat.id) {
        debug!("Ignoring message from chat {} (not allowed)", msg.chat.id);
        return Ok(());
    }

    let Some(inbound) = telegram_to_inbound(&msg) else {
        debug!("Ignoring non-text message {} in chat {}", msg.id, msg.chat.id);
        return Ok(());
    };

    let reply = state.matcher.respond(&inbound.origin(), &inbound.text);
    if let Err(e) = state
        .telegram
        .deliver(inbound.chat_id, &reply, state.config.delivery)
        .await
    {
        warn!("Reply to chat {} failed: {e}", inbound.chat_id);
    }

    Ok(())
}

fn telegram_to_inbound(msg: &Message) -> Option<InboundMessage> {
    let text = msg.text()?.to_string();
    let user = msg.from.as_ref();
    let user_id = user.map(|u| u.id.0 as i64).unwrap_or(0);
    let username = user
        .and_then(|u| u.username.as_deref())
        .unwrap_or_else(|| user.map(|u| u.first_name.as_str()).unwrap_or("unknown"))
        .to_string();

    Some(InboundMessage {
        chat_id: msg.chat.id.0,
        user_id,
        username,
        text,
    })
}
