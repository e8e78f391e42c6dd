//! ReferralBot Telegram Bot
//!
//! Main application entry point

use std::sync::Arc;
use anyhow::Context;
use teloxide::{prelude::*, types::Update};
use teloxide::dispatching::UpdateHandler;
use tracing::{error, info, warn};

use ReferralBot::{
    config::Settings,
    database::{self, DatabaseService, LedgerStore},
    handlers::{handle_callback_query, handle_command, handle_message, Command},
    i18n::I18n,
    services::{CryptoPayClient, PaymentProvider, ServiceFactory},
    state::{RedisStateStorage, StateStorage},
    utils::logging,
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("failed to load configuration")?;
    settings.validate()?;

    // Initialize logging; the guard flushes the file writer on drop
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", ReferralBot::info());

    // Initialize database connection
    info!("Connecting to database...");
    let db_config = database::DatabaseConfig::from(&settings.database);
    let db_pool = database::create_pool(&db_config).await?;
    database::run_migrations(&db_pool).await?;
    database::health_check(&db_pool).await?;

    let database_service = DatabaseService::new(db_pool);
    let user_count = database_service.users.count().await?;
    info!(users = user_count, "Ledger ready");
    let store: Arc<dyn LedgerStore> = Arc::new(database_service);

    // Initialize state management
    info!("Connecting to Redis...");
    let state_storage: Arc<dyn StateStorage> = Arc::new(RedisStateStorage::new(settings.redis.clone()).await?);

    // Initialize payment provider
    let payments: Arc<dyn PaymentProvider> = Arc::new(CryptoPayClient::new(&settings.payment)?);

    // Initialize i18n system
    info!("Loading translations...");
    let mut i18n = I18n::new(&settings.i18n);
    i18n.load_translations().await?;
    let i18n = Arc::new(i18n);

    // Initialize bot and services
    let bot = Bot::new(&settings.bot.token);
    let services = ServiceFactory::new(
        bot.clone(),
        &settings,
        store,
        payments,
        state_storage,
        i18n.clone(),
    );
    let settings = Arc::new(settings);

    let mut dispatcher = Dispatcher::builder(bot, create_handler())
        .dependencies(dptree::deps![services, settings, i18n])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd.id);
        })
        .enable_ctrlc_handler()
        .build();

    info!("Starting bot with polling mode...");
    dispatcher.dispatch().await;

    info!("ReferralBot has been shut down.");
    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    dptree::entry()
        .branch(
            Update::filter_message()
                .branch(
                    dptree::entry()
                        .filter_command::<Command>()
                        .endpoint(handle_commands),
                )
                .branch(dptree::endpoint(handle_messages)),
        )
        .branch(Update::filter_callback_query().endpoint(handle_callbacks))
}

/// Handle bot commands
async fn handle_commands(
    bot: Bot,
    msg: Message,
    cmd: Command,
    services: ServiceFactory,
    settings: Arc<Settings>,
    i18n: Arc<I18n>,
) -> HandlerResult {
    if let Err(e) = handle_command(bot, msg, cmd, services, settings, i18n).await {
        error!(error = %e, severity = %e.severity(), recoverable = e.is_recoverable(), "Error handling command");
        return Err(e.into());
    }
    Ok(())
}

/// Handle regular messages
async fn handle_messages(
    bot: Bot,
    msg: Message,
    services: ServiceFactory,
    settings: Arc<Settings>,
    i18n: Arc<I18n>,
) -> HandlerResult {
    if let Err(e) = handle_message(bot, msg, services, settings, i18n).await {
        error!(error = %e, severity = %e.severity(), recoverable = e.is_recoverable(), "Error handling message");
        return Err(e.into());
    }
    Ok(())
}

/// Handle callback queries
async fn handle_callbacks(
    bot: Bot,
    query: CallbackQuery,
    services: ServiceFactory,
    settings: Arc<Settings>,
    i18n: Arc<I18n>,
) -> HandlerResult {
    if let Err(e) = handle_callback_query(bot, query, services, settings, i18n).await {
        error!(error = %e, severity = %e.severity(), recoverable = e.is_recoverable(), "Error handling callback query");
        return Err(e.into());
    }
    Ok(())
}
