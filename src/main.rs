use std::sync::Arc;

use anyhow::Result;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use tracing::info;

use newsdesk::bot::{callback_handler, message_handler};
use newsdesk::config::BotConfig;
use newsdesk::session::State;
use newsdesk::store::ContentStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("Starting Newsdesk Telegram bot");

    let config = Arc::new(BotConfig::from_env()?);
    let store = Arc::new(ContentStore::new(config.repo_path.clone()));

    info!(repo = %store.repo_root().display(), "content repository configured");

    let bot = Bot::new(&config.bot_token);

    info!("Bot initialized, starting dispatcher");

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .enter_dialogue::<Message, InMemStorage<State>, State>()
                .endpoint(message_handler),
        )
        .branch(
            Update::filter_callback_query()
                .enter_dialogue::<CallbackQuery, InMemStorage<State>, State>()
                .endpoint(callback_handler),
        );

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![InMemStorage::<State>::new(), config, store])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
