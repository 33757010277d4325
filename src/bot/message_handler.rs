//! Message Handler module for processing incoming Telegram messages

use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use tracing::{debug, warn};

use crate::config::{BotConfig, ACCESS_DENIED};
use crate::session::{note_dropped_event, SiteDialogue, State};
use crate::store::ContentStore;

use super::dialogue_manager::{
    handle_category_input, handle_content_input, handle_description_input,
    handle_edit_value_input, handle_media_photo, handle_media_skip, handle_menu_title_input,
    handle_menu_url_input, handle_name_input, handle_title_input,
};
use super::ui_builder::{menu_keyboard, news_keyboard};

const WELCOME: &str = "🌐 Site management\n\n\
                       /news — manage news posts\n\
                       /menu — manage the navigation menu\n\
                       /help — show this message";

pub async fn message_handler(
    bot: Bot,
    msg: Message,
    dialogue: SiteDialogue,
    config: Arc<BotConfig>,
    store: Arc<ContentStore>,
) -> Result<()> {
    // The single-operator gate runs before any state is touched.
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    if !config.is_authorized(user.id) {
        warn!(user_id = %user.id, chat_id = %msg.chat.id, "unauthorized sender");
        bot.send_message(msg.chat.id, ACCESS_DENIED).await?;
        return Ok(());
    }

    // Commands are recognized regardless of the pending step.
    if let Some(text) = msg.text() {
        match text {
            "/start" | "/help" => {
                bot.send_message(msg.chat.id, WELCOME).await?;
                return Ok(());
            }
            "/menu" => {
                bot.send_message(msg.chat.id, "🔧 Site menu management:")
                    .reply_markup(menu_keyboard())
                    .await?;
                return Ok(());
            }
            "/news" => {
                bot.send_message(msg.chat.id, "📰 News management:")
                    .reply_markup(news_keyboard())
                    .await?;
                return Ok(());
            }
            _ => {}
        }
    }

    let state = dialogue.get().await?.unwrap_or_default();
    debug!(chat_id = %msg.chat.id, "routing message by pending step");

    match state {
        State::AwaitingCategory => {
            if let Some(text) = msg.text() {
                handle_category_input(&bot, &msg, dialogue, text).await?;
            } else {
                note_dropped_event(msg.chat.id, "non-text at category step");
            }
        }
        State::AwaitingName { category } => {
            if let Some(text) = msg.text() {
                handle_name_input(&bot, &msg, dialogue, category, text).await?;
            } else {
                note_dropped_event(msg.chat.id, "non-text at name step");
            }
        }
        State::AwaitingTitle { category, name } => {
            if let Some(text) = msg.text() {
                handle_title_input(&bot, &msg, dialogue, category, name, text).await?;
            } else {
                note_dropped_event(msg.chat.id, "non-text at title step");
            }
        }
        State::AwaitingDescription {
            category,
            name,
            title,
        } => {
            if let Some(text) = msg.text() {
                handle_description_input(&bot, &msg, dialogue, category, name, title, text)
                    .await?;
            } else {
                note_dropped_event(msg.chat.id, "non-text at description step");
            }
        }
        State::AwaitingMedia { meta } => {
            if let Some(photo) = msg.photo().and_then(|p| p.last()) {
                handle_media_photo(&bot, &msg, dialogue, meta, photo.file.id.clone()).await?;
            } else if msg.text() == Some("/skip") {
                handle_media_skip(&bot, &msg, dialogue, meta).await?;
            } else {
                note_dropped_event(msg.chat.id, "no image or /skip at media step");
            }
        }
        State::AwaitingContent { meta, media } => {
            if let Some(text) = msg.text() {
                handle_content_input(&bot, &msg, dialogue, store, meta, media, text).await?;
            } else {
                note_dropped_event(msg.chat.id, "non-text at content step");
            }
        }
        State::AwaitingEditValue {
            path,
            original,
            field,
        } => {
            handle_edit_value_input(&bot, &msg, dialogue, store, path, original, field).await?;
        }
        State::AwaitingMenuTitle { target } => {
            if let Some(text) = msg.text() {
                handle_menu_title_input(&bot, &msg, dialogue, target, text).await?;
            } else {
                note_dropped_event(msg.chat.id, "non-text at menu title step");
            }
        }
        State::AwaitingMenuUrl { target, title } => {
            if let Some(text) = msg.text() {
                handle_menu_url_input(&bot, &msg, dialogue, store, target, title, text).await?;
            } else {
                note_dropped_event(msg.chat.id, "non-text at menu url step");
            }
        }
        State::Idle | State::AwaitingEditField { .. } => {
            // Nothing is expected from a plain message in these states.
            note_dropped_event(msg.chat.id, "no pending step for this message");
        }
    }

    Ok(())
}
