//! Callback Handler module for processing inline keyboard callback queries

use std::sync::Arc;

use anyhow::Result;
use serde_yaml::Value;
use teloxide::prelude::*;
use teloxide::types::MessageId;
use tracing::{debug, warn};

use crate::config::BotConfig;
use crate::front_matter;
use crate::session::{note_dropped_event, EditField, SiteDialogue, State};
use crate::store::ContentStore;

use super::ui_builder::{
    category_keyboard, confirm_keyboard, edit_field_keyboard, format_menu, format_news_list,
    menu_keyboard, news_keyboard, news_label, news_picker_labels, picker_keyboard,
};

/// Handle callback queries from inline keyboards.
pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    dialogue: SiteDialogue,
    config: Arc<BotConfig>,
    store: Arc<ContentStore>,
) -> Result<()> {
    if !config.is_authorized(q.from.id) {
        warn!(user_id = %q.from.id, "unauthorized callback ignored");
        bot.answer_callback_query(q.id).await?;
        return Ok(());
    }

    let data = q.data.clone().unwrap_or_default();
    debug!(user_id = %q.from.id, data = %data, "callback query received");

    if let Some(msg) = &q.message {
        dispatch_callback(&bot, &data, msg.chat().id, msg.id(), dialogue, &store).await?;
    }

    // Answer the callback query to remove the loading state.
    bot.answer_callback_query(q.id).await?;
    Ok(())
}

async fn dispatch_callback(
    bot: &Bot,
    data: &str,
    chat_id: ChatId,
    message_id: MessageId,
    dialogue: SiteDialogue,
    store: &ContentStore,
) -> Result<()> {
    match data {
        "show_menu" => {
            let menu = store.read_menu();
            bot.edit_message_text(chat_id, message_id, format_menu(&menu))
                .reply_markup(menu_keyboard())
                .await?;
        }
        "add_item" => {
            dialogue
                .update(State::AwaitingMenuTitle { target: None })
                .await?;
            bot.edit_message_text(chat_id, message_id, "Enter the title for the new menu item:")
                .await?;
        }
        "edit_item" => {
            let menu = store.read_menu();
            let labels: Vec<String> = menu.items.iter().map(|item| item.title.clone()).collect();
            bot.edit_message_text(chat_id, message_id, "Pick a menu item to edit:")
                .reply_markup(picker_keyboard(&labels, "edit_select_", "back_to_menu"))
                .await?;
        }
        "delete_item" => {
            let menu = store.read_menu();
            let labels: Vec<String> = menu.items.iter().map(|item| item.title.clone()).collect();
            bot.edit_message_text(chat_id, message_id, "Pick a menu item to delete:")
                .reply_markup(picker_keyboard(&labels, "delete_confirm_", "back_to_menu"))
                .await?;
        }
        "add_news" => {
            dialogue.update(State::AwaitingCategory).await?;
            bot.send_message(chat_id, "Pick a category:")
                .reply_markup(category_keyboard())
                .await?;
        }
        "list_news" => {
            let files = store.list_news();
            bot.edit_message_text(chat_id, message_id, format_news_list(&files))
                .reply_markup(news_keyboard())
                .await?;
        }
        "edit_news" => {
            let files = store.list_news();
            let labels = news_picker_labels(&files);
            bot.edit_message_text(chat_id, message_id, "Pick a news post to edit:")
                .reply_markup(picker_keyboard(&labels, "edit_news_select_", "back_to_news"))
                .await?;
        }
        "delete_news" => {
            let files = store.list_news();
            let labels = news_picker_labels(&files);
            bot.edit_message_text(chat_id, message_id, "Pick a news post to delete:")
                .reply_markup(picker_keyboard(
                    &labels,
                    "delete_news_confirm_",
                    "back_to_news",
                ))
                .await?;
        }
        "back_to_menu" => {
            bot.edit_message_text(chat_id, message_id, "🔧 Site menu management:")
                .reply_markup(menu_keyboard())
                .await?;
        }
        "back_to_news" => {
            bot.edit_message_text(chat_id, message_id, "📰 News management:")
                .reply_markup(news_keyboard())
                .await?;
        }
        other => {
            if let Some(index) = parse_index(other, "edit_select_") {
                handle_menu_item_select(bot, chat_id, message_id, dialogue, store, index).await?;
            } else if let Some(index) = parse_index(other, "delete_confirm_") {
                handle_menu_delete_confirm(bot, chat_id, message_id, store, index).await?;
            } else if let Some(index) = parse_index(other, "delete_execute_") {
                handle_menu_delete_execute(bot, chat_id, message_id, store, index).await?;
            } else if let Some(index) = parse_index(other, "edit_news_select_") {
                handle_edit_news_select(bot, chat_id, message_id, dialogue, store, index).await?;
            } else if let Some(field_key) = other.strip_prefix("edit_field_") {
                handle_edit_field_choice(bot, chat_id, dialogue, field_key).await?;
            } else if let Some(index) = parse_index(other, "delete_news_confirm_") {
                handle_news_delete_confirm(bot, chat_id, message_id, store, index).await?;
            } else if let Some(index) = parse_index(other, "delete_news_execute_") {
                handle_news_delete_execute(bot, chat_id, message_id, store, index).await?;
            } else {
                note_dropped_event(chat_id, "unknown callback data");
            }
        }
    }
    Ok(())
}

fn parse_index(data: &str, prefix: &str) -> Option<usize> {
    data.strip_prefix(prefix)?.parse().ok()
}

async fn handle_menu_item_select(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    dialogue: SiteDialogue,
    store: &ContentStore,
    index: usize,
) -> Result<()> {
    let menu = store.read_menu();
    match menu.items.get(index) {
        Some(item) => {
            dialogue
                .update(State::AwaitingMenuTitle {
                    target: Some(index),
                })
                .await?;
            bot.edit_message_text(
                chat_id,
                message_id,
                format!(
                    "Editing menu item:\n\nCurrent title: {}\nCurrent URL: {}\n\n\
                     Enter a new title (or /skip to keep the current one):",
                    item.title, item.url
                ),
            )
            .await?;
        }
        None => {
            bot.edit_message_text(chat_id, message_id, "❌ That menu item no longer exists")
                .reply_markup(menu_keyboard())
                .await?;
        }
    }
    Ok(())
}

async fn handle_menu_delete_confirm(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    store: &ContentStore,
    index: usize,
) -> Result<()> {
    let menu = store.read_menu();
    match menu.items.get(index) {
        Some(item) => {
            bot.edit_message_text(
                chat_id,
                message_id,
                format!("Delete this menu item?\n\n{} → {}", item.title, item.url),
            )
            .reply_markup(confirm_keyboard(
                &format!("delete_execute_{index}"),
                "back_to_menu",
            ))
            .await?;
        }
        None => {
            bot.edit_message_text(chat_id, message_id, "❌ That menu item no longer exists")
                .reply_markup(menu_keyboard())
                .await?;
        }
    }
    Ok(())
}

async fn handle_menu_delete_execute(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    store: &ContentStore,
    index: usize,
) -> Result<()> {
    let mut menu = store.read_menu();
    if index < menu.items.len() {
        let removed = menu.items.remove(index);
        if store.write_menu(&menu) {
            bot.edit_message_text(
                chat_id,
                message_id,
                format!("✅ Menu item deleted: {}", removed.title),
            )
            .reply_markup(menu_keyboard())
            .await?;
        } else {
            bot.edit_message_text(chat_id, message_id, "❌ Could not save the menu")
                .reply_markup(menu_keyboard())
                .await?;
        }
    } else {
        bot.edit_message_text(chat_id, message_id, "❌ That menu item no longer exists")
            .reply_markup(menu_keyboard())
            .await?;
    }
    Ok(())
}

async fn handle_edit_news_select(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    dialogue: SiteDialogue,
    store: &ContentStore,
    index: usize,
) -> Result<()> {
    let files = store.list_news();
    let Some(path) = files.get(index) else {
        bot.edit_message_text(chat_id, message_id, "❌ That news post no longer exists")
            .reply_markup(news_keyboard())
            .await?;
        return Ok(());
    };
    let Some(content) = store.read_news(path) else {
        bot.edit_message_text(chat_id, message_id, "❌ Could not read the news post")
            .reply_markup(news_keyboard())
            .await?;
        return Ok(());
    };
    let (header, _) = front_matter::parse(&content);
    let Some(header) = header else {
        bot.edit_message_text(
            chat_id,
            message_id,
            "❌ The news post has no readable front matter",
        )
        .reply_markup(news_keyboard())
        .await?;
        return Ok(());
    };

    dialogue
        .update(State::AwaitingEditField {
            path: path.clone(),
            original: content.clone(),
        })
        .await?;

    let current = |key: &str| {
        header
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or("—")
            .to_string()
    };
    bot.edit_message_text(
        chat_id,
        message_id,
        format!(
            "Pick a field to edit:\n\nCurrent values:\n\
             Name: {}\nTitle: {}\nDescription: {}\nCategory: {}",
            current("name"),
            current("title"),
            current("description"),
            current("category"),
        ),
    )
    .reply_markup(edit_field_keyboard())
    .await?;
    Ok(())
}

async fn handle_edit_field_choice(
    bot: &Bot,
    chat_id: ChatId,
    dialogue: SiteDialogue,
    field_key: &str,
) -> Result<()> {
    // Only meaningful while a document is selected.
    let Some(State::AwaitingEditField { path, original }) = dialogue.get().await? else {
        note_dropped_event(chat_id, "field choice without a selected post");
        return Ok(());
    };
    let Some(field) = EditField::from_key(field_key) else {
        note_dropped_event(chat_id, "unknown edit field");
        return Ok(());
    };

    match field {
        EditField::Category => {
            bot.send_message(chat_id, "Pick the new category:")
                .reply_markup(category_keyboard())
                .await?;
        }
        EditField::Image => {
            bot.send_message(chat_id, "Send the new image (or /skip to keep the current one):")
                .await?;
        }
        EditField::Name => {
            bot.send_message(chat_id, "Enter the new name:").await?;
        }
        EditField::Title => {
            bot.send_message(chat_id, "Enter the new title:").await?;
        }
        EditField::Description => {
            bot.send_message(chat_id, "Enter the new description:")
                .await?;
        }
        EditField::Content => {
            bot.send_message(chat_id, "Enter the new content:").await?;
        }
    }

    dialogue
        .update(State::AwaitingEditValue {
            path,
            original,
            field,
        })
        .await?;
    Ok(())
}

async fn handle_news_delete_confirm(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    store: &ContentStore,
    index: usize,
) -> Result<()> {
    let files = store.list_news();
    match files.get(index) {
        Some(path) => {
            // Prefer the display name from front matter, fall back to the
            // file stem.
            let name = store
                .read_news(path)
                .and_then(|content| {
                    let (header, _) = front_matter::parse(&content);
                    header.and_then(|h| {
                        h.get("name").and_then(Value::as_str).map(str::to_string)
                    })
                })
                .unwrap_or_else(|| news_label(path));
            bot.edit_message_text(chat_id, message_id, format!("Delete this news post?\n\n{name}"))
                .reply_markup(confirm_keyboard(
                    &format!("delete_news_execute_{index}"),
                    "back_to_news",
                ))
                .await?;
        }
        None => {
            bot.edit_message_text(chat_id, message_id, "❌ That news post no longer exists")
                .reply_markup(news_keyboard())
                .await?;
        }
    }
    Ok(())
}

async fn handle_news_delete_execute(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    store: &ContentStore,
    index: usize,
) -> Result<()> {
    let files = store.list_news();
    let filename = files
        .get(index)
        .and_then(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned());
    match filename {
        Some(filename) => {
            if store.delete_news(&filename) {
                bot.edit_message_text(
                    chat_id,
                    message_id,
                    format!("✅ News post deleted: {filename}"),
                )
                .reply_markup(news_keyboard())
                .await?;
            } else {
                bot.edit_message_text(chat_id, message_id, "❌ Could not delete the news post")
                    .reply_markup(news_keyboard())
                    .await?;
            }
        }
        None => {
            bot.edit_message_text(chat_id, message_id, "❌ That news post no longer exists")
                .reply_markup(news_keyboard())
                .await?;
        }
    }
    Ok(())
}
