//! Dialogue Manager module for handling flow step transitions

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::Local;
use teloxide::prelude::*;
use teloxide::types::{ChatAction, FileId, KeyboardRemove};
use tracing::{error, info};

use crate::categories::Category;
use crate::front_matter::{self, NewsMeta, NewsUpdate};
use crate::media;
use crate::session::{EditField, SiteDialogue, State};
use crate::slug::transliterate;
use crate::store::ContentStore;

use super::ui_builder::menu_keyboard;

/// Downloads a file payload from the Bot API file endpoint.
pub async fn download_file(bot: &Bot, file_id: FileId) -> Result<Vec<u8>> {
    let file = bot.get_file(file_id).await?;
    let url = format!(
        "https://api.telegram.org/file/bot{}/{}",
        bot.token(),
        file.path
    );

    let response = reqwest::get(&url).await?;
    let bytes = response.bytes().await?;
    Ok(bytes.to_vec())
}

/// Category step of the add-news flow. The reply keyboard sends a label
/// back as plain text; anything that is not a label is dropped, keeping
/// the step pending.
pub async fn handle_category_input(
    bot: &Bot,
    msg: &Message,
    dialogue: SiteDialogue,
    text: &str,
) -> Result<()> {
    let Some(category) = Category::from_label(text) else {
        crate::session::note_dropped_event(msg.chat.id, "text is not a category label");
        return Ok(());
    };
    dialogue.update(State::AwaitingName { category }).await?;
    bot.send_message(msg.chat.id, "📝 Enter the news name (shown on the site):")
        .reply_markup(KeyboardRemove::new())
        .await?;
    Ok(())
}

pub async fn handle_name_input(
    bot: &Bot,
    msg: &Message,
    dialogue: SiteDialogue,
    category: Category,
    text: &str,
) -> Result<()> {
    dialogue
        .update(State::AwaitingTitle {
            category,
            name: text.to_string(),
        })
        .await?;
    bot.send_message(msg.chat.id, "🏷 Enter the title (used for the SEO headline):")
        .await?;
    Ok(())
}

pub async fn handle_title_input(
    bot: &Bot,
    msg: &Message,
    dialogue: SiteDialogue,
    category: Category,
    name: String,
    text: &str,
) -> Result<()> {
    dialogue
        .update(State::AwaitingDescription {
            category,
            name,
            title: text.to_string(),
        })
        .await?;
    bot.send_message(msg.chat.id, "📄 Enter the news description:")
        .await?;
    Ok(())
}

pub async fn handle_description_input(
    bot: &Bot,
    msg: &Message,
    dialogue: SiteDialogue,
    category: Category,
    name: String,
    title: String,
    text: &str,
) -> Result<()> {
    dialogue
        .update(State::AwaitingMedia {
            meta: NewsMeta {
                category,
                name,
                title,
                description: text.to_string(),
            },
        })
        .await?;
    bot.send_message(
        msg.chat.id,
        "🖼 Send an image for the news post (or /skip to go without one):",
    )
    .await?;
    Ok(())
}

pub async fn handle_media_skip(
    bot: &Bot,
    msg: &Message,
    dialogue: SiteDialogue,
    meta: NewsMeta,
) -> Result<()> {
    dialogue
        .update(State::AwaitingContent { meta, media: None })
        .await?;
    bot.send_message(msg.chat.id, "💬 Enter the main news text (HTML/Markdown):")
        .await?;
    Ok(())
}

/// Media step of the add-news flow. On a processing failure the step stays
/// pending so the operator can retry or /skip.
pub async fn handle_media_photo(
    bot: &Bot,
    msg: &Message,
    dialogue: SiteDialogue,
    meta: NewsMeta,
    file_id: FileId,
) -> Result<()> {
    bot.send_chat_action(msg.chat.id, ChatAction::UploadPhoto)
        .await?;
    let original = match download_file(bot, file_id).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(chat_id = %msg.chat.id, error = %e, "photo download failed");
            bot.send_message(
                msg.chat.id,
                "❌ Could not download the image, send it again or /skip.",
            )
            .await?;
            return Ok(());
        }
    };

    match media::optimize_image(&original, media::DEFAULT_QUALITY) {
        Ok(optimized) => {
            info!(
                chat_id = %msg.chat.id,
                original_bytes = original.len(),
                optimized_bytes = optimized.len(),
                "image optimized"
            );
            dialogue
                .update(State::AwaitingContent {
                    meta,
                    media: Some(optimized),
                })
                .await?;
            bot.send_message(
                msg.chat.id,
                "✅ Image optimized and ready. Now enter the main text:",
            )
            .await?;
        }
        Err(e) => {
            error!(chat_id = %msg.chat.id, error = %e, "image optimization failed");
            bot.send_message(msg.chat.id, format!("❌ Image processing failed: {e}"))
                .await?;
        }
    }
    Ok(())
}

/// Final step of the add-news flow. The dialogue ends here no matter how
/// the commit went.
pub async fn handle_content_input(
    bot: &Bot,
    msg: &Message,
    dialogue: SiteDialogue,
    store: Arc<ContentStore>,
    meta: NewsMeta,
    media: Option<Vec<u8>>,
    text: &str,
) -> Result<()> {
    match commit_news(&store, &meta, media, text) {
        Ok(report) => {
            bot.send_message(msg.chat.id, report).await?;
        }
        Err(e) => {
            error!(chat_id = %msg.chat.id, error = %e, "news commit failed");
            bot.send_message(msg.chat.id, format!("❌ Could not save the news post: {e}"))
                .await?;
        }
    }
    dialogue.exit().await?;
    Ok(())
}

/// Persists a finished draft: image first, then the rendered document.
fn commit_news(
    store: &ContentStore,
    meta: &NewsMeta,
    media: Option<Vec<u8>>,
    body: &str,
) -> Result<String> {
    let image_rel = match media {
        Some(bytes) => {
            let image_name = format!("{}.webp", Local::now().format("%Y%m%d_%H%M%S"));
            store
                .save_image(&bytes, &image_name)
                .map(|p| p.to_string_lossy().replace('\\', "/"))
        }
        None => None,
    };

    let slug = transliterate(&meta.name);
    let filename = format!("{}-{}.md", Local::now().format("%Y-%m-%d"), slug);
    let content = front_matter::render_new(meta, body, image_rel.as_deref());
    let path = store.write_news(&filename, &content)?;

    info!(path = %path.display(), "news post created");
    Ok(format!(
        "✅ News post saved!\n\n\
         📌 Category: {}\n\
         📝 Name: {}\n\
         📁 Path: {}\n\
         🌐 Site URL: /news/{}/\n\
         🖼 Image: {}",
        meta.category.label(),
        meta.name,
        path.display(),
        slug,
        if image_rel.is_some() { "saved" } else { "none" },
    ))
}

/// Title step of the add/edit menu-item flow. `/skip` keeps the current
/// title (meaningful only when editing).
pub async fn handle_menu_title_input(
    bot: &Bot,
    msg: &Message,
    dialogue: SiteDialogue,
    target: Option<usize>,
    text: &str,
) -> Result<()> {
    let title = if text == "/skip" {
        None
    } else {
        Some(text.to_string())
    };
    dialogue
        .update(State::AwaitingMenuUrl { target, title })
        .await?;
    bot.send_message(msg.chat.id, "🌐 Enter the URL for the menu item:")
        .await?;
    Ok(())
}

/// URL step: applies the pending menu change and rewrites the menu file.
pub async fn handle_menu_url_input(
    bot: &Bot,
    msg: &Message,
    dialogue: SiteDialogue,
    store: Arc<ContentStore>,
    target: Option<usize>,
    title: Option<String>,
    text: &str,
) -> Result<()> {
    let mut menu = store.read_menu();
    let applied = menu.apply_edit(target, title, text.to_string());

    let reply = if !applied {
        if target.is_none() {
            "❌ A new menu item needs a title, nothing was added"
        } else {
            "❌ The selected menu item no longer exists, nothing was changed"
        }
    } else if !store.write_menu(&menu) {
        "❌ Could not save the menu"
    } else if target.is_some() {
        "✅ Menu item updated!"
    } else {
        "✅ Menu item added!"
    };

    bot.send_message(msg.chat.id, reply)
        .reply_markup(menu_keyboard())
        .await?;
    dialogue.exit().await?;
    Ok(())
}

enum FieldEditOutcome {
    Updated,
    KeptCurrent,
}

/// Value step of the edit-news flow. Every outcome, including a
/// validation error, tears the session down; the operator restarts from
/// /news if needed.
pub async fn handle_edit_value_input(
    bot: &Bot,
    msg: &Message,
    dialogue: SiteDialogue,
    store: Arc<ContentStore>,
    path: PathBuf,
    original: String,
    field: EditField,
) -> Result<()> {
    match apply_field_edit(bot, msg, &store, &path, &original, field).await {
        Ok(FieldEditOutcome::Updated) => {
            bot.send_message(
                msg.chat.id,
                format!("✅ News post updated!\n📁 Path: {}", path.display()),
            )
            .reply_markup(KeyboardRemove::new())
            .await?;
        }
        Ok(FieldEditOutcome::KeptCurrent) => {
            bot.send_message(msg.chat.id, "👌 Keeping the current image")
                .await?;
        }
        Err(e) => {
            error!(chat_id = %msg.chat.id, field = field.key(), error = %e, "news edit failed");
            bot.send_message(msg.chat.id, format!("❌ Could not update the news post: {e}"))
                .await?;
        }
    }
    dialogue.exit().await?;
    Ok(())
}

async fn apply_field_edit(
    bot: &Bot,
    msg: &Message,
    store: &ContentStore,
    path: &Path,
    original: &str,
    field: EditField,
) -> Result<FieldEditOutcome> {
    let mut updates = NewsUpdate::default();

    match field {
        EditField::Category => {
            let text = expect_text(msg)?;
            let category =
                Category::from_label(text).ok_or_else(|| anyhow!("unknown category: {text}"))?;
            updates.category = Some(category);
        }
        EditField::Image => {
            if let Some(photo) = msg.photo().and_then(|p| p.last()) {
                bot.send_chat_action(msg.chat.id, ChatAction::UploadPhoto)
                    .await?;
                let bytes = download_file(bot, photo.file.id.clone()).await?;
                let optimized = media::optimize_image(&bytes, media::DEFAULT_QUALITY)?;
                let image_name = format!("{}.webp", Local::now().format("%Y%m%d_%H%M%S"));
                let rel = store
                    .save_image(&optimized, &image_name)
                    .ok_or_else(|| anyhow!("could not save the image"))?;
                updates.image = Some(format!("/{}", rel.to_string_lossy().replace('\\', "/")));
            } else if msg.text() == Some("/skip") {
                return Ok(FieldEditOutcome::KeptCurrent);
            } else {
                return Err(anyhow!("send an image or /skip to keep the current one"));
            }
        }
        EditField::Content => {
            let text = expect_text(msg)?;
            let updated = front_matter::replace_body(original, text);
            store.update_news(path, &updated)?;
            return Ok(FieldEditOutcome::Updated);
        }
        EditField::Name => updates.name = Some(expect_text(msg)?.to_string()),
        EditField::Title => updates.title = Some(expect_text(msg)?.to_string()),
        EditField::Description => updates.description = Some(expect_text(msg)?.to_string()),
    }

    let updated = front_matter::render_update(original, &updates);
    store.update_news(path, &updated)?;
    Ok(FieldEditOutcome::Updated)
}

fn expect_text(msg: &Message) -> Result<&str> {
    msg.text().ok_or_else(|| anyhow!("expected a text message"))
}
