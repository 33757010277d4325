//! UI Builder module for creating keyboards and formatting messages

use std::path::{Path, PathBuf};

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup};

use crate::categories::Category;
use crate::menu::Menu;

/// Selection keyboards and listings show at most this many documents.
pub const MAX_LISTED_NEWS: usize = 10;

/// Top-level menu-management actions.
pub fn menu_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            InlineKeyboardButton::callback("📋 Show menu", "show_menu"),
            InlineKeyboardButton::callback("➕ Add item", "add_item"),
        ],
        vec![
            InlineKeyboardButton::callback("✏️ Edit item", "edit_item"),
            InlineKeyboardButton::callback("❌ Delete item", "delete_item"),
        ],
    ])
}

/// Top-level news-management actions.
pub fn news_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            InlineKeyboardButton::callback("📝 Add news", "add_news"),
            InlineKeyboardButton::callback("📋 List news", "list_news"),
        ],
        vec![
            InlineKeyboardButton::callback("✏️ Edit news", "edit_news"),
            InlineKeyboardButton::callback("❌ Delete news", "delete_news"),
        ],
    ])
}

/// Reply keyboard offering the category labels; the choice comes back as
/// plain text matching one label.
pub fn category_keyboard() -> KeyboardMarkup {
    let rows: Vec<Vec<KeyboardButton>> = Category::ALL
        .iter()
        .map(|category| vec![KeyboardButton::new(category.label())])
        .collect();
    KeyboardMarkup::new(rows)
        .resize_keyboard()
        .one_time_keyboard()
}

/// Numbered picker over arbitrary labels; callback data is
/// `{prefix}{index}`.
pub fn picker_keyboard(labels: &[String], prefix: &str, back: &str) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            vec![InlineKeyboardButton::callback(
                format!("{}. {}", i + 1, label),
                format!("{prefix}{i}"),
            )]
        })
        .collect();
    rows.push(vec![InlineKeyboardButton::callback(
        "🔙 Back",
        back.to_string(),
    )]);
    InlineKeyboardMarkup::new(rows)
}

/// Yes/no confirmation for destructive actions.
pub fn confirm_keyboard(execute: &str, back: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("✅ Yes, delete", execute.to_string()),
        InlineKeyboardButton::callback("❌ No, cancel", back.to_string()),
    ]])
}

/// Field picker for the edit-news flow.
pub fn edit_field_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            InlineKeyboardButton::callback("📝 Name", "edit_field_name"),
            InlineKeyboardButton::callback("🏷 Title", "edit_field_title"),
        ],
        vec![
            InlineKeyboardButton::callback("📄 Description", "edit_field_description"),
            InlineKeyboardButton::callback("📌 Category", "edit_field_category"),
        ],
        vec![
            InlineKeyboardButton::callback("🖼 Image", "edit_field_image"),
            InlineKeyboardButton::callback("💬 Content", "edit_field_content"),
        ],
        vec![InlineKeyboardButton::callback("🔙 Back", "back_to_news")],
    ])
}

/// Human-readable listing of the current menu.
pub fn format_menu(menu: &Menu) -> String {
    let mut text = String::from("📋 Current menu:\n\n");
    for (i, item) in menu.items.iter().enumerate() {
        text.push_str(&format!("{}. {} → {}\n", i + 1, item.title, item.url));
    }
    text
}

/// Stem of a news file, shown in listings and pickers.
pub fn news_label(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Numbered listing of (at most the first ten) news documents.
pub fn format_news_list(files: &[PathBuf]) -> String {
    let mut text = String::from("📰 Latest news posts:\n\n");
    for (i, path) in files.iter().take(MAX_LISTED_NEWS).enumerate() {
        text.push_str(&format!("{}. {}\n", i + 1, news_label(path)));
    }
    text
}

/// Picker labels for the first ten news documents.
pub fn news_picker_labels(files: &[PathBuf]) -> Vec<String> {
    files
        .iter()
        .take(MAX_LISTED_NEWS)
        .map(|path| news_label(path))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::MenuItem;

    #[test]
    fn test_category_keyboard_lists_every_label() {
        let keyboard = category_keyboard();
        assert_eq!(keyboard.keyboard.len(), Category::ALL.len());
        for (row, category) in keyboard.keyboard.iter().zip(Category::ALL) {
            assert_eq!(row[0].text, category.label());
        }
    }

    #[test]
    fn test_picker_keyboard_data_is_indexed() {
        let labels = vec!["first".to_string(), "second".to_string()];
        let keyboard = picker_keyboard(&labels, "edit_select_", "back_to_menu");
        // One row per label plus the back row.
        assert_eq!(keyboard.inline_keyboard.len(), 3);
        let button = &keyboard.inline_keyboard[1][0];
        assert_eq!(button.text, "2. second");
    }

    #[test]
    fn test_format_menu_is_numbered() {
        let menu = Menu {
            items: vec![MenuItem {
                title: "Blog".to_string(),
                url: "/blog".to_string(),
            }],
        };
        assert!(format_menu(&menu).contains("1. Blog → /blog"));
    }

    #[test]
    fn test_news_listing_caps_at_ten() {
        let files: Vec<PathBuf> = (0..15)
            .map(|i| PathBuf::from(format!("2024-01-01-post-{i}.md")))
            .collect();
        let text = format_news_list(&files);
        assert!(text.contains("10. "));
        assert!(!text.contains("11. "));
        assert_eq!(news_picker_labels(&files).len(), MAX_LISTED_NEWS);
    }

    #[test]
    fn test_news_label_strips_extension() {
        let path = PathBuf::from("_posts/news/2024-05-01-privet--mir-.md");
        assert_eq!(news_label(&path), "2024-05-01-privet--mir-");
    }
}
