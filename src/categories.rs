//! Fixed category set for news posts.

use serde::{Deserialize, Serialize};

/// News categories known to the site templates. The internal key is what
/// gets persisted in front matter; the label is what the operator sees on
/// the selection keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Frontend,
    Backend,
    Seo,
    Tools,
    Cases,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Frontend,
        Category::Backend,
        Category::Seo,
        Category::Tools,
        Category::Cases,
    ];

    /// Internal key persisted in front matter.
    pub fn key(self) -> &'static str {
        match self {
            Category::Frontend => "frontend",
            Category::Backend => "backend",
            Category::Seo => "seo",
            Category::Tools => "tools",
            Category::Cases => "cases",
        }
    }

    /// Label shown on the operator's category keyboard.
    pub fn label(self) -> &'static str {
        match self {
            Category::Frontend => "👨‍💻 Frontend",
            Category::Backend => "⚙️ Backend",
            Category::Seo => "🔍 SEO",
            Category::Tools => "🛠️ Tools",
            Category::Cases => "📊 Case studies",
        }
    }

    pub fn from_key(key: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.key() == key)
    }

    pub fn from_label(label: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.label() == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_label_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_key(category.key()), Some(category));
            assert_eq!(Category::from_label(category.label()), Some(category));
        }
    }

    #[test]
    fn test_unknown_inputs_rejected() {
        assert_eq!(Category::from_key("devops"), None);
        assert_eq!(Category::from_label("Frontend"), None);
        assert_eq!(Category::from_label(""), None);
    }

    #[test]
    fn test_keys_are_lowercase_ascii() {
        for category in Category::ALL {
            assert!(category
                .key()
                .chars()
                .all(|c| c.is_ascii_lowercase()));
        }
    }
}
