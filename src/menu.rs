//! Navigation menu model persisted in `_data/menu.yml`.

use serde::{Deserialize, Serialize};

/// One navigation entry. Order inside [`Menu::items`] is display order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub title: String,
    pub url: String,
}

/// The full navigation menu. Items are addressed by 0-based position, and
/// positions shift whenever the list mutates, so a selection made from a
/// stale listing can miss its target. [`Menu::apply_edit`] rejects
/// out-of-range positions instead of panicking.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

impl Menu {
    /// Appends a new item (`target == None`) or updates one in place.
    /// When editing, a `None` title keeps the current one. Returns `false`
    /// for an out-of-range target or an append without a title.
    pub fn apply_edit(&mut self, target: Option<usize>, title: Option<String>, url: String) -> bool {
        match target {
            None => match title {
                Some(title) => {
                    self.items.push(MenuItem { title, url });
                    true
                }
                None => false,
            },
            Some(index) => match self.items.get_mut(index) {
                Some(item) => {
                    if let Some(title) = title {
                        item.title = title;
                    }
                    item.url = url;
                    true
                }
                None => false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_menu() -> Menu {
        Menu {
            items: vec![
                MenuItem {
                    title: "Home".to_string(),
                    url: "/".to_string(),
                },
                MenuItem {
                    title: "About".to_string(),
                    url: "/about".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_append_goes_to_the_end() {
        let mut menu = sample_menu();
        assert!(menu.apply_edit(None, Some("Blog".to_string()), "/blog".to_string()));
        assert_eq!(menu.items.len(), 3);
        assert_eq!(
            menu.items[2],
            MenuItem {
                title: "Blog".to_string(),
                url: "/blog".to_string(),
            }
        );
    }

    #[test]
    fn test_append_without_title_is_rejected() {
        let mut menu = sample_menu();
        assert!(!menu.apply_edit(None, None, "/blog".to_string()));
        assert_eq!(menu, sample_menu());
    }

    #[test]
    fn test_edit_updates_in_place() {
        let mut menu = sample_menu();
        assert!(menu.apply_edit(
            Some(1),
            Some("Team".to_string()),
            "/team".to_string()
        ));
        assert_eq!(menu.items[1].title, "Team");
        assert_eq!(menu.items[1].url, "/team");
        assert_eq!(menu.items[0], sample_menu().items[0]);
    }

    #[test]
    fn test_edit_with_skipped_title_keeps_current() {
        let mut menu = sample_menu();
        assert!(menu.apply_edit(Some(0), None, "/index.html".to_string()));
        assert_eq!(menu.items[0].title, "Home");
        assert_eq!(menu.items[0].url, "/index.html");
    }

    #[test]
    fn test_stale_position_is_rejected() {
        // An item selected from a two-entry listing can be gone by the
        // time the edit commits.
        let mut menu = sample_menu();
        menu.items.remove(0);
        assert!(!menu.apply_edit(
            Some(1),
            Some("Team".to_string()),
            "/team".to_string()
        ));
        assert_eq!(menu.items.len(), 1);
        assert_eq!(menu.items[0].title, "About");
    }

    #[test]
    fn test_yaml_round_trip_preserves_order() {
        let menu = sample_menu();
        let yaml = serde_yaml::to_string(&menu).unwrap();
        let home = yaml.find("Home").unwrap();
        let about = yaml.find("About").unwrap();
        assert!(home < about);

        let parsed: Menu = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, menu);
    }

    #[test]
    fn test_missing_items_field_means_empty() {
        let parsed: Menu = serde_yaml::from_str("{}").unwrap();
        assert!(parsed.items.is_empty());
    }
}
