//! File-backed content store for the site repository checkout.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::menu::Menu;

/// News documents, one Markdown file per post.
pub const NEWS_DIR: &str = "_posts/news";
/// Optimized image assets.
pub const IMAGES_DIR: &str = "assets/images/news";
/// The navigation menu, a single YAML list.
pub const MENU_FILE: &str = "_data/menu.yml";

/// Read/write access to the content repository. All writes are whole-file
/// rewrites; with exactly one operator there are no concurrent writers to
/// defend against.
pub struct ContentStore {
    repo_root: PathBuf,
}

impl ContentStore {
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
        }
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    /// Parses the menu file. Fail-open: any read or decode failure yields
    /// an empty menu so the bot stays usable while the checkout is broken.
    pub fn read_menu(&self) -> Menu {
        let path = self.repo_root.join(MENU_FILE);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read menu file, starting from an empty menu");
                return Menu::default();
            }
        };
        match serde_yaml::from_str(&raw) {
            Ok(menu) => menu,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "menu file did not parse, starting from an empty menu");
                Menu::default()
            }
        }
    }

    /// Rewrites the whole menu file, preserving item order.
    pub fn write_menu(&self, menu: &Menu) -> bool {
        let path = self.repo_root.join(MENU_FILE);
        let yaml = match serde_yaml::to_string(menu) {
            Ok(yaml) => yaml,
            Err(e) => {
                error!(error = %e, "menu did not serialize");
                return false;
            }
        };
        match fs::write(&path, yaml) {
            Ok(()) => true,
            Err(e) => {
                error!(path = %path.display(), error = %e, "could not write menu file");
                false
            }
        }
    }

    /// Markdown files in the news directory, in directory-enumeration
    /// order, not chronological.
    pub fn list_news(&self) -> Vec<PathBuf> {
        let dir = self.repo_root.join(NEWS_DIR);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "could not list news directory");
                return Vec::new();
            }
        };
        entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().map_or(false, |ext| ext == "md")
            })
            .collect()
    }

    pub fn read_news(&self, path: &Path) -> Option<String> {
        match fs::read_to_string(path) {
            Ok(content) => Some(content),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read news file");
                None
            }
        }
    }

    /// Writes a new document, creating the news directory first. Returns
    /// the absolute path written.
    pub fn write_news(&self, filename: &str, content: &str) -> io::Result<PathBuf> {
        let dir = self.repo_root.join(NEWS_DIR);
        fs::create_dir_all(&dir)?;
        let path = dir.join(filename);
        fs::write(&path, content)?;
        info!(path = %path.display(), "news file written");
        Ok(path)
    }

    /// Overwrites an existing document in place (edit flow).
    pub fn update_news(&self, path: &Path, content: &str) -> io::Result<()> {
        fs::write(path, content)
    }

    /// Removes a document by filename. `false` when the file is absent or
    /// the removal fails.
    pub fn delete_news(&self, filename: &str) -> bool {
        let path = self.repo_root.join(NEWS_DIR).join(filename);
        if !path.exists() {
            return false;
        }
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(path = %path.display(), "news file deleted");
                true
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "could not delete news file");
                false
            }
        }
    }

    /// Writes an optimized image and returns its repository-relative path
    /// for embedding into front matter. `None` on failure.
    pub fn save_image(&self, bytes: &[u8], filename: &str) -> Option<PathBuf> {
        let dir = self.repo_root.join(IMAGES_DIR);
        if let Err(e) = fs::create_dir_all(&dir) {
            error!(dir = %dir.display(), error = %e, "could not create images directory");
            return None;
        }
        let path = dir.join(filename);
        if let Err(e) = fs::write(&path, bytes) {
            error!(path = %path.display(), error = %e, "could not save image");
            return None;
        }
        Some(PathBuf::from(IMAGES_DIR).join(filename))
    }
}
