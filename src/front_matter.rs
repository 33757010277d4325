//! Front-matter codec for news documents.
//!
//! A news file is a YAML header fenced by `---` lines followed by a
//! Markdown body. The codec is fail-safe: anything that does not decode as
//! a header is handed back untouched as body-only text.

use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use tracing::warn;

use crate::categories::Category;

const DELIMITER: &str = "---";

/// Metadata collected by the add-news flow.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewsMeta {
    pub category: Category,
    pub name: String,
    pub title: String,
    pub description: String,
}

/// Partial update applied over an existing header. `None` fields keep the
/// original values. `date` and the filename are never touched by updates.
#[derive(Clone, Debug, Default)]
pub struct NewsUpdate {
    pub name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub image: Option<String>,
}

/// Splits a document into its YAML header and body. Returns `(None,
/// original)` when fewer than two delimiters are present or the header
/// does not decode.
pub fn parse(content: &str) -> (Option<Mapping>, String) {
    let parts: Vec<&str> = content.split(DELIMITER).collect();
    if parts.len() < 3 {
        return (None, content.to_string());
    }
    match serde_yaml::from_str::<Mapping>(parts[1]) {
        Ok(header) => (Some(header), parts[2..].join(DELIMITER)),
        Err(e) => {
            warn!(error = %e, "front matter did not decode, treating file as body-only");
            (None, content.to_string())
        }
    }
}

/// Opaque per-post token stored as `news_id`. Generated once at creation
/// and preserved by every later edit.
pub fn generate_news_id() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    id[..16].to_string()
}

/// Renders a brand-new document. Keys are emitted in the fixed order the
/// site templates expect; `date` is set exactly once here.
pub fn render_new(meta: &NewsMeta, body: &str, image_rel: Option<&str>) -> String {
    let date = Local::now().format("%Y-%m-%d");
    let image_path = image_rel.map(|p| format!("/{p}")).unwrap_or_default();
    format!(
        "---\n\
         layout: news\n\
         news_id: {news_id}\n\
         name: \"{name}\"\n\
         title: \"{title}\"\n\
         description: \"{description}\"\n\
         date: {date}\n\
         image: \"{image}\"\n\
         category: {category}\n\
         ---\n\n\
         {body}\n",
        news_id = generate_news_id(),
        name = meta.name,
        title = meta.title,
        description = meta.description,
        date = date,
        image = image_path,
        category = meta.category.key(),
    )
}

/// Merges an update over an existing document, preserving untouched keys
/// and the body byte-for-byte. Documents that predate `news_id` get one
/// assigned here. A document without parseable front matter is returned
/// unchanged.
pub fn render_update(original: &str, updates: &NewsUpdate) -> String {
    let (header, body) = parse(original);
    let Some(mut header) = header else {
        return original.to_string();
    };
    if !header.contains_key("news_id") {
        header.insert(
            Value::from("news_id"),
            Value::from(generate_news_id()),
        );
    }
    apply_updates(&mut header, updates);
    render_document(&header, &body)
}

/// Swaps the body of an existing document, leaving the header untouched.
pub fn replace_body(original: &str, new_body: &str) -> String {
    match parse(original) {
        (Some(header), _) => {
            let yaml = serde_yaml::to_string(&header).unwrap_or_default();
            format!("---\n{yaml}---\n\n{new_body}\n")
        }
        (None, _) => new_body.to_string(),
    }
}

fn apply_updates(header: &mut Mapping, updates: &NewsUpdate) {
    if let Some(name) = &updates.name {
        header.insert(Value::from("name"), Value::from(name.clone()));
    }
    if let Some(title) = &updates.title {
        header.insert(Value::from("title"), Value::from(title.clone()));
    }
    if let Some(description) = &updates.description {
        header.insert(Value::from("description"), Value::from(description.clone()));
    }
    if let Some(category) = updates.category {
        header.insert(Value::from("category"), Value::from(category.key()));
    }
    if let Some(image) = &updates.image {
        header.insert(Value::from("image"), Value::from(image.clone()));
    }
}

/// Reattaches a header to a body. The body keeps whatever leading blank
/// lines it had when parsed, so reserializing an unmodified document does
/// not drift.
fn render_document(header: &Mapping, body: &str) -> String {
    let yaml = serde_yaml::to_string(header).unwrap_or_default();
    format!("---\n{yaml}---{body}")
}
