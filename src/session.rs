//! Per-chat conversation state.
//!
//! One flow at a time per chat. Each enum variant is one (flow, step) pair
//! and carries only the input accumulated so far, so a step can never see
//! fields that belong to another flow. Events that do not match the
//! pending step are dropped without a reply; the drop is counted so tests
//! and diagnostics can observe it.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};
use teloxide::types::ChatId;
use tracing::debug;

use crate::categories::Category;
use crate::front_matter::NewsMeta;

/// Conversation state, stored per chat id in the dispatcher's dialogue
/// storage. Sessions are never expired by time; an abandoned flow lives
/// until the operator finishes it, an error tears it down, or the process
/// restarts.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub enum State {
    /// No flow active.
    #[default]
    Idle,

    // Add-news flow: category → name → title → description → media → content.
    AwaitingCategory,
    AwaitingName {
        category: Category,
    },
    AwaitingTitle {
        category: Category,
        name: String,
    },
    AwaitingDescription {
        category: Category,
        name: String,
        title: String,
    },
    AwaitingMedia {
        meta: NewsMeta,
    },
    AwaitingContent {
        meta: NewsMeta,
        media: Option<Vec<u8>>,
    },

    // Edit-news flow: one field of an existing document per pass.
    AwaitingEditField {
        path: PathBuf,
        original: String,
    },
    AwaitingEditValue {
        path: PathBuf,
        original: String,
        field: EditField,
    },

    // Menu flows. `target == None` appends, `Some(i)` edits in place.
    AwaitingMenuTitle {
        target: Option<usize>,
    },
    AwaitingMenuUrl {
        target: Option<usize>,
        title: Option<String>,
    },
}

/// Editable fields of an existing news document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditField {
    Name,
    Title,
    Description,
    Category,
    Image,
    Content,
}

impl EditField {
    /// Field key as used in `edit_field_*` callback data.
    pub fn from_key(key: &str) -> Option<EditField> {
        match key {
            "name" => Some(EditField::Name),
            "title" => Some(EditField::Title),
            "description" => Some(EditField::Description),
            "category" => Some(EditField::Category),
            "image" => Some(EditField::Image),
            "content" => Some(EditField::Content),
            _ => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            EditField::Name => "name",
            EditField::Title => "title",
            EditField::Description => "description",
            EditField::Category => "category",
            EditField::Image => "image",
            EditField::Content => "content",
        }
    }
}

/// Type alias for the per-chat dialogue handle.
pub type SiteDialogue = Dialogue<State, InMemStorage<State>>;

/// Count of events that arrived while no matching step was pending and
/// were dropped without a reply.
pub static DROPPED_EVENTS: AtomicU64 = AtomicU64::new(0);

pub fn note_dropped_event(chat_id: ChatId, kind: &str) {
    DROPPED_EVENTS.fetch_add(1, Ordering::Relaxed);
    debug!(chat_id = %chat_id, kind, "event did not match the pending step, dropped");
}

pub fn dropped_event_count() -> u64 {
    DROPPED_EVENTS.load(Ordering::Relaxed)
}
