use anyhow::Result;

use newsdesk::categories::Category;
use newsdesk::config::{BotConfig, ACCESS_DENIED};
use newsdesk::front_matter::NewsMeta;
use newsdesk::session::{dropped_event_count, note_dropped_event, EditField, State};
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};
use teloxide::types::{ChatId, UserId};

type TestDialogue = Dialogue<State, InMemStorage<State>>;

fn meta() -> NewsMeta {
    NewsMeta {
        category: Category::Tools,
        name: "Обзор".to_string(),
        title: "Review".to_string(),
        description: "desc".to_string(),
    }
}

/// The add-news flow walks its steps in order, accumulating fields.
#[tokio::test]
async fn test_add_news_flow_accumulates_fields() -> Result<()> {
    let storage = InMemStorage::<State>::new();
    let dialogue: TestDialogue = Dialogue::new(storage, ChatId(1));

    // No flow active until the operator enters one.
    assert_eq!(dialogue.get().await?, None);

    dialogue.update(State::AwaitingCategory).await?;
    dialogue
        .update(State::AwaitingName {
            category: Category::Tools,
        })
        .await?;
    dialogue
        .update(State::AwaitingTitle {
            category: Category::Tools,
            name: "Обзор".to_string(),
        })
        .await?;
    dialogue
        .update(State::AwaitingMedia { meta: meta() })
        .await?;
    dialogue
        .update(State::AwaitingContent {
            meta: meta(),
            media: Some(vec![1, 2, 3]),
        })
        .await?;

    match dialogue.get().await? {
        Some(State::AwaitingContent { meta, media }) => {
            assert_eq!(meta.name, "Обзор");
            assert_eq!(meta.category, Category::Tools);
            assert_eq!(media, Some(vec![1, 2, 3]));
        }
        other => panic!("unexpected dialogue state: {other:?}"),
    }

    Ok(())
}

/// Flow completion removes the per-chat entry entirely.
#[tokio::test]
async fn test_exit_tears_the_session_down() -> Result<()> {
    let storage = InMemStorage::<State>::new();
    let dialogue: TestDialogue = Dialogue::new(storage, ChatId(2));

    dialogue.update(State::AwaitingCategory).await?;
    assert!(dialogue.get().await?.is_some());

    dialogue.exit().await?;
    assert_eq!(dialogue.get().await?, None);

    Ok(())
}

/// Distinct chat ids never share state.
#[tokio::test]
async fn test_chats_are_independent() -> Result<()> {
    let storage = InMemStorage::<State>::new();
    let first: TestDialogue = Dialogue::new(storage.clone(), ChatId(10));
    let second: TestDialogue = Dialogue::new(storage, ChatId(11));

    first
        .update(State::AwaitingMenuTitle { target: None })
        .await?;
    assert_eq!(second.get().await?, None);

    second
        .update(State::AwaitingMenuUrl {
            target: Some(3),
            title: None,
        })
        .await?;
    assert_eq!(
        first.get().await?,
        Some(State::AwaitingMenuTitle { target: None })
    );

    Ok(())
}

/// The edit flow keeps the selected document and field together.
#[tokio::test]
async fn test_edit_flow_state_carries_its_target() -> Result<()> {
    let storage = InMemStorage::<State>::new();
    let dialogue: TestDialogue = Dialogue::new(storage, ChatId(3));

    let original = "---\nname: x\n---\n\nbody\n".to_string();
    dialogue
        .update(State::AwaitingEditField {
            path: "_posts/news/2024-01-01-x.md".into(),
            original: original.clone(),
        })
        .await?;
    dialogue
        .update(State::AwaitingEditValue {
            path: "_posts/news/2024-01-01-x.md".into(),
            original,
            field: EditField::Category,
        })
        .await?;

    match dialogue.get().await? {
        Some(State::AwaitingEditValue { path, field, .. }) => {
            assert_eq!(path.to_string_lossy(), "_posts/news/2024-01-01-x.md");
            assert_eq!(field, EditField::Category);
        }
        other => panic!("unexpected dialogue state: {other:?}"),
    }

    Ok(())
}

/// Unauthorized senders are rejected by a pure gate before any dialogue
/// state exists, and the denial text is fixed.
#[tokio::test]
async fn test_unauthorized_sender_leaves_no_state() -> Result<()> {
    let config = BotConfig {
        bot_token: "token".to_string(),
        authorized_user: UserId(1000),
        repo_path: "/tmp/site".into(),
    };
    assert!(!config.is_authorized(UserId(2000)));
    assert_eq!(ACCESS_DENIED, "⛔ Access denied");

    // The handler checks the gate first, so the stranger's chat never gets
    // an entry in the storage.
    let storage = InMemStorage::<State>::new();
    let stranger: TestDialogue = Dialogue::new(storage, ChatId(2000));
    assert_eq!(stranger.get().await?, None);

    Ok(())
}

/// Dropped events are silent for the operator but visible to diagnostics.
#[test]
fn test_dropped_events_are_observable() {
    let before = dropped_event_count();
    note_dropped_event(ChatId(99), "photo at a text step");
    assert!(dropped_event_count() > before);
}
