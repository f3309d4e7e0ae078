use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::modules::message::schema::{MessageEntity, MessageReactionEntity, MessageType};

fn default_message_type() -> MessageType {
    MessageType::Text
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageBody {
    pub conversation_id: Uuid,
    #[validate(length(min = 1, max = 4000, message = "Message content must be 1-4000 characters"))]
    pub content: String,
    #[serde(rename = "type", default = "default_message_type")]
    pub _type: MessageType,
    /// When present, the friend-only gate of this user applies.
    pub recipient_id: Option<Uuid>,
    pub reply_to_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EditMessageBody {
    #[validate(length(min = 1, max = 4000, message = "Message content must be 1-4000 characters"))]
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ToggleReactionBody {
    #[validate(length(min = 1, max = 32, message = "Emoji must be 1-32 characters"))]
    pub emoji: String,
}

#[derive(Deserialize, Validate)]
pub struct PageQuery {
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: Option<i64>,
    /// RFC3339 timestamp of the oldest already-loaded message
    pub cursor: Option<String>,
}

#[derive(Deserialize, Validate)]
pub struct SearchMessagesQuery {
    #[validate(length(min = 1, message = "Search term cannot be empty"))]
    pub q: String,
}

#[derive(Debug, Clone)]
pub struct InsertMessage {
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub _type: MessageType,
    pub reply_to_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    #[serde(flatten)]
    pub message: MessageEntity,
    pub reactions: Vec<MessageReactionEntity>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePage {
    pub messages: Vec<MessageResponse>,
    /// Null when this page reached the start of the history
    pub next_cursor: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionToggleResponse {
    pub added: bool,
    pub reactions: Vec<MessageReactionEntity>,
}

/// Cursor arithmetic for backward pagination: `rows` comes in newest-first;
/// a full page means older history may remain and the oldest row's
/// timestamp becomes the next cursor.
pub fn page_cursor(
    rows: &[MessageEntity],
    limit: i64,
) -> Option<chrono::DateTime<chrono::Utc>> {
    if rows.len() as i64 == limit {
        rows.last().map(|m| m.created_at)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn message_at(offset_secs: i64) -> MessageEntity {
        MessageEntity {
            id: Uuid::now_v7(),
            conversation_id: Uuid::now_v7(),
            sender_id: Uuid::now_v7(),
            content: "hi".to_string(),
            _type: MessageType::Text,
            reply_to_id: None,
            is_edited: false,
            created_at: Utc::now() - Duration::seconds(offset_secs),
        }
    }

    #[test]
    fn test_full_page_returns_oldest_timestamp() {
        // newest-first, so the last element is the oldest
        let rows: Vec<_> = (0..20).map(message_at).collect();

        let cursor = page_cursor(&rows, 20);
        assert_eq!(cursor, Some(rows.last().unwrap().created_at));
    }

    #[test]
    fn test_short_page_ends_pagination() {
        let rows: Vec<_> = (0..5).map(message_at).collect();

        assert_eq!(page_cursor(&rows, 20), None);
    }

    #[test]
    fn test_empty_page_ends_pagination() {
        assert_eq!(page_cursor(&[], 20), None);
    }

    #[test]
    fn test_two_pages_cover_25_messages_exactly_once() {
        // 25 messages, strictly increasing timestamps; page of 20 then the
        // cursor-follow-up must cover all of them exactly once, ascending
        let mut all: Vec<_> = (0..25).map(message_at).collect();
        all.sort_by_key(|m| m.created_at);

        let mut newest_first = all.clone();
        newest_first.reverse();

        let page1: Vec<_> = newest_first.iter().take(20).cloned().collect();
        let cursor1 = page_cursor(&page1, 20).expect("first page is full");

        let page2: Vec<_> = newest_first
            .iter()
            .filter(|m| m.created_at < cursor1)
            .take(20)
            .cloned()
            .collect();
        let cursor2 = page_cursor(&page2, 20);

        assert_eq!(page2.len(), 5);
        assert_eq!(cursor2, None);

        let mut combined: Vec<_> = page2.iter().rev().chain(page1.iter().rev()).cloned().collect();
        combined.dedup_by_key(|m| m.id);

        assert_eq!(combined.len(), 25);
        let expected_ids: Vec<_> = all.iter().map(|m| m.id).collect();
        let got_ids: Vec<_> = combined.iter().map(|m| m.id).collect();
        assert_eq!(got_ids, expected_ids);
    }
}
