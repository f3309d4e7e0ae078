use actix::Addr;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::modules::realtime::events::BroadcastToRoom;
use crate::modules::realtime::message::ServerMessage;
use crate::modules::realtime::server::RealtimeServer;
use crate::modules::typing::repository::TypingRepository;
use crate::modules::typing::schema::TypingUserRow;

/// A typing row older than this is stale and excluded from reads.
pub const TYPING_FRESHNESS_MS: i64 = 3000;

/// Read-time freshness filter. Stale rows stay in the store until the next
/// explicit clear or overwrite; they just stop being reported.
fn filter_fresh(
    rows: Vec<TypingUserRow>,
    now: chrono::DateTime<chrono::Utc>,
) -> Vec<TypingUserRow> {
    rows.into_iter()
        .filter(|row| {
            (now - row.last_typed_at).num_milliseconds() < TYPING_FRESHNESS_MS
        })
        .collect()
}

#[derive(Clone)]
pub struct TypingService<R>
where
    R: TypingRepository + Send + Sync,
{
    typing_repo: Arc<R>,
    realtime: Arc<Addr<RealtimeServer>>,
}

impl<R> TypingService<R>
where
    R: TypingRepository + Send + Sync,
{
    pub fn with_dependencies(typing_repo: Arc<R>, realtime: Arc<Addr<RealtimeServer>>) -> Self {
        TypingService { typing_repo, realtime }
    }

    pub async fn set_typing(
        &self,
        conversation_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), error::SystemError> {
        self.typing_repo.upsert(&conversation_id, &user_id).await?;

        self.realtime.do_send(BroadcastToRoom {
            conversation_id,
            message: ServerMessage::UserTyping { conversation_id, user_id },
            skip_user_id: Some(user_id),
        });

        Ok(())
    }

    pub async fn get_typing_users(
        &self,
        conversation_id: Uuid,
    ) -> Result<Vec<TypingUserRow>, error::SystemError> {
        let rows = self.typing_repo.find_by_conversation(&conversation_id).await?;
        Ok(filter_fresh(rows, chrono::Utc::now()))
    }

    pub async fn clear_typing(
        &self,
        conversation_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), error::SystemError> {
        self.typing_repo.clear(&conversation_id, &user_id).await?;

        self.realtime.do_send(BroadcastToRoom {
            conversation_id,
            message: ServerMessage::UserStoppedTyping { conversation_id, user_id },
            skip_user_id: Some(user_id),
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn row_typed_at(at: chrono::DateTime<chrono::Utc>) -> TypingUserRow {
        TypingUserRow {
            user_id: Uuid::now_v7(),
            display_name: "someone".to_string(),
            avatar_url: None,
            last_typed_at: at,
        }
    }

    #[test]
    fn test_fresh_row_is_reported() {
        let now = Utc::now();
        let rows = vec![row_typed_at(now - Duration::milliseconds(500))];

        assert_eq!(filter_fresh(rows, now).len(), 1);
    }

    #[test]
    fn test_stale_row_is_filtered() {
        // 3100ms of simulated time passing: the row still exists but is no
        // longer reported
        let now = Utc::now();
        let rows = vec![row_typed_at(now - Duration::milliseconds(3100))];

        assert!(filter_fresh(rows, now).is_empty());
    }

    #[test]
    fn test_boundary_is_exclusive() {
        // exactly 3000ms is already stale
        let now = Utc::now();
        let rows = vec![row_typed_at(now - Duration::milliseconds(TYPING_FRESHNESS_MS))];

        assert!(filter_fresh(rows, now).is_empty());
    }

    #[test]
    fn test_refresh_makes_user_reappear() {
        let now = Utc::now();
        let user_id = Uuid::now_v7();

        let mut row = row_typed_at(now - Duration::milliseconds(3100));
        row.user_id = user_id;
        assert!(filter_fresh(vec![row.clone()], now).is_empty());

        // a fresh set_typing overwrites last_typed_at
        row.last_typed_at = now;
        let fresh = filter_fresh(vec![row], now);
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].user_id, user_id);
    }

    #[test]
    fn test_mixed_rows_keep_only_fresh() {
        let now = Utc::now();
        let rows = vec![
            row_typed_at(now - Duration::milliseconds(100)),
            row_typed_at(now - Duration::milliseconds(2999)),
            row_typed_at(now - Duration::milliseconds(5000)),
        ];

        assert_eq!(filter_fresh(rows, now).len(), 2);
    }
}
