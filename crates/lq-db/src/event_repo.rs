use crate::util::{decode_enum, decode_json, encode_enum, encode_json, from_rfc3339, to_rfc3339};
use lq_core::LearnQuestError;
use lq_core::events::EventRepository;
use lq_events::types::EventRecord;
use rusqlite::Connection;
use ulid::Ulid;

pub struct EventRepo<'a> {
    pub conn: &'a Connection,
}

impl<'a> EventRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl<'a> EventRepository for EventRepo<'a> {
    fn append(&self, mut event: EventRecord) -> Result<EventRecord, LearnQuestError> {
        event.seq = next_seq(self.conn)?;
        event.id = format!("evt_{}", Ulid::new());
        let sql = "INSERT INTO events (id, seq, at, correlation_id, source, body_json) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";
        let params = (
            event.id.clone(),
            event.seq,
            to_rfc3339(&event.at),
            event.correlation_id.clone(),
            encode_enum(&event.source).map_err(LearnQuestError::internal)?,
            encode_json(&event.body).map_err(LearnQuestError::internal)?,
        );
        self.conn
            .execute(sql, params)
            .map_err(LearnQuestError::internal)?;
        Ok(event)
    }

    fn list(
        &self,
        after: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<EventRecord>, LearnQuestError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, seq, at, correlation_id, source, body_json FROM events WHERE seq > ?1 ORDER BY seq ASC LIMIT ?2")
            .map_err(LearnQuestError::internal)?;
        // SQLite treats a negative LIMIT as unbounded
        let limit = limit.map(i64::from).unwrap_or(-1);
        let mut rows = stmt
            .query((after.unwrap_or(0), limit))
            .map_err(LearnQuestError::internal)?;
        let mut events = Vec::new();
        while let Some(row) = rows.next().map_err(LearnQuestError::internal)? {
            events.push(map_event_row(row)?);
        }
        Ok(events)
    }
}

fn map_event_row(row: &rusqlite::Row<'_>) -> Result<EventRecord, LearnQuestError> {
    let id: String = row.get(0).map_err(LearnQuestError::internal)?;
    let seq: i64 = row.get(1).map_err(LearnQuestError::internal)?;
    let at: String = row.get(2).map_err(LearnQuestError::internal)?;
    let correlation_id: Option<String> = row.get(3).map_err(LearnQuestError::internal)?;
    let source: String = row.get(4).map_err(LearnQuestError::internal)?;
    let body_json: String = row.get(5).map_err(LearnQuestError::internal)?;

    Ok(EventRecord {
        id,
        seq,
        at: from_rfc3339(&at).map_err(LearnQuestError::internal)?,
        correlation_id,
        source: decode_enum(&source).map_err(LearnQuestError::internal)?,
        body: decode_json(&body_json).map_err(LearnQuestError::internal)?,
    })
}

fn next_seq(conn: &Connection) -> Result<i64, LearnQuestError> {
    let seq: i64 = conn
        .query_row("SELECT COALESCE(MAX(seq), 0) FROM events", [], |row| {
            row.get(0)
        })
        .map_err(LearnQuestError::internal)?;
    Ok(seq + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::with_test_db;
    use lq_events::types::EventSource;

    fn record(kind: &str) -> EventRecord {
        EventRecord {
            id: String::new(),
            seq: 0,
            at: chrono::Utc::now(),
            correlation_id: Some("corr-1".to_string()),
            source: EventSource::Cli,
            body: serde_json::json!({ "type": kind, "payload": {} }),
        }
    }

    #[test]
    fn append_assigns_increasing_sequence() {
        let conn = with_test_db().unwrap();
        let repo = EventRepo::new(&conn);
        let first = repo.append(record("ProfileCreated")).unwrap();
        let second = repo.append(record("TokensGranted")).unwrap();
        assert_eq!(first.seq, 1);
        assert_eq!(second.seq, 2);
        assert!(first.id.starts_with("evt_"));
    }

    #[test]
    fn list_pages_by_sequence() {
        let conn = with_test_db().unwrap();
        let repo = EventRepo::new(&conn);
        for kind in ["A", "B", "C", "D"] {
            repo.append(record(kind)).unwrap();
        }
        assert_eq!(repo.list(None, None).unwrap().len(), 4);
        let page = repo.list(Some(1), Some(2)).unwrap();
        let kinds: Vec<_> = page.iter().filter_map(|e| e.kind()).collect();
        assert_eq!(kinds, vec!["B", "C"]);
        assert_eq!(page[0].correlation_id.as_deref(), Some("corr-1"));
    }
}
