use lq_core::LearnQuestError;
use lq_core::store::Store;
use rusqlite::Connection;

use crate::achievement_repo::AchievementRepo;
use crate::event_repo::EventRepo;
use crate::idempotency::IdempotencyStore;
use crate::profile_repo::ProfileRepo;
use crate::roadmap_repo::RoadmapRepo;

pub struct DbStore {
    conn: Connection,
}

impl DbStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl Store for DbStore {
    type Profiles<'a>
        = ProfileRepo<'a>
    where
        Self: 'a;
    type Roadmaps<'a>
        = RoadmapRepo<'a>
    where
        Self: 'a;
    type Achievements<'a>
        = AchievementRepo<'a>
    where
        Self: 'a;
    type Events<'a>
        = EventRepo<'a>
    where
        Self: 'a;
    type Idempotency<'a>
        = IdempotencyStore<'a>
    where
        Self: 'a;

    fn profiles(&self) -> Self::Profiles<'_> {
        ProfileRepo::new(&self.conn)
    }

    fn roadmaps(&self) -> Self::Roadmaps<'_> {
        RoadmapRepo::new(&self.conn)
    }

    fn achievements(&self) -> Self::Achievements<'_> {
        AchievementRepo::new(&self.conn)
    }

    fn events(&self) -> Self::Events<'_> {
        EventRepo::new(&self.conn)
    }

    fn idempotency(&self) -> Self::Idempotency<'_> {
        IdempotencyStore::new(&self.conn)
    }

    fn with_tx<F, T>(&self, f: F) -> Result<T, LearnQuestError>
    where
        F: FnOnce(&Self) -> Result<T, LearnQuestError>,
    {
        self.conn
            .execute_batch("BEGIN IMMEDIATE")
            .map_err(LearnQuestError::internal)?;
        let result = f(self);
        match result {
            Ok(value) => {
                self.conn
                    .execute_batch("COMMIT")
                    .map_err(LearnQuestError::internal)?;
                Ok(value)
            }
            Err(err) => {
                self.conn
                    .execute_batch("ROLLBACK")
                    .map_err(LearnQuestError::internal)?;
                Err(err)
            }
        }
    }
}
