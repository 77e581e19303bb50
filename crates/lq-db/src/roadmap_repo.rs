use crate::util::{decode_enum, decode_json, encode_enum, encode_json, from_rfc3339, to_rfc3339, to_u32};
use lq_core::LearnQuestError;
use lq_core::error::RoadmapError;
use lq_core::roadmaps::RoadmapRepository;
use lq_core::types::{
    Goal, Roadmap, RoadmapId, Skill, SkillId, UserId, VideoId, VideoResource,
};
use rusqlite::{Connection, OptionalExtension};

pub struct RoadmapRepo<'a> {
    pub conn: &'a Connection,
}

impl<'a> RoadmapRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

fn db_err(err: impl std::fmt::Display) -> LearnQuestError {
    LearnQuestError::internal(err)
}

fn count_to_sql(count: Option<u64>) -> Result<Option<i64>, LearnQuestError> {
    count.map(i64::try_from).transpose().map_err(db_err)
}

fn count_from_sql(count: Option<i64>) -> Result<Option<u64>, LearnQuestError> {
    count.map(u64::try_from).transpose().map_err(db_err)
}

impl<'a> RoadmapRepository for RoadmapRepo<'a> {
    fn insert(&self, roadmap: &Roadmap) -> Result<(), LearnQuestError> {
        let sql = "INSERT INTO roadmaps (id, user_id, title, profession, short_term_goals, long_term_goals, tier, format, cost, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)";
        let params = (
            roadmap.id.as_str(),
            roadmap.user_id.as_str(),
            roadmap.goal.title.as_str(),
            roadmap.goal.profession.as_str(),
            roadmap.goal.short_term_goals.as_deref(),
            roadmap.goal.long_term_goals.as_deref(),
            encode_enum(&roadmap.tier).map_err(db_err)?,
            encode_enum(&roadmap.format).map_err(db_err)?,
            roadmap.cost,
            to_rfc3339(&roadmap.created_at),
            to_rfc3339(&roadmap.updated_at),
        );
        self.conn.execute(sql, params).map_err(db_err)?;
        for (position, skill) in roadmap.skills.iter().enumerate() {
            insert_skill(self.conn, &roadmap.id, position, skill)?;
        }
        Ok(())
    }

    fn get(&self, id: &RoadmapId) -> Result<Option<Roadmap>, LearnQuestError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, user_id, title, profession, short_term_goals, long_term_goals, tier, format, cost, created_at, updated_at FROM roadmaps WHERE id = ?1")
            .map_err(db_err)?;
        let mut rows = stmt.query([id.as_str()]).map_err(db_err)?;
        let Some(row) = rows.next().map_err(db_err)? else {
            return Ok(None);
        };
        let mut roadmap = map_roadmap_row(row)?;
        roadmap.skills = load_skills(self.conn, &roadmap.id)?;
        Ok(Some(roadmap))
    }

    fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Roadmap>, LearnQuestError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id FROM roadmaps WHERE user_id = ?1 ORDER BY created_at ASC, id ASC")
            .map_err(db_err)?;
        let mut rows = stmt.query([user_id.as_str()]).map_err(db_err)?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next().map_err(db_err)? {
            let id: String = row.get(0).map_err(db_err)?;
            ids.push(RoadmapId::new(id).map_err(db_err)?);
        }
        let mut roadmaps = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(roadmap) = self.get(&id)? {
                roadmaps.push(roadmap);
            }
        }
        Ok(roadmaps)
    }

    fn update_progress(&self, roadmap: &Roadmap) -> Result<(), LearnQuestError> {
        let affected = self
            .conn
            .execute(
                "UPDATE roadmaps SET updated_at = ?1 WHERE id = ?2",
                (to_rfc3339(&roadmap.updated_at), roadmap.id.as_str()),
            )
            .map_err(db_err)?;
        if affected == 0 {
            return Err(RoadmapError::NotFound.into());
        }
        for skill in &roadmap.skills {
            self.conn
                .execute(
                    "UPDATE skills SET progress = ?1 WHERE id = ?2 AND roadmap_id = ?3",
                    (
                        encode_enum(&skill.progress).map_err(db_err)?,
                        skill.id.as_str(),
                        roadmap.id.as_str(),
                    ),
                )
                .map_err(db_err)?;
            for video in &skill.resources {
                self.conn
                    .execute(
                        "UPDATE videos SET completed = ?1 WHERE id = ?2 AND skill_id = ?3",
                        (video.completed, video.id.as_str(), skill.id.as_str()),
                    )
                    .map_err(db_err)?;
            }
        }
        Ok(())
    }

    fn find_by_skill(&self, skill_id: &SkillId) -> Result<Option<RoadmapId>, LearnQuestError> {
        let id: Option<String> = self
            .conn
            .query_row(
                "SELECT roadmap_id FROM skills WHERE id = ?1",
                [skill_id.as_str()],
                |row| row.get(0),
            )
            .optional()
            .map_err(db_err)?;
        id.map(RoadmapId::new).transpose().map_err(db_err)
    }

    fn find_by_video(&self, video_id: &VideoId) -> Result<Option<RoadmapId>, LearnQuestError> {
        let id: Option<String> = self
            .conn
            .query_row(
                "SELECT s.roadmap_id FROM videos v JOIN skills s ON s.id = v.skill_id WHERE v.id = ?1",
                [video_id.as_str()],
                |row| row.get(0),
            )
            .optional()
            .map_err(db_err)?;
        id.map(RoadmapId::new).transpose().map_err(db_err)
    }
}

fn insert_skill(
    conn: &Connection,
    roadmap_id: &RoadmapId,
    position: usize,
    skill: &Skill,
) -> Result<(), LearnQuestError> {
    let sql = "INSERT INTO skills (id, roadmap_id, position, name, description, level, category, progress, importance, prerequisites_json, estimated_time) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)";
    let params = (
        skill.id.as_str(),
        roadmap_id.as_str(),
        position as i64,
        skill.name.as_str(),
        skill.description.as_str(),
        encode_enum(&skill.level).map_err(db_err)?,
        encode_enum(&skill.category).map_err(db_err)?,
        encode_enum(&skill.progress).map_err(db_err)?,
        skill.importance,
        encode_json(&skill.prerequisites).map_err(db_err)?,
        skill.estimated_time_to_learn.as_deref(),
    );
    conn.execute(sql, params).map_err(db_err)?;
    for (position, video) in skill.resources.iter().enumerate() {
        insert_video(conn, &skill.id, position, video)?;
    }
    Ok(())
}

fn insert_video(
    conn: &Connection,
    skill_id: &SkillId,
    position: usize,
    video: &VideoResource,
) -> Result<(), LearnQuestError> {
    let sql = "INSERT INTO videos (id, skill_id, position, title, url, channel, duration_secs, published_at, thumbnail_url, difficulty, views, likes, completed) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)";
    let params = (
        video.id.as_str(),
        skill_id.as_str(),
        position as i64,
        video.title.as_str(),
        video.url.as_str(),
        video.channel.as_str(),
        video.duration_secs,
        to_rfc3339(&video.published_at),
        video.thumbnail_url.as_str(),
        encode_enum(&video.difficulty).map_err(db_err)?,
        count_to_sql(video.views)?,
        count_to_sql(video.likes)?,
        video.completed,
    );
    conn.execute(sql, params).map_err(db_err)?;
    Ok(())
}

fn load_skills(conn: &Connection, roadmap_id: &RoadmapId) -> Result<Vec<Skill>, LearnQuestError> {
    let mut stmt = conn
        .prepare("SELECT id, name, description, level, category, progress, importance, prerequisites_json, estimated_time FROM skills WHERE roadmap_id = ?1 ORDER BY position ASC")
        .map_err(db_err)?;
    let mut rows = stmt.query([roadmap_id.as_str()]).map_err(db_err)?;
    let mut skills = Vec::new();
    while let Some(row) = rows.next().map_err(db_err)? {
        skills.push(map_skill_row(row)?);
    }
    for skill in skills.iter_mut() {
        skill.resources = load_videos(conn, &skill.id)?;
    }
    Ok(skills)
}

fn load_videos(conn: &Connection, skill_id: &SkillId) -> Result<Vec<VideoResource>, LearnQuestError> {
    let mut stmt = conn
        .prepare("SELECT id, title, url, channel, duration_secs, published_at, thumbnail_url, difficulty, views, likes, completed FROM videos WHERE skill_id = ?1 ORDER BY position ASC")
        .map_err(db_err)?;
    let mut rows = stmt.query([skill_id.as_str()]).map_err(db_err)?;
    let mut videos = Vec::new();
    while let Some(row) = rows.next().map_err(db_err)? {
        videos.push(map_video_row(row)?);
    }
    Ok(videos)
}

fn map_roadmap_row(row: &rusqlite::Row<'_>) -> Result<Roadmap, LearnQuestError> {
    let id: String = row.get(0).map_err(db_err)?;
    let user_id: String = row.get(1).map_err(db_err)?;
    let title: String = row.get(2).map_err(db_err)?;
    let profession: String = row.get(3).map_err(db_err)?;
    let short_term_goals: Option<String> = row.get(4).map_err(db_err)?;
    let long_term_goals: Option<String> = row.get(5).map_err(db_err)?;
    let tier: String = row.get(6).map_err(db_err)?;
    let format: String = row.get(7).map_err(db_err)?;
    let cost: i64 = row.get(8).map_err(db_err)?;
    let created_at: String = row.get(9).map_err(db_err)?;
    let updated_at: String = row.get(10).map_err(db_err)?;

    Ok(Roadmap {
        id: RoadmapId::new(id).map_err(db_err)?,
        user_id: UserId::new(user_id).map_err(db_err)?,
        goal: Goal {
            title,
            profession,
            short_term_goals,
            long_term_goals,
        },
        tier: decode_enum(&tier).map_err(db_err)?,
        format: decode_enum(&format).map_err(db_err)?,
        cost: to_u32(cost).map_err(db_err)?,
        skills: Vec::new(),
        created_at: from_rfc3339(&created_at).map_err(db_err)?,
        updated_at: from_rfc3339(&updated_at).map_err(db_err)?,
    })
}

fn map_skill_row(row: &rusqlite::Row<'_>) -> Result<Skill, LearnQuestError> {
    let id: String = row.get(0).map_err(db_err)?;
    let name: String = row.get(1).map_err(db_err)?;
    let description: String = row.get(2).map_err(db_err)?;
    let level: String = row.get(3).map_err(db_err)?;
    let category: String = row.get(4).map_err(db_err)?;
    let progress: String = row.get(5).map_err(db_err)?;
    let importance: u8 = row.get(6).map_err(db_err)?;
    let prerequisites_json: String = row.get(7).map_err(db_err)?;
    let estimated_time: Option<String> = row.get(8).map_err(db_err)?;

    Ok(Skill {
        id: SkillId::new(id).map_err(db_err)?,
        name,
        description,
        level: decode_enum(&level).map_err(db_err)?,
        category: decode_enum(&category).map_err(db_err)?,
        progress: decode_enum(&progress).map_err(db_err)?,
        importance,
        prerequisites: decode_json(&prerequisites_json).map_err(db_err)?,
        resources: Vec::new(),
        estimated_time_to_learn: estimated_time,
    })
}

fn map_video_row(row: &rusqlite::Row<'_>) -> Result<VideoResource, LearnQuestError> {
    let id: String = row.get(0).map_err(db_err)?;
    let title: String = row.get(1).map_err(db_err)?;
    let url: String = row.get(2).map_err(db_err)?;
    let channel: String = row.get(3).map_err(db_err)?;
    let duration_secs: i64 = row.get(4).map_err(db_err)?;
    let published_at: String = row.get(5).map_err(db_err)?;
    let thumbnail_url: String = row.get(6).map_err(db_err)?;
    let difficulty: String = row.get(7).map_err(db_err)?;
    let views: Option<i64> = row.get(8).map_err(db_err)?;
    let likes: Option<i64> = row.get(9).map_err(db_err)?;
    let completed: bool = row.get(10).map_err(db_err)?;

    Ok(VideoResource {
        id: VideoId::new(id).map_err(db_err)?,
        title,
        url,
        channel,
        duration_secs: to_u32(duration_secs).map_err(db_err)?,
        published_at: from_rfc3339(&published_at).map_err(db_err)?,
        thumbnail_url,
        difficulty: decode_enum(&difficulty).map_err(db_err)?,
        views: count_from_sql(views)?,
        likes: count_from_sql(likes)?,
        completed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile_repo::ProfileRepo;
    use crate::schema::with_test_db;
    use lq_core::generator::RoadmapGenerator;
    use lq_core::profiles::ProfileRepository;
    use lq_core::progress;
    use lq_core::types::{ContentFormat, CreateRoadmapInput, IdGenerator, SkillProgress, Tier};

    fn seeded(conn: &Connection) -> Roadmap {
        let profile = ProfileRepo::new(conn)
            .create(IdGenerator::new().user_id(), "Ada".to_string(), 1000).unwrap();
        let input = CreateRoadmapInput {
            goal: Goal {
                title: "Learn Web Dev".to_string(),
                profession: "web developer".to_string(),
                short_term_goals: Some("ship a portfolio".to_string()),
                long_term_goals: None,
            },
            tier: Tier::Intermediate,
            format: ContentFormat::Long,
        };
        RoadmapGenerator::new().generate(&profile.id, &input, 450)
    }

    #[test]
    fn insert_and_get_preserves_order_and_fields() {
        let conn = with_test_db().unwrap();
        let roadmap = seeded(&conn);
        let repo = RoadmapRepo::new(&conn);
        repo.insert(&roadmap).unwrap();

        let loaded = repo.get(&roadmap.id).unwrap().unwrap();
        assert_eq!(loaded, roadmap);
        assert_eq!(loaded.skills[0].name, "HTML Fundamentals");
        assert_eq!(loaded.skills[1].prerequisites, vec!["HTML Fundamentals".to_string()]);
    }

    #[test]
    fn progress_updates_are_written_back() {
        let conn = with_test_db().unwrap();
        let mut roadmap = seeded(&conn);
        let repo = RoadmapRepo::new(&conn);
        repo.insert(&roadmap).unwrap();

        let skill = roadmap.skills[2].id.clone();
        progress::set_skill_progress(&mut roadmap, &skill, SkillProgress::Mastered, chrono::Utc::now())
            .unwrap();
        repo.update_progress(&roadmap).unwrap();

        let loaded = repo.get(&roadmap.id).unwrap().unwrap();
        assert_eq!(loaded.skills[2].progress, SkillProgress::Mastered);
        assert!(loaded.skills[2].resources.iter().all(|video| video.completed));
        assert_eq!(loaded.updated_at, roadmap.updated_at);
    }

    #[test]
    fn finds_owning_roadmap_by_child_ids() {
        let conn = with_test_db().unwrap();
        let roadmap = seeded(&conn);
        let repo = RoadmapRepo::new(&conn);
        repo.insert(&roadmap).unwrap();

        let skill = &roadmap.skills[4];
        assert_eq!(repo.find_by_skill(&skill.id).unwrap(), Some(roadmap.id.clone()));
        assert_eq!(
            repo.find_by_video(&skill.resources[1].id).unwrap(),
            Some(roadmap.id.clone())
        );
        assert_eq!(repo.list_for_user(&roadmap.user_id).unwrap().len(), 1);
    }

    #[test]
    fn oversized_view_counts_are_rejected() {
        let conn = with_test_db().unwrap();
        let mut roadmap = seeded(&conn);
        roadmap.skills[0].resources[0].views = Some(u64::MAX);
        assert!(matches!(
            RoadmapRepo::new(&conn).insert(&roadmap),
            Err(LearnQuestError::Internal { .. })
        ));
    }

    #[test]
    fn largest_storable_counts_round_trip() {
        let conn = with_test_db().unwrap();
        let mut roadmap = seeded(&conn);
        roadmap.skills[0].resources[0].views = Some(i64::MAX as u64);
        roadmap.skills[0].resources[0].likes = Some(42);
        let repo = RoadmapRepo::new(&conn);
        repo.insert(&roadmap).unwrap();

        let loaded = repo.get(&roadmap.id).unwrap().unwrap();
        assert_eq!(loaded.skills[0].resources[0].views, Some(i64::MAX as u64));
        assert_eq!(loaded.skills[0].resources[0].likes, Some(42));
    }

    #[test]
    fn missing_tables_surface_as_internal_errors() {
        let conn = with_test_db().unwrap();
        let roadmap = seeded(&conn);
        conn.execute_batch("DROP TABLE videos").unwrap();
        let repo = RoadmapRepo::new(&conn);

        let err = repo.insert(&roadmap).unwrap_err();
        assert!(matches!(err, LearnQuestError::Internal { .. }));
        assert!(err.to_string().contains("videos"));
    }

    #[test]
    fn progress_update_of_unknown_roadmap_is_not_found() {
        let conn = with_test_db().unwrap();
        let roadmap = seeded(&conn);
        let repo = RoadmapRepo::new(&conn);
        assert!(matches!(
            repo.update_progress(&roadmap),
            Err(LearnQuestError::Roadmap(RoadmapError::NotFound))
        ));
    }
}
