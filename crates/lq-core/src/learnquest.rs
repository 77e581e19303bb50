use crate::achievements::{earned, AchievementRepository, LearnerStats};
use crate::error::{LearnQuestError, ProfileError, RoadmapError, TokenError};
use crate::events::EventRepository;
use crate::generator::{PlaceholderVideos, RoadmapGenerator, VideoSource};
use crate::idempotency::{request_hash, IdempotencyRecord, IdempotencyRepository};
use crate::profiles::ProfileRepository;
use crate::progress::{self, SkillChange};
use crate::roadmaps::RoadmapRepository;
use crate::store::Store;
use crate::streak::advance_streak;
use crate::tokens;
use crate::types::{
    Achievement, ContentFormat, CreateProfileInput, CreateRoadmapInput, EventBody, Roadmap,
    RoadmapId, RoadmapProgress, SkillId, SkillProgress, Tier, UserId, UserProfile, VideoId,
};
use crate::validation::{validate_display_name, validate_goal};
use chrono::{DateTime, Duration, Utc};
use lq_events::bus::EventBus;
use lq_events::types::{EventRecord, EventSource};

#[derive(Debug, Clone)]
pub struct RequestContext {
    pub source: EventSource,
    pub correlation_id: Option<String>,
    pub idempotency_key: Option<String>,
}

impl RequestContext {
    pub fn new(source: EventSource, correlation_id: Option<String>) -> Self {
        Self {
            source,
            correlation_id,
            idempotency_key: None,
        }
    }

    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LearnQuestOptions {
    /// Balance given to a profile created without an explicit one.
    pub starting_tokens: u32,
    pub idempotency_ttl: Duration,
}

impl Default for LearnQuestOptions {
    fn default() -> Self {
        Self {
            starting_tokens: 1000,
            idempotency_ttl: Duration::hours(24),
        }
    }
}

type DynVideoSource = Box<dyn VideoSource + Send + Sync>;

pub struct LearnQuest<S: Store> {
    store: S,
    event_bus: EventBus,
    generator: RoadmapGenerator<DynVideoSource>,
    options: LearnQuestOptions,
}

impl<S: Store> LearnQuest<S> {
    pub fn new(store: S, event_bus: EventBus) -> Self {
        Self::with_options(store, event_bus, LearnQuestOptions::default())
    }

    pub fn with_options(store: S, event_bus: EventBus, options: LearnQuestOptions) -> Self {
        let source: DynVideoSource = Box::new(PlaceholderVideos);
        Self {
            store,
            event_bus,
            generator: RoadmapGenerator::with_source(source),
            options,
        }
    }

    pub fn with_video_source(mut self, source: impl VideoSource + Send + Sync + 'static) -> Self {
        let source: DynVideoSource = Box::new(source);
        self.generator = RoadmapGenerator::with_source(source);
        self
    }

    pub fn profiles(&self) -> ProfilesApi<'_, S> {
        ProfilesApi { core: self }
    }

    pub fn roadmaps(&self) -> RoadmapsApi<'_, S> {
        RoadmapsApi { core: self }
    }

    pub fn tokens(&self) -> TokensApi<'_, S> {
        TokensApi { core: self }
    }

    pub fn events(&self) -> EventsApi<'_, S> {
        EventsApi { core: self }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn options(&self) -> &LearnQuestOptions {
        &self.options
    }

    fn with_events<T, F>(&self, ctx: &RequestContext, f: F) -> Result<T, LearnQuestError>
    where
        F: FnOnce(&S) -> Result<(T, Vec<EventBody>), LearnQuestError>,
    {
        let (value, records, unlocked) = self.store.with_tx(|store| {
            let (value, bodies) = f(store)?;
            let mut records = Vec::new();
            let mut unlocked = Vec::new();
            for body in bodies {
                if let EventBody::AchievementUnlocked {
                    user_id,
                    achievement,
                } = &body
                {
                    unlocked.push((user_id.clone(), *achievement));
                }
                let record = build_event_record(ctx, body)?;
                let record = store.events().append(record)?;
                records.push(record);
            }
            Ok((value, records, unlocked))
        })?;
        for (user_id, achievement) in unlocked {
            tracing::info!(user_id = %user_id, achievement = %achievement, "achievement unlocked");
        }
        for record in records {
            if let Err(err) = self.event_bus.publish(record) {
                tracing::debug!(seq = err.0.seq, "event not delivered: no subscribers");
            }
        }
        Ok(value)
    }
}

pub struct ProfilesApi<'a, S: Store> {
    core: &'a LearnQuest<S>,
}

impl<'a, S: Store> ProfilesApi<'a, S> {
    pub fn create(
        &self,
        ctx: &RequestContext,
        input: CreateProfileInput,
    ) -> Result<UserProfile, LearnQuestError> {
        validate_display_name(&input.display_name)?;
        let starting_tokens = input
            .starting_tokens
            .unwrap_or(self.core.options.starting_tokens);
        let profile = self.core.with_events(ctx, |store| {
            let id = self.core.generator.ids().user_id();
            let profile = store.profiles().create(
                id,
                input.display_name.trim().to_string(),
                starting_tokens,
            )?;
            Ok((
                profile.clone(),
                vec![EventBody::ProfileCreated { profile }],
            ))
        })?;
        tracing::info!(user_id = %profile.id, tokens = starting_tokens, "profile created");
        Ok(profile)
    }

    pub fn get(&self, id: &UserId) -> Result<UserProfile, LearnQuestError> {
        self.core
            .store
            .profiles()
            .get(id)?
            .ok_or(LearnQuestError::Profile(ProfileError::NotFound))
    }

    pub fn list(&self) -> Result<Vec<UserProfile>, LearnQuestError> {
        self.core
            .store
            .profiles()
            .list()
            .map_err(LearnQuestError::from)
    }

    pub fn grant(
        &self,
        ctx: &RequestContext,
        id: &UserId,
        amount: u32,
    ) -> Result<UserProfile, LearnQuestError> {
        if amount == 0 {
            return Err(ProfileError::InvalidInput {
                message: "grant amount must be positive".to_string(),
            }
            .into());
        }
        let profile = self.core.with_events(ctx, |store| {
            let current = store.profiles().get(id)?.ok_or(ProfileError::NotFound)?;
            tokens::credit(current.tokens, amount)?;
            let profile = store.profiles().credit(id, amount)?;
            let event = EventBody::TokensGranted {
                user_id: id.clone(),
                amount,
                balance: profile.tokens,
            };
            Ok((profile, vec![event]))
        })?;
        tracing::info!(user_id = %id, amount, balance = profile.tokens, "tokens granted");
        Ok(profile)
    }

    pub fn achievements(&self, id: &UserId) -> Result<Vec<Achievement>, LearnQuestError> {
        self.get(id)?;
        self.core.store.achievements().list(id)
    }
}

pub struct TokensApi<'a, S: Store> {
    core: &'a LearnQuest<S>,
}

impl<'a, S: Store> TokensApi<'a, S> {
    pub fn quote(&self, tier: Tier, format: ContentFormat) -> u32 {
        tokens::quote_cost(tier, format)
    }

    pub fn can_afford(
        &self,
        id: &UserId,
        tier: Tier,
        format: ContentFormat,
    ) -> Result<bool, LearnQuestError> {
        let profile = self.core.profiles().get(id)?;
        Ok(tokens::can_afford(
            profile.tokens,
            tokens::quote_cost(tier, format),
        ))
    }
}

pub struct RoadmapsApi<'a, S: Store> {
    core: &'a LearnQuest<S>,
}

impl<'a, S: Store> RoadmapsApi<'a, S> {
    /// Charges the owner and persists a freshly generated roadmap in one
    /// transaction. Either both happen or neither does.
    ///
    /// With an idempotency key on `ctx`, a retry of the same request returns
    /// the roadmap created the first time without charging again.
    pub fn create(
        &self,
        ctx: &RequestContext,
        user_id: &UserId,
        input: CreateRoadmapInput,
    ) -> Result<Roadmap, LearnQuestError> {
        validate_goal(&input.goal)?;
        let cost = tokens::quote_cost(input.tier, input.format);
        let fingerprint = match ctx.idempotency_key {
            Some(_) => Some(request_hash(&input)?),
            None => None,
        };
        let now = Utc::now();

        let result = self.core.with_events(ctx, |store| {
            let profile = store
                .profiles()
                .get(user_id)?
                .ok_or(ProfileError::NotFound)?;

            if let (Some(key), Some(hash)) = (ctx.idempotency_key.as_deref(), &fingerprint) {
                let live = store
                    .idempotency()
                    .get(key, user_id)?
                    .filter(|record| record.expires_at >= now);
                if let Some(record) = live {
                    if &record.request_hash != hash {
                        return Err(RoadmapError::Conflict {
                            message: format!("idempotency key {key} was used for another request"),
                        }
                        .into());
                    }
                    let roadmap = store
                        .roadmaps()
                        .get(&record.roadmap_id)?
                        .ok_or(RoadmapError::NotFound)?;
                    return Ok(((roadmap, true), Vec::new()));
                }
            }

            tokens::charge(profile.tokens, cost)?;
            let balance = store
                .profiles()
                .try_debit(user_id, cost)?
                .ok_or(TokenError::InsufficientTokens {
                    balance: profile.tokens,
                    cost,
                })?;

            let roadmap = self.core.generator.generate(user_id, &input, cost);
            store.roadmaps().insert(&roadmap)?;

            if let (Some(key), Some(hash)) = (ctx.idempotency_key.as_deref(), fingerprint) {
                store.idempotency().insert(&IdempotencyRecord {
                    key: key.to_string(),
                    user_id: user_id.clone(),
                    request_hash: hash,
                    roadmap_id: roadmap.id.clone(),
                    created_at: now,
                    expires_at: now + self.core.options.idempotency_ttl,
                })?;
            }

            let mut events = vec![
                EventBody::RoadmapCreated {
                    roadmap_id: roadmap.id.clone(),
                    user_id: user_id.clone(),
                    profession: roadmap.goal.profession.clone(),
                    skill_count: roadmap.skills.len(),
                },
                EventBody::TokensCharged {
                    user_id: user_id.clone(),
                    roadmap_id: roadmap.id.clone(),
                    cost,
                    balance,
                },
            ];
            unlock_achievements(store, user_id, profile.streak_days, now, &mut events)?;
            Ok(((roadmap, false), events))
        });

        match result {
            Ok((roadmap, true)) => {
                tracing::info!(roadmap_id = %roadmap.id, user_id = %user_id, "roadmap create replayed");
                Ok(roadmap)
            }
            Ok((roadmap, false)) => {
                tracing::info!(
                    roadmap_id = %roadmap.id,
                    user_id = %user_id,
                    cost,
                    skills = roadmap.skills.len(),
                    "roadmap created"
                );
                Ok(roadmap)
            }
            Err(LearnQuestError::Token(err)) => {
                tracing::warn!(user_id = %user_id, cost, "roadmap rejected: {err}");
                Err(err.into())
            }
            Err(err) => Err(err),
        }
    }

    pub fn get(&self, id: &RoadmapId) -> Result<Roadmap, LearnQuestError> {
        self.core
            .store
            .roadmaps()
            .get(id)?
            .ok_or(LearnQuestError::Roadmap(RoadmapError::NotFound))
    }

    pub fn list(&self, user_id: &UserId) -> Result<Vec<Roadmap>, LearnQuestError> {
        self.core
            .store
            .roadmaps()
            .list_for_user(user_id)
            .map_err(LearnQuestError::from)
    }

    pub fn progress(&self, id: &RoadmapId) -> Result<RoadmapProgress, LearnQuestError> {
        let roadmap = self.get(id)?;
        Ok(progress::summarize(&roadmap))
    }

    pub fn set_skill_progress(
        &self,
        ctx: &RequestContext,
        skill_id: &SkillId,
        value: SkillProgress,
    ) -> Result<Roadmap, LearnQuestError> {
        self.core.with_events(ctx, |store| {
            let roadmap_id = store
                .roadmaps()
                .find_by_skill(skill_id)?
                .ok_or(RoadmapError::SkillNotFound)?;
            let mut roadmap = load_roadmap(store, &roadmap_id)?;
            let now = Utc::now();
            let change = progress::set_skill_progress(&mut roadmap, skill_id, value, now)?;
            let mut events = Vec::new();
            if change.touched {
                push_skill_change(&roadmap, &change, &mut events);
                record_progress(store, &roadmap, now, &mut events)?;
            }
            tracing::debug!(
                roadmap_id = %roadmap.id,
                skill_id = %skill_id,
                completion = change.completion,
                "skill progress set"
            );
            Ok((roadmap, events))
        })
    }

    pub fn set_video_completed(
        &self,
        ctx: &RequestContext,
        video_id: &VideoId,
        completed: bool,
    ) -> Result<Roadmap, LearnQuestError> {
        self.core.with_events(ctx, |store| {
            let roadmap_id = store
                .roadmaps()
                .find_by_video(video_id)?
                .ok_or(RoadmapError::VideoNotFound)?;
            let mut roadmap = load_roadmap(store, &roadmap_id)?;
            let now = Utc::now();
            let change = progress::set_video_completed(&mut roadmap, video_id, completed, now)?;
            let mut events = Vec::new();
            if change.video_changed {
                events.push(EventBody::VideoCompletionChanged {
                    roadmap_id: roadmap.id.clone(),
                    skill_id: change.skill.skill_id.clone(),
                    video_id: video_id.clone(),
                    completed,
                    completion: change.skill.completion,
                });
            }
            if change.skill.touched {
                push_skill_change(&roadmap, &change.skill, &mut events);
                record_progress(store, &roadmap, now, &mut events)?;
            }
            tracing::debug!(
                roadmap_id = %roadmap.id,
                video_id = %video_id,
                completed,
                completion = change.skill.completion,
                "video completion set"
            );
            Ok((roadmap, events))
        })
    }
}

pub struct EventsApi<'a, S: Store> {
    core: &'a LearnQuest<S>,
}

impl<'a, S: Store> EventsApi<'a, S> {
    pub fn list(
        &self,
        after: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<EventRecord>, LearnQuestError> {
        self.core.store.events().list(after, limit)
    }
}

fn load_roadmap<S: Store>(store: &S, id: &RoadmapId) -> Result<Roadmap, LearnQuestError> {
    store
        .roadmaps()
        .get(id)?
        .ok_or(LearnQuestError::Roadmap(RoadmapError::NotFound))
}

fn push_skill_change(roadmap: &Roadmap, change: &SkillChange, events: &mut Vec<EventBody>) {
    if change.changed() {
        events.push(EventBody::SkillProgressChanged {
            roadmap_id: roadmap.id.clone(),
            skill_id: change.skill_id.clone(),
            from: change.from,
            to: change.to,
            completion: change.completion,
        });
    }
}

/// Persists a progress change and its side effects: the owner's streak and
/// any achievements the change unlocks.
fn record_progress<S: Store>(
    store: &S,
    roadmap: &Roadmap,
    now: DateTime<Utc>,
    events: &mut Vec<EventBody>,
) -> Result<(), LearnQuestError> {
    store.roadmaps().update_progress(roadmap)?;
    let profile = store
        .profiles()
        .get(&roadmap.user_id)?
        .ok_or(ProfileError::NotFound)?;
    let update = advance_streak(profile.streak_days, profile.last_active_on, now.date_naive());
    if update.changed {
        store
            .profiles()
            .record_activity(&profile.id, update.streak_days, update.last_active_on)?;
        events.push(EventBody::StreakUpdated {
            user_id: profile.id.clone(),
            streak_days: update.streak_days,
        });
    }
    unlock_achievements(store, &profile.id, update.streak_days, now, events)
}

fn unlock_achievements<S: Store>(
    store: &S,
    user_id: &UserId,
    streak_days: u32,
    now: DateTime<Utc>,
    events: &mut Vec<EventBody>,
) -> Result<(), LearnQuestError> {
    let roadmaps = store.roadmaps().list_for_user(user_id)?;
    let stats = LearnerStats::collect(&roadmaps, streak_days);
    for kind in earned(&stats) {
        if store.achievements().unlock(user_id, kind, now)? {
            events.push(EventBody::AchievementUnlocked {
                user_id: user_id.clone(),
                achievement: kind,
            });
        }
    }
    Ok(())
}

fn build_event_record(
    ctx: &RequestContext,
    body: EventBody,
) -> Result<EventRecord, LearnQuestError> {
    let value = serde_json::to_value(body).map_err(LearnQuestError::internal)?;
    Ok(EventRecord {
        id: String::new(),
        seq: 0,
        at: Utc::now(),
        correlation_id: ctx.correlation_id.clone(),
        source: ctx.source,
        body: value,
    })
}
