use crate::LearnQuestError;
use crate::achievements::AchievementRepository;
use crate::events::EventRepository;
use crate::idempotency::IdempotencyRepository;
use crate::profiles::ProfileRepository;
use crate::roadmaps::RoadmapRepository;

pub trait Store {
    type Profiles<'a>: ProfileRepository
    where
        Self: 'a;
    type Roadmaps<'a>: RoadmapRepository
    where
        Self: 'a;
    type Achievements<'a>: AchievementRepository
    where
        Self: 'a;
    type Events<'a>: EventRepository
    where
        Self: 'a;
    type Idempotency<'a>: IdempotencyRepository
    where
        Self: 'a;

    fn profiles(&self) -> Self::Profiles<'_>;
    fn roadmaps(&self) -> Self::Roadmaps<'_>;
    fn achievements(&self) -> Self::Achievements<'_>;
    fn events(&self) -> Self::Events<'_>;
    fn idempotency(&self) -> Self::Idempotency<'_>;

    /// Runs `f` in one transaction: committed on `Ok`, rolled back on `Err`.
    fn with_tx<F, T>(&self, f: F) -> Result<T, LearnQuestError>
    where
        F: FnOnce(&Self) -> Result<T, LearnQuestError>;
}
