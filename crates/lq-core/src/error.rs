use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("insufficient tokens: balance {balance}, cost {cost}")]
    InsufficientTokens { balance: u32, cost: u32 },
    #[error("token balance overflow")]
    Overflow,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GoalError {
    #[error("malformed goal: {field} must not be empty")]
    MalformedGoal { field: &'static str },
}

#[derive(Debug, Error)]
pub enum RoadmapError {
    #[error("roadmap not found")]
    NotFound,
    #[error("skill not found")]
    SkillNotFound,
    #[error("video not found")]
    VideoNotFound,
    #[error("conflict: {message}")]
    Conflict { message: String },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("profile not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

#[derive(Debug, Error)]
pub enum LearnQuestError {
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Goal(#[from] GoalError),
    #[error(transparent)]
    Roadmap(#[from] RoadmapError),
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl LearnQuestError {
    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}
