use serde::{Deserialize, Serialize};

/// What the learner wants to become. Persisted only inside its roadmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub title: String,
    pub profession: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_term_goals: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_term_goals: Option<String>,
}

impl Goal {
    pub fn new(title: impl Into<String>, profession: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            profession: profession.into(),
            short_term_goals: None,
            long_term_goals: None,
        }
    }
}
