pub mod achievements;
pub mod catalog;
pub mod error;
pub mod events;
pub mod generator;
pub mod idempotency;
pub mod learnquest;
pub mod profiles;
pub mod progress;
pub mod roadmaps;
pub mod store;
pub mod streak;
pub mod tokens;
pub mod validation;

pub mod types;

pub use crate::error::LearnQuestError;
pub use crate::learnquest::{LearnQuest, LearnQuestOptions, RequestContext};
pub use crate::store::Store;
