use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;
use ulid::{Generator, Ulid};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RoadmapId(String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SkillId(String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct VideoId(String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    InvalidPrefix { expected: &'static str, got: String },
    InvalidUlid { value: String },
    InvalidFormat { value: String },
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPrefix { expected, got } => {
                write!(f, "invalid prefix: expected {expected}, got {got}")
            }
            Self::InvalidUlid { value } => write!(f, "invalid ulid: {value}"),
            Self::InvalidFormat { value } => write!(f, "invalid id format: {value}"),
        }
    }
}

impl std::error::Error for IdError {}

fn validate_prefixed(value: &str, prefix: &'static str) -> Result<(), IdError> {
    let Some(rest) = value.strip_prefix(prefix) else {
        let got = value.split('_').next().unwrap_or("").to_string();
        return Err(IdError::InvalidPrefix {
            expected: prefix,
            got,
        });
    };
    if rest.len() != 26 {
        return Err(IdError::InvalidFormat {
            value: value.to_string(),
        });
    }
    Ulid::from_str(rest).map_err(|_| IdError::InvalidUlid {
        value: value.to_string(),
    })?;
    Ok(())
}

macro_rules! id_type {
    ($name:ident, $prefix:expr) => {
        impl $name {
            pub const PREFIX: &'static str = $prefix;

            pub fn new(value: String) -> Result<Self, IdError> {
                validate_prefixed(&value, Self::PREFIX)?;
                Ok(Self(value))
            }

            fn from_ulid(ulid: Ulid) -> Self {
                Self(format!("{}{}", Self::PREFIX, ulid))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let value = String::deserialize(deserializer)?;
                Self::new(value).map_err(serde::de::Error::custom)
            }
        }
    };
}

id_type!(UserId, "user_");
id_type!(RoadmapId, "roadmap_");
id_type!(SkillId, "skill_");
id_type!(VideoId, "vid_");

/// Mints prefixed ULIDs that are strictly increasing within one generator,
/// so two ids from the same generator never collide.
pub struct IdGenerator {
    inner: Mutex<Generator>,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self {
            inner: Mutex::new(Generator::new()),
        }
    }
}

impl fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdGenerator").finish_non_exhaustive()
    }
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_ulid(&self) -> Ulid {
        let mut generator = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        loop {
            match generator.generate() {
                Ok(ulid) => return ulid,
                // random part exhausted within this millisecond
                Err(_) => std::thread::yield_now(),
            }
        }
    }

    pub fn user_id(&self) -> UserId {
        UserId::from_ulid(self.next_ulid())
    }

    pub fn roadmap_id(&self) -> RoadmapId {
        RoadmapId::from_ulid(self.next_ulid())
    }

    pub fn skill_id(&self) -> SkillId {
        SkillId::from_ulid(self.next_ulid())
    }

    pub fn video_id(&self) -> VideoId {
        VideoId::from_ulid(self.next_ulid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_ids_round_trip_through_parse() {
        let ids = IdGenerator::new();
        let skill = ids.skill_id();
        assert!(skill.as_str().starts_with("skill_"));
        assert_eq!(SkillId::from_str(skill.as_str()).unwrap(), skill);
    }

    #[test]
    fn generated_ids_are_strictly_increasing() {
        let ids = IdGenerator::new();
        let mut previous = ids.video_id();
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            let next = ids.video_id();
            assert!(next > previous);
            assert!(seen.insert(next.clone()));
            previous = next;
        }
    }

    #[test]
    fn rejects_wrong_prefix() {
        let ids = IdGenerator::new();
        let roadmap = ids.roadmap_id();
        let err = SkillId::new(roadmap.to_string()).unwrap_err();
        assert!(matches!(err, IdError::InvalidPrefix { expected: "skill_", .. }));
    }

    #[test]
    fn rejects_malformed_ulid() {
        assert!(matches!(
            UserId::new("user_short".to_string()),
            Err(IdError::InvalidFormat { .. })
        ));
        assert!(matches!(
            UserId::new(format!("user_{}", "!".repeat(26))),
            Err(IdError::InvalidUlid { .. })
        ));
    }
}
