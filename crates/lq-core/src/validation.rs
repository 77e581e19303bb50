use crate::error::{GoalError, ProfileError};
use crate::types::Goal;

/// Rejects goals with a blank title or profession. The catalog would accept
/// them and fall back to generic skills, which hides a form input mistake.
pub fn validate_goal(goal: &Goal) -> Result<(), GoalError> {
    if goal.profession.trim().is_empty() {
        return Err(GoalError::MalformedGoal { field: "profession" });
    }
    if goal.title.trim().is_empty() {
        return Err(GoalError::MalformedGoal { field: "title" });
    }
    Ok(())
}

pub fn validate_display_name(name: &str) -> Result<(), ProfileError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ProfileError::InvalidInput {
            message: "display name must not be empty".to_string(),
        });
    }
    if trimmed.chars().count() > 64 {
        return Err(ProfileError::InvalidInput {
            message: "display name must be at most 64 characters".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_profession_is_malformed() {
        let goal = Goal::new("Learn", "  ");
        assert_eq!(
            validate_goal(&goal),
            Err(GoalError::MalformedGoal { field: "profession" })
        );
    }

    #[test]
    fn blank_title_is_malformed() {
        let goal = Goal::new("", "astronaut");
        assert_eq!(
            validate_goal(&goal),
            Err(GoalError::MalformedGoal { field: "title" })
        );
    }

    #[test]
    fn unmatched_profession_is_still_valid() {
        assert!(validate_goal(&Goal::new("Reach orbit", "astronaut")).is_ok());
    }

    #[test]
    fn display_name_bounds() {
        assert!(validate_display_name("Ada").is_ok());
        assert!(validate_display_name(" ").is_err());
        assert!(validate_display_name(&"x".repeat(65)).is_err());
    }
}
