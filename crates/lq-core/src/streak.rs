use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakUpdate {
    pub streak_days: u32,
    pub last_active_on: NaiveDate,
    pub changed: bool,
}

/// Advances a daily activity streak. Activity on the same day keeps it,
/// activity on the next day extends it, anything else restarts it at one.
/// A `today` earlier than the last recorded day is ignored.
pub fn advance_streak(
    streak_days: u32,
    last_active_on: Option<NaiveDate>,
    today: NaiveDate,
) -> StreakUpdate {
    let unchanged = |last| StreakUpdate {
        streak_days,
        last_active_on: last,
        changed: false,
    };
    let next = match last_active_on {
        Some(last) if today < last => return unchanged(last),
        Some(last) if today == last && streak_days > 0 => return unchanged(last),
        Some(last) if last.succ_opt() == Some(today) => streak_days.saturating_add(1),
        _ => 1,
    };
    StreakUpdate {
        streak_days: next,
        last_active_on: today,
        changed: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn first_activity_starts_at_one() {
        let update = advance_streak(0, None, day(1));
        assert_eq!(update.streak_days, 1);
        assert!(update.changed);
    }

    #[test]
    fn same_day_is_unchanged() {
        let update = advance_streak(4, Some(day(5)), day(5));
        assert_eq!(update.streak_days, 4);
        assert!(!update.changed);
    }

    #[test]
    fn consecutive_day_extends() {
        assert_eq!(advance_streak(4, Some(day(5)), day(6)).streak_days, 5);
    }

    #[test]
    fn gap_resets() {
        let update = advance_streak(9, Some(day(5)), day(8));
        assert_eq!(update.streak_days, 1);
        assert_eq!(update.last_active_on, day(8));
    }

    #[test]
    fn clock_going_backwards_is_ignored() {
        let update = advance_streak(3, Some(day(5)), day(4));
        assert_eq!(update.streak_days, 3);
        assert_eq!(update.last_active_on, day(5));
        assert!(!update.changed);
    }
}
