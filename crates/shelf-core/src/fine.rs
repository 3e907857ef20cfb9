//! # Fine Calculator
//!
//! ```text
//! overdue_days(due, now) = max(0, floor((now − due) / 1 day))
//! fine(due, now)         = overdue_days × FINE_PER_DAY
//! ```
//!
//! A partial day does not count: a book returned 23 hours late owes nothing.

use chrono::{DateTime, Utc};

use crate::FINE_PER_DAY;

/// Full days between `due` and `now`, never negative.
pub fn overdue_days(due: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    // num_days truncates toward zero, which is floor for the positive case
    // and zero-or-negative otherwise; the clamp handles the rest.
    (now - due).num_days().max(0)
}

/// Fine owed for a loan due at `due`, in whole currency units.
pub fn calculate_fine(due: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    overdue_days(due, now) * FINE_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 20, 18, 30, 0).unwrap()
    }

    #[test]
    fn test_not_yet_due_is_zero() {
        assert_eq!(calculate_fine(now() + Duration::days(3), now()), 0);
        assert_eq!(calculate_fine(now(), now()), 0);
    }

    #[test]
    fn test_whole_days_only() {
        assert_eq!(overdue_days(now() - Duration::hours(23), now()), 0);
        assert_eq!(overdue_days(now() - Duration::hours(24), now()), 1);
        assert_eq!(overdue_days(now() - Duration::hours(71), now()), 2);
    }

    #[test]
    fn test_formula_over_range() {
        for minutes in (-3 * 1440..10 * 1440).step_by(97) {
            let due = now() - Duration::minutes(minutes);
            let expected = if minutes <= 0 { 0 } else { minutes / 1440 };
            assert_eq!(calculate_fine(due, now()), expected * FINE_PER_DAY, "minutes={minutes}");
        }
    }
}
