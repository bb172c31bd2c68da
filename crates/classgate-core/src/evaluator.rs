//! Session window evaluation
//!
//! Decides, for one session at one instant, whether it is live, whether the
//! join window is open, and what countdown to show. Every function here is
//! pure: the caller supplies `now`, nothing is cached, and malformed sessions
//! evaluate to "not live, not joinable, no countdown" instead of failing.

use chrono::{DateTime, Utc};
use classgate_api::EvaluationResult;
use classgate_config::WindowPolicy;

use crate::Session;

/// Evaluates sessions against a [`WindowPolicy`].
///
/// The default policy opens joining 10 minutes before the start, keeps it
/// open until 30 minutes after the end, and shows countdowns for starts at
/// most 7 days away.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionWindowEvaluator {
    policy: WindowPolicy,
}

impl SessionWindowEvaluator {
    pub fn new(policy: WindowPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &WindowPolicy {
        &self.policy
    }

    /// True iff `start <= now <= end`
    pub fn is_live(&self, session: &Session, now: DateTime<Utc>) -> bool {
        match session.window() {
            Some((start, end)) => now >= start && now <= end,
            None => false,
        }
    }

    /// True iff `start - join_lead <= now <= end + join_grace`.
    ///
    /// Describes the time window only; whether a join link exists is the
    /// caller's concern (see [`SessionWindowEvaluator::action`]).
    pub fn can_join(&self, session: &Session, now: DateTime<Utc>) -> bool {
        match self.join_window(session) {
            Some((opens, closes)) => now >= opens && now <= closes,
            None => false,
        }
    }

    /// Countdown until the start, e.g. `"2d 4h"`, `"3h 5m"` or `"12m"`.
    ///
    /// `None` once the session has started, when the start is further away
    /// than the countdown horizon, or when either end of the window is unknown.
    pub fn countdown_label(&self, session: &Session, now: DateTime<Utc>) -> Option<String> {
        let (start, _) = session.window()?;
        if now >= start {
            return None;
        }

        let diff = start.signed_duration_since(now);
        if diff > self.policy.countdown_horizon {
            return None;
        }

        Some(classgate_util::format_countdown(diff))
    }

    /// All three derivations at once
    pub fn evaluate(&self, session: &Session, now: DateTime<Utc>) -> EvaluationResult {
        EvaluationResult {
            is_live: self.is_live(session, now),
            can_join: self.can_join(session, now),
            countdown_label: self.countdown_label(session, now),
        }
    }

    /// The instants at which joining opens and closes.
    ///
    /// Saturates at the representable range so the join window always
    /// contains the live window.
    pub fn join_window(&self, session: &Session) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let (start, end) = session.window()?;
        let opens = start
            .checked_sub_signed(self.policy.join_lead)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let closes = end
            .checked_add_signed(self.policy.join_grace)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Some((opens, closes))
    }
}

/// [`SessionWindowEvaluator::is_live`] with the default policy
pub fn is_live(session: &Session, now: DateTime<Utc>) -> bool {
    SessionWindowEvaluator::default().is_live(session, now)
}

/// [`SessionWindowEvaluator::can_join`] with the default policy
pub fn can_join(session: &Session, now: DateTime<Utc>) -> bool {
    SessionWindowEvaluator::default().can_join(session, now)
}

/// [`SessionWindowEvaluator::countdown_label`] with the default policy
pub fn countdown_label(session: &Session, now: DateTime<Utc>) -> Option<String> {
    SessionWindowEvaluator::default().countdown_label(session, now)
}

/// [`SessionWindowEvaluator::evaluate`] with the default policy
pub fn evaluate(session: &Session, now: DateTime<Utc>) -> EvaluationResult {
    SessionWindowEvaluator::default().evaluate(session, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap()
    }

    fn session(start: DateTime<Utc>, end: DateTime<Utc>) -> Session {
        Session::new("s", Some(start), Some(end))
    }

    #[test]
    fn upcoming_in_two_hours() {
        let s = session(t0() + Duration::hours(2), t0() + Duration::hours(3));

        assert_eq!(countdown_label(&s, t0()).as_deref(), Some("2h 0m"));
        assert!(!is_live(&s, t0()));
        assert!(!can_join(&s, t0()));
    }

    #[test]
    fn five_minutes_in() {
        let s = session(t0(), t0() + Duration::hours(1));
        let now = t0() + Duration::minutes(5);

        assert_eq!(
            evaluate(&s, now),
            EvaluationResult {
                is_live: true,
                can_join: true,
                countdown_label: None,
            }
        );
    }

    #[test]
    fn grace_period_after_end() {
        let s = session(t0(), t0() + Duration::hours(1));
        let now = t0() + Duration::minutes(80);

        assert!(!is_live(&s, now));
        assert!(can_join(&s, now));
    }

    #[test]
    fn missing_start_is_closed() {
        let s = Session::new("s", None, Some(t0()));

        for offset in [-10_000, -60, 0, 60, 10_000] {
            let now = t0() + Duration::minutes(offset);
            assert_eq!(evaluate(&s, now), EvaluationResult::default());
        }
    }

    #[test]
    fn missing_end_is_closed() {
        let s = Session::new("s", Some(t0()), None);

        assert!(!is_live(&s, t0()));
        assert!(!can_join(&s, t0()));
        assert_eq!(countdown_label(&s, t0() - Duration::minutes(90)), None);
    }

    #[test]
    fn live_boundaries_are_inclusive() {
        let s = session(t0(), t0() + Duration::hours(1));

        assert!(is_live(&s, t0()));
        assert_eq!(countdown_label(&s, t0()), None);
        assert!(is_live(&s, t0() + Duration::hours(1)));
        assert!(!is_live(&s, t0() - Duration::seconds(1)));
        assert!(!is_live(&s, t0() + Duration::hours(1) + Duration::seconds(1)));
    }

    #[test]
    fn join_boundaries_are_inclusive() {
        let end = t0() + Duration::hours(1);
        let s = session(t0(), end);

        assert!(can_join(&s, t0() - Duration::minutes(10)));
        assert!(!can_join(&s, t0() - Duration::minutes(10) - Duration::seconds(1)));
        assert!(can_join(&s, end + Duration::minutes(30)));
        assert!(!can_join(&s, end + Duration::minutes(30) + Duration::seconds(1)));
    }

    #[test]
    fn early_entry_shows_countdown() {
        let s = session(t0(), t0() + Duration::hours(1));
        let now = t0() - Duration::minutes(5);

        assert!(can_join(&s, now));
        assert!(!is_live(&s, now));
        assert_eq!(countdown_label(&s, now).as_deref(), Some("5m"));
    }

    #[test]
    fn live_implies_joinable() {
        let s = session(t0(), t0() + Duration::minutes(45));

        for minute in -120..=120 {
            let now = t0() + Duration::minutes(minute);
            if is_live(&s, now) {
                assert!(can_join(&s, now), "live but not joinable at {}m", minute);
            }
        }
    }

    #[test]
    fn countdown_horizon() {
        let s = session(t0(), t0() + Duration::hours(1));

        // Exactly seven days out still counts down
        assert_eq!(countdown_label(&s, t0() - Duration::days(7)).as_deref(), Some("7d 0h"));
        assert_eq!(
            countdown_label(&s, t0() - Duration::days(7) - Duration::seconds(1)),
            None
        );
        assert_eq!(countdown_label(&s, t0() - Duration::days(30)), None);
    }

    #[test]
    fn countdown_truncates() {
        let s = session(t0(), t0() + Duration::hours(1));

        let now = t0() - (Duration::days(2) + Duration::hours(5) + Duration::minutes(59));
        assert_eq!(countdown_label(&s, now).as_deref(), Some("2d 5h"));

        let now = t0() - (Duration::hours(23) + Duration::minutes(59) + Duration::seconds(59));
        assert_eq!(countdown_label(&s, now).as_deref(), Some("23h 59m"));

        let now = t0() - Duration::seconds(59);
        assert_eq!(countdown_label(&s, now).as_deref(), Some("0m"));

        let now = t0() - Duration::milliseconds(1);
        assert_eq!(countdown_label(&s, now).as_deref(), Some("0m"));
    }

    #[test]
    fn custom_policy() {
        let evaluator = SessionWindowEvaluator::new(WindowPolicy {
            join_lead: Duration::minutes(0),
            join_grace: Duration::minutes(5),
            countdown_horizon: Duration::days(1),
        });
        let s = session(t0(), t0() + Duration::hours(1));

        assert!(!evaluator.can_join(&s, t0() - Duration::minutes(1)));
        assert!(evaluator.can_join(&s, t0() + Duration::minutes(65)));
        assert!(!evaluator.can_join(&s, t0() + Duration::minutes(66)));
        assert_eq!(evaluator.countdown_label(&s, t0() - Duration::days(2)), None);
    }

    #[test]
    fn inverted_window_is_never_live() {
        let s = session(t0(), t0() - Duration::hours(1));

        assert!(!is_live(&s, t0()));
        assert!(!is_live(&s, t0() - Duration::minutes(30)));
    }

    #[test]
    fn extreme_timestamps_saturate() {
        let s = session(DateTime::<Utc>::MIN_UTC, DateTime::<Utc>::MAX_UTC);

        assert!(is_live(&s, t0()));
        assert!(can_join(&s, t0()));
        assert_eq!(countdown_label(&s, t0()), None);
        assert_eq!(
            SessionWindowEvaluator::default().join_window(&s),
            Some((DateTime::<Utc>::MIN_UTC, DateTime::<Utc>::MAX_UTC))
        );
    }

    #[test]
    fn live_at_the_end_of_time_is_joinable() {
        let end = DateTime::<Utc>::MAX_UTC;
        let s = session(t0(), end);

        for now in [t0(), t0() + Duration::hours(1), end] {
            assert!(is_live(&s, now));
            assert!(can_join(&s, now));
        }

        let s = session(DateTime::<Utc>::MIN_UTC, t0());
        assert!(is_live(&s, DateTime::<Utc>::MIN_UTC));
        assert!(can_join(&s, DateTime::<Utc>::MIN_UTC));
    }
}
