//! Notification policy engine: per route and per tick, decide whether to
//! notify now and whether the "available" streak counter must be reset.
//!
//! Pure over its inputs; the orchestrator applies side effects (timestamps,
//! streak increments, cap-triggered route deletion).

use chrono::{DateTime, Timelike, Utc};

use crate::domain::{NotifyMode, RouteCheckState};

/// Outcome of one policy evaluation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PolicyDecision {
    pub send: bool,
    /// Reset the streak counter to zero before persisting anything else.
    pub reset_streak: bool,
}

/// Decision table:
///
/// - forced checks always send, bypassing all throttling;
/// - availability always sends (the cap is applied by the orchestrator);
/// - unavailable + `Always`: streak resets if active, then the 30-minute
///   boundary rule below decides;
/// - unavailable + `OnAvailable`: exactly one "tickets disappeared" send
///   when a streak was active, silence otherwise.
pub fn evaluate(
    available: bool,
    force_send: bool,
    mode: NotifyMode,
    state: &RouteCheckState,
    now: DateTime<Utc>,
) -> PolicyDecision {
    if force_send {
        return PolicyDecision {
            send: true,
            reset_streak: false,
        };
    }

    if available {
        return PolicyDecision {
            send: true,
            reset_streak: false,
        };
    }

    match mode {
        NotifyMode::Always => PolicyDecision {
            send: boundary_rule_sends(state.last_notified_at, now),
            reset_streak: state.notifications_sent > 0,
        },
        NotifyMode::OnAvailable => {
            if state.notifications_sent > 0 {
                // Tickets disappeared during an active streak: one notice,
                // then silence until they reappear.
                PolicyDecision {
                    send: true,
                    reset_streak: true,
                }
            } else {
                PolicyDecision::default()
            }
        }
    }
}

/// At most one "still unavailable" notification per 30-minute wall-clock
/// window: send iff the last notification predates the most recent :00/:30
/// boundary. A route that has never notified stays silent, so a freshly
/// created route does not ping immediately.
fn boundary_rule_sends(last_notified_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match (last_notified_at, half_hour_boundary(now)) {
        (Some(last), Some(boundary)) => last < boundary,
        _ => false,
    }
}

/// Most recent boundary at minute 0 or 30 of the current hour.
pub fn half_hour_boundary(now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let minute = if now.minute() < 30 { 0 } else { 30 };
    now.with_minute(minute)?.with_second(0)?.with_nanosecond(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, h, m, 0).unwrap()
    }

    fn state(notifications_sent: u32, last_notified_at: Option<DateTime<Utc>>) -> RouteCheckState {
        RouteCheckState {
            notifications_sent,
            last_notified_at,
            ..Default::default()
        }
    }

    #[test]
    fn force_send_overrides_everything() {
        let st = state(0, None);
        for (available, mode) in [
            (false, NotifyMode::Always),
            (false, NotifyMode::OnAvailable),
            (true, NotifyMode::Always),
        ] {
            let d = evaluate(available, true, mode, &st, at(10, 6));
            assert!(d.send);
            assert!(!d.reset_streak);
        }
    }

    #[test]
    fn available_always_sends() {
        let d = evaluate(
            true,
            false,
            NotifyMode::OnAvailable,
            &state(4, Some(at(10, 4))),
            at(10, 5),
        );
        assert!(d.send);
        assert!(!d.reset_streak);
    }

    #[test]
    fn first_unavailable_check_is_suppressed_until_boundary() {
        // First-ever check at 10:05: no prior notification, suppress.
        let d = evaluate(false, false, NotifyMode::Always, &state(0, None), at(10, 5));
        assert!(!d.send);

        // Notified at 10:05; still inside the 10:00 window at 10:20.
        let st = state(0, Some(at(10, 5)));
        assert!(!evaluate(false, false, NotifyMode::Always, &st, at(10, 20)).send);

        // First check at or after the 10:30 boundary sends.
        assert!(evaluate(false, false, NotifyMode::Always, &st, at(10, 30)).send);
        assert!(evaluate(false, false, NotifyMode::Always, &st, at(10, 44)).send);
    }

    #[test]
    fn boundary_rearms_even_when_ticks_were_skipped() {
        let st = state(0, Some(at(9, 40)));
        // Hours later, the most recent boundary still postdates the last send.
        assert!(evaluate(false, false, NotifyMode::Always, &st, at(12, 7)).send);
    }

    #[test]
    fn always_mode_resets_active_streak_on_unavailable() {
        let st = state(3, Some(at(10, 29)));
        let d = evaluate(false, false, NotifyMode::Always, &st, at(10, 31));
        assert!(d.reset_streak);
        assert!(d.send); // 10:29 predates the 10:30 boundary
    }

    #[test]
    fn on_available_sends_disappearance_notice_exactly_once() {
        // Streak active, tickets gone: one send plus reset.
        let d = evaluate(
            false,
            false,
            NotifyMode::OnAvailable,
            &state(1, Some(at(10, 0))),
            at(10, 5),
        );
        assert!(d.send);
        assert!(d.reset_streak);

        // Subsequent unavailable checks (counter now zero) stay silent.
        let st = state(0, Some(at(10, 5)));
        for minute in [10, 15, 20] {
            let d = evaluate(false, false, NotifyMode::OnAvailable, &st, at(10, minute));
            assert!(!d.send);
            assert!(!d.reset_streak);
        }
    }

    #[test]
    fn half_hour_boundary_snaps_to_0_or_30() {
        assert_eq!(half_hour_boundary(at(10, 5)), Some(at(10, 0)));
        assert_eq!(half_hour_boundary(at(10, 29)), Some(at(10, 0)));
        assert_eq!(half_hour_boundary(at(10, 30)), Some(at(10, 30)));
        assert_eq!(half_hour_boundary(at(10, 59)), Some(at(10, 30)));
    }
}
