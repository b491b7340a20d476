use chrono::{DateTime, NaiveDate, Utc};

/// Telegram user id (numeric). Doubles as the chat id for private chats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub i64);

/// Monitored route id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId(pub i64);

/// Maximum concurrent routes per user. Enforced by the conversational
/// front-end; the core tolerates pre-existing records above the cap.
pub const MAX_ROUTES_PER_USER: usize = 5;

/// Number of "available" notifications after which a route is retired.
pub const NOTIFICATION_CAP: u32 = 5;

/// Interface language for a user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Lang {
    #[default]
    Ru,
    Uz,
    En,
}

impl Lang {
    /// Two-letter code sent as `Accept-Language` and stored per user.
    pub fn code(self) -> &'static str {
        match self {
            Lang::Ru => "ru",
            Lang::Uz => "uz",
            Lang::En => "en",
        }
    }

    /// Unknown codes fall back to Russian, the original default.
    pub fn from_code(code: &str) -> Self {
        match code {
            "uz" => Lang::Uz,
            "en" => Lang::En,
            _ => Lang::Ru,
        }
    }
}

/// How the user wants to be notified on each scheduled check.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NotifyMode {
    /// Notify on every check while seats exist; "still unavailable" pings
    /// at most once per 30-minute wall-clock window.
    #[default]
    Always,
    /// Notify only while seats exist, plus a single "tickets disappeared"
    /// notice when an available streak ends.
    OnAvailable,
}

#[derive(Clone, Debug)]
pub struct UserProfile {
    pub id: UserId,
    pub language: Lang,
    pub notify_mode: NotifyMode,
}

/// A user-defined origin/destination/date search being monitored.
#[derive(Clone, Debug)]
pub struct Route {
    pub id: RouteId,
    pub owner: UserId,
    pub from_code: String,
    pub from_name: String,
    pub to_code: String,
    pub to_name: String,
    pub travel_date: NaiveDate,
}

/// Per-route check state; lives and dies with its route.
#[derive(Clone, Debug, Default)]
pub struct RouteCheckState {
    pub last_available: bool,
    pub last_checked_at: Option<DateTime<Utc>>,
    /// Count of notifications sent during the current "available" streak.
    /// Sole trigger for automatic route deletion at `NOTIFICATION_CAP`.
    pub notifications_sent: u32,
    pub last_notified_at: Option<DateTime<Utc>>,
}

/// A station directory entry: code plus display name localized to the
/// language the lookup was made in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Station {
    pub code: String,
    pub name: String,
}
