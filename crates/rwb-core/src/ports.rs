use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::{
    domain::{Lang, Route, RouteCheckState, RouteId, Station, UserId, UserProfile},
    Result,
};

/// Outbound messaging port.
///
/// Telegram is the first implementation. Sends are fire-and-forget from the
/// core's perspective: a failure is logged by the caller and never retried
/// within the same decision cycle.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_text(&self, user: UserId, text: &str) -> Result<()>;
}

/// Port for the external ticketing system: availability queries plus the
/// station directory used when routes are defined or re-localized.
#[async_trait]
pub trait TicketGateway: Send + Sync {
    /// Query seat availability for a station pair on a date. Returns the raw
    /// nested payload; the parser normalizes it. Errors on non-success HTTP.
    async fn fetch_availability(
        &self,
        from_code: &str,
        to_code: &str,
        date: NaiveDate,
        lang: Lang,
    ) -> Result<serde_json::Value>;

    /// Search stations by (partial) name. Queries under 2 characters return
    /// an empty list.
    async fn search_stations(&self, query: &str, lang: Lang) -> Result<Vec<Station>>;
}

/// Which display name of a route is being rewritten during re-localization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NameField {
    Origin,
    Destination,
}

/// Persistence port for users, routes, and per-route check state.
///
/// The front-end owns user/route creation; the core only reads profiles and
/// routes, rewrites display names, retires routes, and maintains check state.
#[async_trait]
pub trait RouteStore: Send + Sync {
    async fn list_users(&self) -> Result<Vec<UserId>>;

    /// Missing users are created with default language and notify mode.
    async fn get_user(&self, id: UserId) -> Result<UserProfile>;

    async fn list_routes(&self, user: UserId) -> Result<Vec<Route>>;
    async fn update_route_name(&self, route: RouteId, field: NameField, value: &str)
        -> Result<()>;
    async fn delete_route(&self, route: RouteId) -> Result<()>;

    /// Missing state records read as the default (never checked, no streak).
    async fn route_state(&self, route: RouteId) -> Result<RouteCheckState>;
    async fn set_route_state(
        &self,
        route: RouteId,
        available: bool,
        checked_at: DateTime<Utc>,
    ) -> Result<()>;
    async fn increment_notification_count(&self, route: RouteId) -> Result<u32>;
    async fn reset_notification_count(&self, route: RouteId) -> Result<()>;
    async fn update_last_notified(&self, route: RouteId, at: DateTime<Utc>) -> Result<()>;
}
