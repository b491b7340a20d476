//! Route check orchestrator: per user, queries the ticketing gateway for
//! each monitored route, refreshes localized station names, runs the parser
//! and the notification policy, and dispatches outgoing messages.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::{
    domain::{Lang, Route, UserId, UserProfile, NOTIFICATION_CAP},
    formatting::render_route_message,
    parser::{parse_availability, station_names_from_response},
    policy::evaluate,
    ports::{Messenger, NameField, RouteStore, TicketGateway},
    texts::{phrase, Phrase},
    Result,
};

/// Options for one check run.
#[derive(Clone, Copy, Debug, Default)]
pub struct CheckOptions {
    /// Manual check: bypass all throttling and surface errors to the user.
    pub force_send: bool,
    /// A language change is in progress: re-localize display names through
    /// the directory even when the response carries none.
    pub update_names: bool,
    /// Restrict the run to a single route (immediate check after creation).
    pub specific_route: Option<crate::domain::RouteId>,
}

pub struct RouteChecker {
    store: Arc<dyn RouteStore>,
    gateway: Arc<dyn TicketGateway>,
    messenger: Arc<dyn Messenger>,
}

impl RouteChecker {
    pub fn new(
        store: Arc<dyn RouteStore>,
        gateway: Arc<dyn TicketGateway>,
        messenger: Arc<dyn Messenger>,
    ) -> Self {
        Self {
            store,
            gateway,
            messenger,
        }
    }

    /// Check every route of one user (or one specific route) and notify as
    /// the policy decides. Returns the number of notifications delivered.
    ///
    /// A gateway failure for one route is logged and skipped; it aborts
    /// neither the remaining routes nor the tick.
    pub async fn check_and_notify_for_user(
        &self,
        user_id: UserId,
        opts: CheckOptions,
    ) -> Result<usize> {
        let user = self.store.get_user(user_id).await?;
        let routes = self.store.list_routes(user_id).await?;
        info!(user = user_id.0, routes = routes.len(), "checking routes");

        if routes.is_empty() {
            if opts.force_send && opts.specific_route.is_none() {
                self.send(user_id, phrase(user.language, Phrase::NoRoutes))
                    .await;
            }
            return Ok(0);
        }

        let mut sent = 0usize;
        for mut route in routes {
            if let Some(only) = opts.specific_route {
                if route.id != only {
                    continue;
                }
            }

            match self.check_route(&user, &mut route, opts).await {
                Ok(true) => sent += 1,
                Ok(false) => {}
                Err(e) => {
                    error!(route = route.id.0, error = %e, "route check failed");
                    if opts.force_send {
                        let text =
                            format!("{}\nDebug: {e}", phrase(user.language, Phrase::UnknownError));
                        self.send(user_id, &text).await;
                    }
                }
            }
        }

        Ok(sent)
    }

    /// One scheduled pass over all known users. A failure for one user is
    /// logged and does not block the others.
    pub async fn scheduler_tick(&self) {
        let users = match self.store.list_users().await {
            Ok(users) => users,
            Err(e) => {
                error!(error = %e, "could not enumerate users for tick");
                return;
            }
        };

        for user in users {
            if let Err(e) = self
                .check_and_notify_for_user(user, CheckOptions::default())
                .await
            {
                error!(user = user.0, error = %e, "scheduled check failed");
            }
        }
    }

    /// Re-localize all route display names after a language change: search
    /// the directory by the old name in the new language and match by code.
    /// Lookup failures keep the original name.
    pub async fn relocalize_route_names(&self, user_id: UserId, lang: Lang) -> Result<()> {
        let routes = self.store.list_routes(user_id).await?;
        info!(user = user_id.0, lang = lang.code(), "re-localizing route names");

        for route in routes {
            let from = self
                .lookup_localized(&route.from_name, &route.from_code, lang)
                .await;
            let to = self
                .lookup_localized(&route.to_name, &route.to_code, lang)
                .await;

            self.apply_name(&route, NameField::Origin, &from).await;
            self.apply_name(&route, NameField::Destination, &to).await;
        }
        Ok(())
    }

    async fn check_route(
        &self,
        user: &UserProfile,
        route: &mut Route,
        opts: CheckOptions,
    ) -> Result<bool> {
        let raw = self
            .gateway
            .fetch_availability(&route.from_code, &route.to_code, route.travel_date, user.language)
            .await?;

        self.refresh_route_names(route, &raw, user.language, opts.update_names)
            .await;

        let parsed = parse_availability(&raw);
        let now = Utc::now();
        let state = self.store.route_state(route.id).await?;
        let decision = evaluate(
            parsed.available,
            opts.force_send,
            user.notify_mode,
            &state,
            now,
        );

        if decision.reset_streak {
            self.store.reset_notification_count(route.id).await?;
        }

        let mut deleted = false;
        let mut notified = false;
        if decision.send {
            let text = render_route_message(user.language, route, &parsed, now);
            // Only a delivered message counts as a notification.
            if self.send(user.id, &text).await {
                notified = true;
                self.store.update_last_notified(route.id, now).await?;
                self.send(user.id, if parsed.available { "🎉" } else { "😔" })
                    .await;

                if parsed.available {
                    let count = self.store.increment_notification_count(route.id).await?;
                    if count >= NOTIFICATION_CAP {
                        self.store.delete_route(route.id).await?;
                        self.send(user.id, "✅").await;
                        info!(route = route.id.0, count, "route retired at notification cap");
                        deleted = true;
                    }
                }
            }
        }

        // States live and die with their route; nothing to persist for a
        // route that was just retired.
        if !deleted {
            self.store
                .set_route_state(route.id, parsed.available, now)
                .await?;
        }

        Ok(notified)
    }

    /// Refresh localized display names. An explicit re-localization pass
    /// (language change) wins over names embedded in the response.
    async fn refresh_route_names(&self, route: &mut Route, raw: &Value, lang: Lang, force: bool) {
        let mut from = String::new();
        let mut to = String::new();

        if force {
            from = self
                .lookup_localized(&route.from_name, &route.from_code, lang)
                .await;
            to = self
                .lookup_localized(&route.to_name, &route.to_code, lang)
                .await;
        }

        if from.is_empty() || to.is_empty() {
            if let Some((dep, arv)) = station_names_from_response(raw) {
                if from.is_empty() {
                    from = dep;
                }
                if to.is_empty() {
                    to = arv;
                }
            }
        }

        if self.apply_name(route, NameField::Origin, &from).await {
            route.from_name = from;
        }
        if self.apply_name(route, NameField::Destination, &to).await {
            route.to_name = to;
        }
    }

    /// Persist a changed display name. Returns whether an update happened.
    async fn apply_name(&self, route: &Route, field: NameField, value: &str) -> bool {
        let current = match field {
            NameField::Origin => &route.from_name,
            NameField::Destination => &route.to_name,
        };
        if value.is_empty() || value == current {
            return false;
        }

        match self.store.update_route_name(route.id, field, value).await {
            Ok(()) => {
                info!(route = route.id.0, ?field, value, "updated route display name");
                true
            }
            Err(e) => {
                warn!(route = route.id.0, error = %e, "failed to persist display name");
                false
            }
        }
    }

    /// Directory search by old display name in the target language, matched
    /// by station code. Empty string when nothing matches or lookup fails.
    async fn lookup_localized(&self, old_name: &str, code: &str, lang: Lang) -> String {
        match self.gateway.search_stations(old_name, lang).await {
            Ok(stations) => stations
                .into_iter()
                .find(|s| s.code == code)
                .map(|s| s.name)
                .unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "station re-localization lookup failed");
                String::new()
            }
        }
    }

    /// Fire-and-forget dispatch: failures are logged, never retried within
    /// the same decision cycle. Returns whether the message went out.
    async fn send(&self, user: UserId, text: &str) -> bool {
        match self.messenger.send_text(user, text).await {
            Ok(()) => true,
            Err(e) => {
                error!(user = user.0, error = %e, "failed to send message");
                false
            }
        }
    }
}
