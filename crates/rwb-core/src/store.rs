//! In-process implementation of the persistence port.
//!
//! Users, routes, and check state live in one mutex-guarded map set. The
//! inherent methods below the trait impl are the surface the conversational
//! front-end drives (user bootstrap, settings, route creation).

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::Mutex;

use crate::{
    domain::{Lang, NotifyMode, Route, RouteCheckState, RouteId, UserId, UserProfile},
    ports::{NameField, RouteStore},
    Result,
};

#[derive(Default)]
struct Inner {
    users: BTreeMap<UserId, UserProfile>,
    routes: BTreeMap<RouteId, Route>,
    states: HashMap<RouteId, RouteCheckState>,
    next_route_id: i64,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the user on first interaction; no-op if already known.
    pub async fn ensure_user(&self, id: UserId) {
        let mut st = self.inner.lock().await;
        st.users.entry(id).or_insert_with(|| UserProfile {
            id,
            language: Lang::default(),
            notify_mode: NotifyMode::default(),
        });
    }

    pub async fn set_language(&self, id: UserId, lang: Lang) {
        let mut st = self.inner.lock().await;
        let profile = st.users.entry(id).or_insert_with(|| UserProfile {
            id,
            language: Lang::default(),
            notify_mode: NotifyMode::default(),
        });
        profile.language = lang;
    }

    pub async fn set_notify_mode(&self, id: UserId, mode: NotifyMode) {
        let mut st = self.inner.lock().await;
        let profile = st.users.entry(id).or_insert_with(|| UserProfile {
            id,
            language: Lang::default(),
            notify_mode: NotifyMode::default(),
        });
        profile.notify_mode = mode;
    }

    pub async fn count_routes(&self, user: UserId) -> usize {
        let st = self.inner.lock().await;
        st.routes.values().filter(|r| r.owner == user).count()
    }

    /// Create a route plus its check state. The state is seeded with the
    /// creation instant as `last_notified_at`, so a fresh route sits out the
    /// current 30-minute window instead of notifying immediately.
    pub async fn add_route(
        &self,
        owner: UserId,
        from_code: &str,
        from_name: &str,
        to_code: &str,
        to_name: &str,
        travel_date: NaiveDate,
    ) -> RouteId {
        let mut st = self.inner.lock().await;
        st.next_route_id += 1;
        let id = RouteId(st.next_route_id);
        st.routes.insert(
            id,
            Route {
                id,
                owner,
                from_code: from_code.to_string(),
                from_name: from_name.to_string(),
                to_code: to_code.to_string(),
                to_name: to_name.to_string(),
                travel_date,
            },
        );
        st.states.insert(
            id,
            RouteCheckState {
                last_notified_at: Some(Utc::now()),
                ..Default::default()
            },
        );
        id
    }
}

#[async_trait]
impl RouteStore for MemoryStore {
    async fn list_users(&self) -> Result<Vec<UserId>> {
        let st = self.inner.lock().await;
        Ok(st.users.keys().copied().collect())
    }

    async fn get_user(&self, id: UserId) -> Result<UserProfile> {
        self.ensure_user(id).await;
        let st = self.inner.lock().await;
        Ok(st.users[&id].clone())
    }

    async fn list_routes(&self, user: UserId) -> Result<Vec<Route>> {
        let st = self.inner.lock().await;
        Ok(st
            .routes
            .values()
            .filter(|r| r.owner == user)
            .cloned()
            .collect())
    }

    async fn update_route_name(
        &self,
        route: RouteId,
        field: NameField,
        value: &str,
    ) -> Result<()> {
        let mut st = self.inner.lock().await;
        if let Some(r) = st.routes.get_mut(&route) {
            match field {
                NameField::Origin => r.from_name = value.to_string(),
                NameField::Destination => r.to_name = value.to_string(),
            }
        }
        Ok(())
    }

    async fn delete_route(&self, route: RouteId) -> Result<()> {
        let mut st = self.inner.lock().await;
        st.routes.remove(&route);
        st.states.remove(&route);
        Ok(())
    }

    async fn route_state(&self, route: RouteId) -> Result<RouteCheckState> {
        let st = self.inner.lock().await;
        Ok(st.states.get(&route).cloned().unwrap_or_default())
    }

    async fn set_route_state(
        &self,
        route: RouteId,
        available: bool,
        checked_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut st = self.inner.lock().await;
        let state = st.states.entry(route).or_default();
        state.last_available = available;
        state.last_checked_at = Some(checked_at);
        Ok(())
    }

    async fn increment_notification_count(&self, route: RouteId) -> Result<u32> {
        let mut st = self.inner.lock().await;
        let state = st.states.entry(route).or_default();
        state.notifications_sent += 1;
        Ok(state.notifications_sent)
    }

    async fn reset_notification_count(&self, route: RouteId) -> Result<()> {
        let mut st = self.inner.lock().await;
        st.states.entry(route).or_default().notifications_sent = 0;
        Ok(())
    }

    async fn update_last_notified(&self, route: RouteId, at: DateTime<Utc>) -> Result<()> {
        let mut st = self.inner.lock().await;
        st.states.entry(route).or_default().last_notified_at = Some(at);
        Ok(())
    }
}
