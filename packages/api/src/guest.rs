//! # Guest progress bridge
//!
//! Visitors can play the introductory quests before they have an account.
//! Their progress is recorded server-side against a random guest id kept in
//! the `guest_id` cookie (UUID v4, 30 days, `path=/`, `SameSite=Lax`). After
//! login or registration [`GuestProgressBridge::transfer_progress`] moves it
//! onto the account and deletes the cookie.
//!
//! The bridge is the only writer of the `guest_id` cookie.

use std::fmt;

use serde_json::Value;
use store::{days_from_now, site_cookie, CookieJar, KeyValueStore};
use tracing::{debug, info};
use uuid::Uuid;

use crate::backend::{AuthApi, ProgressApi};
use crate::config::GuestConfig;
use crate::error::ProgressError;
use crate::models::{Ack, GuestProgress, GuestProgressUpdate};
use crate::session::SessionStore;

pub const GUEST_COOKIE: &str = "guest_id";

/// Anonymous visitor id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GuestIdentity(String);

impl GuestIdentity {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GuestIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub struct GuestProgressBridge<P, C> {
    api: P,
    cookies: C,
    cookie_days: i64,
}

impl<P: ProgressApi, C: CookieJar> GuestProgressBridge<P, C> {
    pub fn new(api: P, cookies: C) -> Self {
        Self::with_config(api, cookies, &GuestConfig::default())
    }

    pub fn with_config(api: P, cookies: C, config: &GuestConfig) -> Self {
        Self {
            api,
            cookies,
            cookie_days: config.cookie_days,
        }
    }

    /// The current guest id, without creating one.
    pub fn guest_id(&self) -> Option<GuestIdentity> {
        self.cookies
            .get(GUEST_COOKIE)
            .filter(|id| !id.trim().is_empty())
            .map(GuestIdentity)
    }

    /// The current guest id, creating and persisting one if needed.
    pub fn ensure_guest_id(&self) -> GuestIdentity {
        if let Some(id) = self.guest_id() {
            return id;
        }
        let id = Uuid::new_v4().to_string();
        self.cookies.set(
            site_cookie(GUEST_COOKIE, id.as_str())
                .expires(days_from_now(self.cookie_days))
                .build(),
        );
        debug!("Created guest id {}", id);
        GuestIdentity(id)
    }

    /// Record progress on an introductory quest. Not retried.
    pub async fn save_progress(
        &self,
        quest_id: &str,
        unit_progress: Value,
    ) -> Result<Ack, ProgressError> {
        let guest = self.ensure_guest_id();
        let update = GuestProgressUpdate {
            guest_id: guest.0,
            quest_id: quest_id.to_string(),
            unit_progress,
        };
        Ok(self.api.save_guest_progress(&update).await?)
    }

    /// Progress saved under the current guest id. A visitor without a guest
    /// cookie, or one the server has never seen, has none.
    pub async fn load_progress(&self) -> Result<Option<GuestProgress>, ProgressError> {
        let Some(guest) = self.guest_id() else {
            return Ok(None);
        };
        match self.api.guest_progress(guest.as_str()).await {
            Ok(progress) => Ok(Some(progress)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Move guest progress onto the signed-in account.
    ///
    /// Without a guest cookie there is nothing to do and no request is made.
    /// The cookie is deleted only after the server accepted the transfer.
    pub async fn transfer_progress<A, K>(
        &self,
        session: &SessionStore<A, K>,
    ) -> Result<Option<Ack>, ProgressError>
    where
        A: AuthApi,
        K: KeyValueStore,
    {
        let Some(guest) = self.guest_id() else {
            return Ok(None);
        };
        let Some(token) = session.token() else {
            return Err(ProgressError::NoSession);
        };
        let ack = match self.api.transfer_guest_progress(&token, guest.as_str()).await {
            Ok(ack) => ack,
            Err(e) if e.is_unauthorized() => {
                session.intercept_for(&token, e);
                return Err(ProgressError::Unauthorized);
            }
            Err(e) => return Err(e.into()),
        };
        self.cookies.remove(GUEST_COOKIE);
        info!("Transferred guest progress to the signed-in account");
        Ok(Some(ack))
    }
}
