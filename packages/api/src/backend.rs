//! Backend seams consumed by [`SessionStore`](crate::SessionStore) and
//! [`GuestProgressBridge`](crate::GuestProgressBridge).
//!
//! [`ApiClient`](crate::ApiClient) is the production implementation; tests
//! plug in an in-memory fake. Like the storage traits these return plain
//! futures without a `Send` bound, since everything runs on the UI thread.

use std::future::Future;
use std::rc::Rc;

use crate::error::ApiError;
use crate::models::{
    Ack, Credentials, GuestProgress, GuestProgressUpdate, LoginResponse, Registration,
    TokenResponse, UserRecord,
};

/// Authentication endpoints.
pub trait AuthApi {
    /// `POST /api/auth/login`, form-urlencoded.
    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<LoginResponse, ApiError>>;

    /// `POST /api/auth/register`, JSON.
    fn register(
        &self,
        registration: &Registration,
    ) -> impl Future<Output = Result<TokenResponse, ApiError>>;

    /// `GET /api/auth/me` with bearer auth.
    fn current_user(&self, token: &str) -> impl Future<Output = Result<UserRecord, ApiError>>;
}

/// Public guest progress endpoints.
pub trait ProgressApi {
    fn save_guest_progress(
        &self,
        update: &GuestProgressUpdate,
    ) -> impl Future<Output = Result<Ack, ApiError>>;

    fn guest_progress(&self, guest_id: &str)
        -> impl Future<Output = Result<GuestProgress, ApiError>>;

    /// Bearer-authenticated; moves the guest's progress onto the account.
    fn transfer_guest_progress(
        &self,
        token: &str,
        guest_id: &str,
    ) -> impl Future<Output = Result<Ack, ApiError>>;
}

impl<T: AuthApi> AuthApi for Rc<T> {
    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<LoginResponse, ApiError>> {
        (**self).login(credentials)
    }

    fn register(
        &self,
        registration: &Registration,
    ) -> impl Future<Output = Result<TokenResponse, ApiError>> {
        (**self).register(registration)
    }

    fn current_user(&self, token: &str) -> impl Future<Output = Result<UserRecord, ApiError>> {
        (**self).current_user(token)
    }
}

impl<T: ProgressApi> ProgressApi for Rc<T> {
    fn save_guest_progress(
        &self,
        update: &GuestProgressUpdate,
    ) -> impl Future<Output = Result<Ack, ApiError>> {
        (**self).save_guest_progress(update)
    }

    fn guest_progress(
        &self,
        guest_id: &str,
    ) -> impl Future<Output = Result<GuestProgress, ApiError>> {
        (**self).guest_progress(guest_id)
    }

    fn transfer_guest_progress(
        &self,
        token: &str,
        guest_id: &str,
    ) -> impl Future<Output = Result<Ack, ApiError>> {
        (**self).transfer_guest_progress(token, guest_id)
    }
}
