//! HTTP calls for the session endpoints.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): stubs returning `TransientFailure` since these endpoints
//! are only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Every call returns a typed [`AuthError`]. 401/403 map to `Unauthorized`;
//! transport errors, other statuses, and undecodable bodies map to
//! `TransientFailure`.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use super::error::AuthError;
#[cfg(feature = "hydrate")]
use super::error::classify_status;
use super::types::UserClaims;
#[cfg(feature = "hydrate")]
use super::types::{ProfileResponse, RefreshTokenRequest, RefreshTokenResponse, VerifyTokenRequest};
use crate::config::Endpoints;

/// The three endpoints the session initializer depends on. Enables mocking
/// in tests.
///
/// Futures are `?Send` because browser fetch futures are bound to the
/// JS event loop.
#[async_trait::async_trait(?Send)]
pub trait AuthApi {
    /// Check that `token` is still accepted. Returns no user data.
    ///
    /// # Errors
    ///
    /// `Unauthorized` when the credential is rejected, `TransientFailure`
    /// for anything else.
    async fn verify_token(&self, token: &str) -> Result<(), AuthError>;

    /// Load the claims for the user `token` was issued to.
    ///
    /// # Errors
    ///
    /// Same as [`AuthApi::verify_token`].
    async fn fetch_profile(&self, token: &str) -> Result<UserClaims, AuthError>;

    /// Exchange `refresh_token` for a new access token. The refresh
    /// credential itself is not rotated.
    ///
    /// # Errors
    ///
    /// Same as [`AuthApi::verify_token`].
    async fn refresh_token(&self, refresh_token: &str) -> Result<String, AuthError>;
}

#[cfg(any(test, feature = "hydrate"))]
fn endpoint_url(base: &str, path: &str) -> String {
    format!("{}{path}", base.trim_end_matches('/'))
}

#[cfg(any(test, feature = "hydrate"))]
fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

#[cfg(any(test, feature = "hydrate"))]
fn transient(err: impl std::fmt::Display) -> AuthError {
    AuthError::TransientFailure(err.to_string())
}

/// [`AuthApi`] over the storefront's REST endpoints.
#[derive(Debug, Clone, Default)]
pub struct HttpAuthApi {
    endpoints: Endpoints,
}

impl HttpAuthApi {
    #[must_use]
    pub fn new(endpoints: Endpoints) -> Self {
        Self { endpoints }
    }

    #[must_use]
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }
}

#[async_trait::async_trait(?Send)]
impl AuthApi for HttpAuthApi {
    async fn verify_token(&self, token: &str) -> Result<(), AuthError> {
        #[cfg(feature = "hydrate")]
        {
            let url = endpoint_url(&self.endpoints.api_base, &self.endpoints.verify);
            let resp = gloo_net::http::Request::post(&url)
                .header("Authorization", &bearer(token))
                .json(&VerifyTokenRequest { token })
                .map_err(transient)?
                .send()
                .await
                .map_err(transient)?;
            if !resp.ok() {
                return Err(classify_status(resp.status()));
            }
            Ok(())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = token;
            Err(AuthError::TransientFailure("not available on server".to_owned()))
        }
    }

    async fn fetch_profile(&self, token: &str) -> Result<UserClaims, AuthError> {
        #[cfg(feature = "hydrate")]
        {
            let url = endpoint_url(&self.endpoints.api_base, &self.endpoints.profile);
            let resp = gloo_net::http::Request::get(&url)
                .header("Authorization", &bearer(token))
                .send()
                .await
                .map_err(transient)?;
            if !resp.ok() {
                return Err(classify_status(resp.status()));
            }
            let body: ProfileResponse = resp.json().await.map_err(transient)?;
            Ok(body.into_claims())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = token;
            Err(AuthError::TransientFailure("not available on server".to_owned()))
        }
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<String, AuthError> {
        #[cfg(feature = "hydrate")]
        {
            let url = endpoint_url(&self.endpoints.api_base, &self.endpoints.refresh);
            let resp = gloo_net::http::Request::post(&url)
                .json(&RefreshTokenRequest { refresh_token })
                .map_err(transient)?
                .send()
                .await
                .map_err(transient)?;
            if !resp.ok() {
                return Err(classify_status(resp.status()));
            }
            let body: RefreshTokenResponse = resp.json().await.map_err(transient)?;
            if body.access_token.trim().is_empty() {
                return Err(AuthError::TransientFailure("refresh returned an empty access token".to_owned()));
            }
            Ok(body.access_token)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = refresh_token;
            Err(AuthError::TransientFailure("not available on server".to_owned()))
        }
    }
}
