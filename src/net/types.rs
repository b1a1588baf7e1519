//! Wire DTOs for the session endpoints.
//!
//! DESIGN
//! ======
//! Field names follow the storefront API's camelCase JSON. Tokens are kept as
//! opaque strings; nothing here inspects their structure.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Access/refresh credential pair as issued by the login endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Claims for an authenticated user as returned by the profile endpoint.
///
/// Only the role flags drive behavior (UI gating). Unrecognized fields are
/// kept in `extra` so profile views can still render them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawUserClaims")]
pub struct UserClaims {
    /// Server-side user identifier, read from `_id`, `id` or `identifier`
    /// (first present wins).
    pub identifier: String,
    /// Account email address.
    #[serde(default)]
    pub email: String,
    /// Whether the account may use customer-only views.
    #[serde(default)]
    pub is_customer: bool,
    /// Whether the account may use vendor views.
    #[serde(default)]
    pub is_vendor: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Profile as it arrives on the wire. Mongo-backed deployments may send both
/// `_id` and `id` (virtuals), so each spelling gets its own slot.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawUserClaims {
    #[serde(rename = "_id", default)]
    mongo_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    identifier: Option<String>,
    #[serde(default)]
    email: String,
    #[serde(default)]
    is_customer: bool,
    #[serde(default)]
    is_vendor: bool,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

impl TryFrom<RawUserClaims> for UserClaims {
    type Error = &'static str;

    fn try_from(raw: RawUserClaims) -> Result<Self, Self::Error> {
        let identifier = raw.mongo_id.or(raw.id).or(raw.identifier).ok_or("missing field `_id`")?;
        Ok(Self {
            identifier,
            email: raw.email,
            is_customer: raw.is_customer,
            is_vendor: raw.is_vendor,
            extra: raw.extra,
        })
    }
}

/// Body for `POST` to the verification endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct VerifyTokenRequest<'a> {
    pub token: &'a str,
}

/// Body for `POST` to the refresh endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshTokenRequest<'a> {
    pub refresh_token: &'a str,
}

/// Refresh endpoint response. The refresh credential is not rotated.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshTokenResponse {
    pub access_token: String,
}

/// The profile endpoint answers either with bare claims or wrapped in
/// `{ "user": ... }` depending on the deployment.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ProfileResponse {
    Wrapped { user: UserClaims },
    Bare(UserClaims),
}

impl ProfileResponse {
    pub(crate) fn into_claims(self) -> UserClaims {
        match self {
            Self::Wrapped { user } | Self::Bare(user) => user,
        }
    }
}
