//! Request identity for the donation server.
//!
//! The server does not authenticate credentials itself. An upstream identity layer (reverse proxy or session
//! service) authenticates every request and injects two trusted headers:
//!
//! * `DPG-User-Id` — the authenticated user's id. Required on every `/api` route.
//! * `DPG-Roles` — a comma-separated list of every role the caller holds, e.g. `user,admin`. Roles are not
//!   hierarchical; an admin who should also use the user endpoints must carry both. When the header is absent the
//!   caller is treated as a plain user.
//!
//! The [`crate::middleware::AclMiddlewareFactory`] middleware parses these headers, enforces the route's required
//! roles, and stashes the resulting [`AuthClaims`] in the request extensions, where handlers pick them up through
//! the `FromRequest` impl below.
//!
//! Deployments must ensure that these headers cannot be set by the outside world (the proxy strips and rewrites
//! them); the server trusts them completely.

use actix_web::{dev::Payload, http::header::HeaderMap, FromRequest, HttpMessage, HttpRequest};
use donation_payment_engine::db_types::Role;
use futures::future::{err, ok, Ready};
use log::*;
use serde::{Deserialize, Serialize};

use crate::errors::{AuthError, ServerError};

pub const USER_ID_HEADER: &str = "DPG-User-Id";
pub const ROLES_HEADER: &str = "DPG-Roles";

/// The caller's identity, as vouched for by the upstream identity layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthClaims {
    pub user_id: String,
    pub roles: Vec<Role>,
}

impl AuthClaims {
    pub fn new(user_id: &str, roles: Vec<Role>) -> Self {
        Self { user_id: user_id.to_string(), roles }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Reads the identity headers from a request. Fails if the user id is missing or any header is unreadable.
    pub fn from_request_headers(headers: &HeaderMap) -> Result<Self, AuthError> {
        let user_id = headers
            .get(USER_ID_HEADER)
            .ok_or(AuthError::MissingIdentity)?
            .to_str()
            .map_err(|e| AuthError::PoorlyFormattedHeader(e.to_string()))?
            .trim();
        if user_id.is_empty() {
            return Err(AuthError::MissingIdentity);
        }
        let roles = match headers.get(ROLES_HEADER) {
            Some(value) => {
                let value = value.to_str().map_err(|e| AuthError::PoorlyFormattedHeader(e.to_string()))?;
                parse_roles(value)?
            },
            None => Vec::new(),
        };
        // A caller the proxy authenticated but assigned no explicit roles is a plain user.
        let roles = if roles.is_empty() { vec![Role::User] } else { roles };
        Ok(Self { user_id: user_id.to_string(), roles })
    }
}

/// Parses a comma-separated role list. Unknown role names are an error rather than being ignored, so that a
/// misconfigured proxy fails loudly instead of silently stripping permissions.
pub fn parse_roles(value: &str) -> Result<Vec<Role>, AuthError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<Role>().map_err(|e| AuthError::PoorlyFormattedHeader(e.to_string())))
        .collect()
}

impl FromRequest for AuthClaims {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthClaims>() {
            Some(claims) => ok(claims.clone()),
            None => {
                warn!("🔑️ No claims found in the request extensions. Is the route wrapped in an ACL middleware?");
                err(ServerError::AuthenticationError(AuthError::MissingIdentity))
            },
        }
    }
}
