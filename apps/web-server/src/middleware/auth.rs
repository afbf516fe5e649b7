//! Identity extraction from bearer tokens.
//!
//! Tokens are issued by the external authentication service. Pages are
//! public, so handlers take [`OptionalIdentity`] and call an explicit guard
//! where a signed-in user is required.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use std::future::{Ready, ready};
use std::sync::Arc;

use yatube_core::domain::CurrentUser;
use yatube_core::ports::{AuthError, TokenClaims, TokenService};

fn identify(req: &HttpRequest) -> Result<CurrentUser, AuthError> {
    let token_service = req
        .app_data::<web::Data<Arc<dyn TokenService>>>()
        .ok_or_else(|| {
            tracing::error!("TokenService not found in app data");
            AuthError::InvalidToken("Server configuration error".to_string())
        })?;

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()))?;

    let TokenClaims { user_id, username } = token_service.validate_token(token)?;
    Ok(CurrentUser {
        id: user_id,
        username,
    })
}

/// The requesting user, or an anonymous reader when the token is absent or unusable.
pub struct OptionalIdentity(pub Option<CurrentUser>);

impl OptionalIdentity {
    pub fn current_user(&self) -> Option<&CurrentUser> {
        self.0.as_ref()
    }
}

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match identify(req) {
            Ok(user) => ready(Ok(OptionalIdentity(Some(user)))),
            Err(AuthError::MissingAuth) => ready(Ok(OptionalIdentity(None))),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring unusable credentials");
                ready(Ok(OptionalIdentity(None)))
            }
        }
    }
}
