use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};

use crate::error::AppError;

/// The single configured API credential.
#[derive(Clone)]
pub struct ApiToken(String);

impl ApiToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    fn matches(&self, candidate: &str) -> bool {
        !self.0.is_empty() && self.0 == candidate
    }
}

/// Request guard for protected routes. Accepts the key from
/// `Authorization: Bearer <key>` or `X-API-Key: <key>`; anything else is 401.
pub struct RequireApiKey;

impl FromRequest for RequireApiKey {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authorize(req))
    }
}

fn authorize(req: &HttpRequest) -> Result<RequireApiKey, AppError> {
    let Some(expected) = req.app_data::<web::Data<ApiToken>>() else {
        return Err(AppError::Unauthorized);
    };

    let bearer = req
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let candidate = match bearer {
        Some(token) => Some(token),
        None => req
            .headers()
            .get("X-API-Key")
            .and_then(|value| value.to_str().ok()),
    };

    match candidate {
        Some(token) if expected.matches(token) => Ok(RequireApiKey),
        _ => Err(AppError::Unauthorized),
    }
}
