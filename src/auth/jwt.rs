use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, Header, Validation};
use serde::{Deserialize, Serialize};
use futures_util::future::{ready, Ready};
use uuid::Uuid;

use crate::config::jwt::JwtSettings;
use crate::error::AppError;
use crate::models::user::UserRole;

/// Token payload issued by the identity provider.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // player id of the caller
    pub username: String,
    #[serde(default)]
    pub favorite_team: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    pub exp: usize,
}

/// Caller identity; absent token means "not authenticated".
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub display_name: String,
    pub favorite_team: Option<String>,
    pub role: UserRole,
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

/// Authenticated caller holding the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthenticatedUser);

impl FromRequest for AdminUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = authenticate(req).and_then(|user| {
            if user.role.is_admin() {
                Ok(AdminUser(user))
            } else {
                tracing::warn!("Non-admin user attempted admin access: {}", user.display_name);
                Err(AppError::Forbidden("Insufficient privileges".to_string()))
            }
        });
        ready(result)
    }
}

fn not_authenticated() -> AppError {
    AppError::AuthenticationRequired("Not authenticated".to_string())
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
    let jwt_settings = req.app_data::<web::Data<JwtSettings>>().ok_or_else(|| {
        tracing::error!("JWT settings missing from application state");
        not_authenticated()
    })?;

    let auth_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(not_authenticated)?
        .to_str()
        .map_err(|_| AppError::AuthenticationRequired("Invalid authorization header".to_string()))?;

    let token = auth_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::AuthenticationRequired("Invalid authorization scheme".to_string()))?;

    let claims = decode::<Claims>(
        token,
        &jwt_settings.decoding_key(),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|e| {
        tracing::warn!("Failed to decode token: {:?}", e);
        AppError::AuthenticationRequired("Invalid token".to_string())
    })?
    .claims;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::AuthenticationRequired("Invalid user ID in token".to_string()))?;

    Ok(AuthenticatedUser {
        user_id,
        display_name: claims.username,
        favorite_team: claims.favorite_team,
        role: claims.role,
    })
}

pub fn generate_token(
    jwt_settings: &JwtSettings,
    user_id: Uuid,
    display_name: &str,
    favorite_team: Option<&str>,
    role: UserRole,
) -> Result<String, jsonwebtoken::errors::Error> {
    let expires_at = Utc::now() + Duration::hours(jwt_settings.expiration_hours);
    let claims = Claims {
        sub: user_id.to_string(),
        username: display_name.to_string(),
        favorite_team: favorite_team.map(str::to_string),
        role,
        exp: expires_at.timestamp() as usize,
    };

    encode(&Header::new(Algorithm::HS256), &claims, &jwt_settings.encoding_key())
}
