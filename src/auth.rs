use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use actix_web::{
    body::{BoxBody, MessageBody},
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http, web, Error, HttpMessage, HttpRequest, HttpResponse, ResponseError,
};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use futures::future::{ok, Ready};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::models::{AuthResponse, LoginRequest, SignupRequest, User, UserProfile};
use crate::storage::Storage;

const TOKEN_LIFETIME_DAYS: i64 = 30;
const MIN_PASSWORD_CHARS: usize = 8;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

pub fn create_jwt(user_id: &str, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let expiration = Utc::now() + Duration::days(TOKEN_LIFETIME_DAYS);
    let claims = Claims {
        sub: user_id.to_string(),
        exp: expiration.timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
}

pub fn validate_jwt(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

/// The authenticated user's id, inserted by [`Authentication`]. Handlers
/// call this first; a request that never carried a valid token fails here.
pub fn current_user(req: &HttpRequest) -> Result<String, ApiError> {
    req.extensions()
        .get::<String>()
        .cloned()
        .ok_or(ApiError::NotAuthenticated)
}

/// Middleware that resolves `Authorization: Bearer <jwt>` into a user id
/// request extension. A malformed or expired token is rejected outright;
/// a missing header passes through so public routes still work, and
/// protected handlers fail in [`current_user`].
#[derive(Debug)]
pub struct Authentication;

impl<S, B> Transform<S, ServiceRequest> for Authentication
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Transform = AuthMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddleware { service })
    }
}

pub struct AuthMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Some(token) = bearer_token(&req) {
            let secret = req
                .app_data::<web::Data<AppState>>()
                .map(|state| state.config.jwt_secret.clone());
            if let Some(secret) = secret {
                match validate_jwt(&token, &secret) {
                    Ok(claims) => {
                        req.extensions_mut().insert(claims.sub);
                    }
                    Err(e) => {
                        debug!("rejected bearer token: {}", e);
                        let (req_parts, _payload) = req.into_parts();
                        let resp = ApiError::NotAuthenticated.error_response();
                        let srv_resp = ServiceResponse::new(req_parts, resp);
                        return Box::pin(async move { Ok(srv_resp) });
                    }
                }
            }
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res.map_into_boxed_body())
        })
    }
}

fn bearer_token(req: &ServiceRequest) -> Option<String> {
    let header = req.headers().get(http::header::AUTHORIZATION)?;
    let auth_str = header.to_str().ok()?;
    auth_str
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
}

pub async fn signup(
    data: web::Data<AppState>,
    payload: web::Json<SignupRequest>,
) -> Result<HttpResponse, ApiError> {
    let email = payload.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::InvalidEmail);
    }
    if payload.password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ApiError::PasswordTooShort);
    }

    if data.storage.user_by_email(&email).await?.is_some() {
        return Err(ApiError::EmailTaken);
    }

    let password_hash = hash(&payload.password, DEFAULT_COST)?;
    let user = User {
        user_id: Uuid::new_v4().to_string(),
        email,
        password_hash,
        created_at: Utc::now(),
    };
    data.storage.insert_user(&user).await?;

    let token = create_jwt(&user.user_id, &data.config.jwt_secret)?;
    info!("user signed up: {}", user.user_id);
    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        user: UserProfile::from(&user),
    }))
}

pub async fn login(
    data: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let email = payload.email.trim().to_lowercase();
    let user = data
        .storage
        .user_by_email(&email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify(&payload.password, &user.password_hash).unwrap_or(false) {
        return Err(ApiError::InvalidCredentials);
    }

    let token = create_jwt(&user.user_id, &data.config.jwt_secret)?;
    info!("user logged in: {}", user.user_id);
    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        user: UserProfile::from(&user),
    }))
}

/// Who the presented token belongs to.
pub async fn session(
    req: HttpRequest,
    data: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let user_id = current_user(&req)?;
    let user = data
        .storage
        .user_by_id(&user_id)
        .await?
        .ok_or(ApiError::NotAuthenticated)?;
    Ok(HttpResponse::Ok().json(UserProfile::from(&user)))
}

/// Tokens are stateless, so logout is an acknowledgement; the client
/// drops its copy.
pub async fn logout(req: HttpRequest) -> Result<HttpResponse, ApiError> {
    let user_id = current_user(&req)?;
    info!("user logged out: {}", user_id);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "Signed out" })))
}
