use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use log::info;

use crate::app_state::AppState;
use crate::auth::current_user;
use crate::error::ApiError;
use crate::models::{PreferencesPatch, UpdatePreferencesRequest, UserPreferences};
use crate::rate_limit::Op;
use crate::storage::Storage;

/// GET the caller's preferences. Returns `null` when none exist yet;
/// retrieval never creates a record.
pub async fn get_preferences(
    req: HttpRequest,
    data: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let user_id = current_user(&req)?;
    let prefs = data.storage.preferences_by_user(&user_id).await?;
    Ok(HttpResponse::Ok().json(prefs))
}

/// Get-or-create with the stock defaults. Calling it again returns the
/// existing record unchanged.
pub async fn initialize_preferences(
    req: HttpRequest,
    data: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let user_id = current_user(&req)?;
    if let Some(existing) = data.storage.preferences_by_user(&user_id).await? {
        return Ok(HttpResponse::Ok().json(existing));
    }

    let prefs = UserPreferences::with_defaults(&user_id, Utc::now());
    data.storage.insert_preferences(&prefs).await?;
    info!("preferences initialized for {}", user_id);
    Ok(HttpResponse::Ok().json(prefs))
}

/// UPDATE preferences. A user with no record yet gets the defaults
/// created first, then patched.
pub async fn update_preferences(
    req: HttpRequest,
    data: web::Data<AppState>,
    payload: web::Json<UpdatePreferencesRequest>,
) -> Result<HttpResponse, ApiError> {
    let user_id = current_user(&req)?;
    data.limiter.check(Op::UpdatePreferences, &user_id).await?;

    let mut prefs = match data.storage.preferences_by_user(&user_id).await? {
        Some(existing) => existing,
        None => {
            let fresh = UserPreferences::with_defaults(&user_id, Utc::now());
            data.storage.insert_preferences(&fresh).await?;
            fresh
        }
    };

    let patch = PreferencesPatch {
        theme: payload.theme,
        default_view: payload.default_view,
        notifications: payload.notifications,
        updated_at: Utc::now(),
    };
    patch.apply(&mut prefs);
    data.storage.replace_preferences(&prefs).await?;

    Ok(HttpResponse::Ok().json(prefs))
}
