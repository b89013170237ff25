//! Profile handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use campus_core::domain::{Profile, User};
use campus_shared::dto::{ProfileResponse, UpdateProfileRequest};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn merge(user: User, profile: Profile) -> ProfileResponse {
    ProfileResponse {
        user_id: user.id,
        username: user.username,
        email: user.email,
        name: profile.name,
        bio: profile.bio,
        university: profile.university,
        major: profile.major,
        location: profile.location,
        profile_pic_url: profile.profile_pic_url,
        github_url: profile.github_url,
        linkedin_url: profile.linkedin_url,
    }
}

async fn load(state: &AppState, user_id: Uuid) -> AppResult<ProfileResponse> {
    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user with id {user_id} not found")))?;

    let profile = state
        .profiles
        .find_by_user_id(user_id)
        .await?
        .unwrap_or_else(|| Profile::empty(user_id));

    Ok(merge(user, profile))
}

/// GET /api/profile/me - Protected route
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let response = load(&state, identity.user_id).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// PUT /api/profile/me - Protected route. Absent fields keep their
/// current values.
pub async fn update_me(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<UpdateProfileRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let mut profile = state
        .profiles
        .find_by_user_id(user.id)
        .await?
        .unwrap_or_else(|| Profile::empty(user.id));

    if let Some(name) = req.name {
        profile.name = Some(name);
    }
    if let Some(bio) = req.bio {
        profile.bio = Some(bio);
    }
    if let Some(university) = req.university {
        profile.university = Some(university);
    }
    if let Some(major) = req.major {
        profile.major = Some(major);
    }
    if let Some(location) = req.location {
        profile.location = Some(location);
    }
    if let Some(profile_pic_url) = req.profile_pic_url {
        profile.profile_pic_url = Some(profile_pic_url);
    }
    if let Some(github_url) = req.github_url {
        profile.github_url = Some(github_url);
    }
    if let Some(linkedin_url) = req.linkedin_url {
        profile.linkedin_url = Some(linkedin_url);
    }

    let saved = state.profiles.upsert(profile).await?;

    Ok(HttpResponse::Ok().json(merge(user, saved)))
}

/// GET /api/profile/{user_id}
pub async fn get(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let response = load(&state, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}
