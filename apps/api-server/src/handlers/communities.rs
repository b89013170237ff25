//! Community handlers: listing, membership and community posts.

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use campus_core::domain::{Community, Post};
use campus_shared::dto::{
    CommunityDto, CommunityMemberDto, CreateCommunityRequest, CreatePostRequest,
    JoinedCommunityDto, MembershipChangeResponse,
};

use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

use super::posts::to_post_dto;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

async fn to_community_dto(
    state: &AppState,
    community: Community,
    viewer: Option<Uuid>,
) -> AppResult<CommunityDto> {
    let is_joined = match viewer {
        Some(user_id) => {
            state
                .membership_ledger
                .is_member(user_id, community.id)
                .await?
        }
        None => false,
    };

    Ok(CommunityDto {
        id: community.id,
        name: community.name,
        description: community.description,
        image_url: community.image_url,
        member_count: community.member_count,
        is_joined,
    })
}

/// GET /api/communities
pub async fn list(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let viewer = identity.0.map(|i| i.user_id);

    let mut dtos = Vec::new();
    for community in state.communities.find_all().await? {
        dtos.push(to_community_dto(&state, community, viewer).await?);
    }

    Ok(HttpResponse::Ok().json(dtos))
}

/// GET /api/communities/search?q=
pub async fn search(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let viewer = identity.0.map(|i| i.user_id);

    let mut dtos = Vec::new();
    for community in state.communities.search_by_name(&query.q).await? {
        dtos.push(to_community_dto(&state, community, viewer).await?);
    }

    Ok(HttpResponse::Ok().json(dtos))
}

/// GET /api/communities/joined - Protected route
pub async fn joined(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let joined = state
        .membership_ledger
        .memberships(identity.user_id)
        .await?;

    let dtos: Vec<JoinedCommunityDto> = joined
        .into_iter()
        .map(|j| JoinedCommunityDto {
            community: CommunityDto {
                id: j.community.id,
                name: j.community.name,
                description: j.community.description,
                image_url: j.community.image_url,
                member_count: j.community.member_count,
                is_joined: true,
            },
            role: j.role,
            joined_at: j.joined_at,
        })
        .collect();

    Ok(HttpResponse::Ok().json(dtos))
}

/// GET /api/communities/{id}
pub async fn get(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let community_id = path.into_inner();

    let community = state
        .communities
        .find_by_id(community_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("community with id {community_id} not found")))?;

    let dto = to_community_dto(&state, community, identity.0.map(|i| i.user_id)).await?;
    Ok(HttpResponse::Ok().json(dto))
}

/// POST /api/communities - Protected route
pub async fn create(
    state: web::Data<AppState>,
    _identity: Identity,
    body: web::Json<CreateCommunityRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest(
            "Community name is required".to_string(),
        ));
    }

    let community = Community::new(name.to_string(), req.description, req.image_url);
    let saved = state.communities.save(community).await?;

    let dto = to_community_dto(&state, saved, None).await?;
    Ok(HttpResponse::Created().json(dto))
}

/// POST /api/communities/{id}/join - Protected route
pub async fn join(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let community_id = path.into_inner();

    let member_count = state
        .membership_ledger
        .join(identity.user_id, community_id)
        .await?;

    Ok(HttpResponse::Ok().json(MembershipChangeResponse {
        community_id,
        member_count,
    }))
}

/// POST /api/communities/{id}/leave - Protected route
pub async fn leave(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let community_id = path.into_inner();

    let member_count = state
        .membership_ledger
        .leave(identity.user_id, community_id)
        .await?;

    Ok(HttpResponse::Ok().json(MembershipChangeResponse {
        community_id,
        member_count,
    }))
}

/// GET /api/communities/{id}/members
pub async fn members(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let community_id = path.into_inner();

    let members = state.membership_ledger.members(community_id).await?;

    let dtos: Vec<CommunityMemberDto> = members
        .into_iter()
        .map(|m| CommunityMemberDto {
            id: m.user_id,
            username: m.username,
            email: m.email,
            role: m.role,
            joined_at: m.joined_at,
            name: m.name,
            university: m.university,
            profile_pic_url: m.profile_pic_url,
        })
        .collect();

    Ok(HttpResponse::Ok().json(dtos))
}

/// GET /api/communities/{id}/posts
pub async fn list_posts(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let community_id = path.into_inner();
    let viewer = identity.0.map(|i| i.user_id);

    if state.communities.find_by_id(community_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "community with id {community_id} not found"
        )));
    }

    let mut dtos = Vec::new();
    for post in state.posts.find_by_community(community_id).await? {
        dtos.push(to_post_dto(&state, post, viewer).await?);
    }

    Ok(HttpResponse::Ok().json(dtos))
}

/// POST /api/communities/{id}/posts - Protected route; the author must
/// be a member of the community.
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let community_id = path.into_inner();
    let req = body.into_inner();

    if req.title.trim().is_empty() {
        return Err(AppError::BadRequest("Post title is required".to_string()));
    }
    if req.content.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Post content is required".to_string(),
        ));
    }

    if state.communities.find_by_id(community_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "community with id {community_id} not found"
        )));
    }

    let is_member = state
        .membership_ledger
        .is_member(identity.user_id, community_id)
        .await?;
    if !is_member {
        return Err(AppError::Forbidden);
    }

    let post = Post::new(
        community_id,
        identity.user_id,
        req.title,
        req.content,
        req.image_url,
    );
    let saved = state.posts.save(post).await?;

    let dto = to_post_dto(&state, saved, Some(identity.user_id)).await?;
    Ok(HttpResponse::Created().json(dto))
}
