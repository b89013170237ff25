//! Post handlers: CRUD, engagement (like/bookmark/report/stats) and
//! comments.

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use campus_core::domain::{Comment, PageRequest, Post};
use campus_shared::dto::{
    CommentDto, CreateCommentRequest, LikeToggleResponse, PagedResponse, PostDto, PostLikeDto,
    PostStatsDto, ReportPostRequest, ToggleBookmarkResponse, UpdatePostRequest,
};

use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl PageQuery {
    fn to_request(&self) -> PageRequest {
        PageRequest::new(
            self.page.unwrap_or(0),
            self.per_page.unwrap_or(PageRequest::DEFAULT_PER_PAGE),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

fn post_not_found(post_id: Uuid) -> AppError {
    AppError::NotFound(format!("post with id {post_id} not found"))
}

/// Resolve a post to its API shape: author name, comment count, and the
/// viewer's like/bookmark/ownership flags.
pub(super) async fn to_post_dto(
    state: &AppState,
    post: Post,
    viewer: Option<Uuid>,
) -> AppResult<PostDto> {
    let author_name = state
        .users
        .find_by_id(post.author_id)
        .await?
        .map(|u| u.username)
        .unwrap_or_else(|| "unknown".to_string());

    let comments_count = state.comments.count_by_post(post.id).await?;

    let (is_liked, is_bookmarked) = match viewer {
        Some(user_id) => {
            state
                .engagement_ledger
                .engagement_flags(post.id, user_id)
                .await?
        }
        None => (false, false),
    };

    Ok(PostDto {
        id: post.id,
        community_id: post.community_id,
        author_id: post.author_id,
        author_name,
        title: post.title,
        content: post.content,
        image_url: post.image_url,
        likes_count: post.likes_count,
        comments_count,
        created_at: post.created_at,
        updated_at: post.updated_at,
        is_liked,
        is_bookmarked,
        is_owner: viewer == Some(post.author_id),
    })
}

async fn to_post_page(
    state: &AppState,
    page: campus_core::domain::Page<Post>,
    viewer: Option<Uuid>,
) -> AppResult<PagedResponse<PostDto>> {
    let mut items = Vec::with_capacity(page.items.len());
    for post in page.items {
        items.push(to_post_dto(state, post, viewer).await?);
    }

    Ok(PagedResponse {
        items,
        page: page.page,
        per_page: page.per_page,
        total: page.total,
    })
}

/// GET /api/posts
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let page = state.posts.find_page(query.to_request()).await?;
    let response = to_post_page(&state, page, identity.0.map(|i| i.user_id)).await?;

    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/posts/search?q=
pub async fn search(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let request = PageRequest::new(
        query.page.unwrap_or(0),
        query.per_page.unwrap_or(PageRequest::DEFAULT_PER_PAGE),
    );

    let page = state.posts.search(&query.q, request).await?;
    let response = to_post_page(&state, page, identity.0.map(|i| i.user_id)).await?;

    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/posts/feed - Protected route; posts from joined communities.
pub async fn feed(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let memberships = state.memberships.find_by_user(identity.user_id).await?;
    let community_ids: Vec<Uuid> = memberships.into_iter().map(|m| m.community_id).collect();

    let page = state
        .posts
        .find_by_communities(&community_ids, query.to_request())
        .await?;
    let response = to_post_page(&state, page, Some(identity.user_id)).await?;

    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/posts/bookmarked - Protected route.
pub async fn bookmarked(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let post_ids = state.bookmarks.post_ids_by_user(identity.user_id).await?;

    let page = state
        .posts
        .find_by_ids(&post_ids, query.to_request())
        .await?;
    let response = to_post_page(&state, page, Some(identity.user_id)).await?;

    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/posts/{id}
pub async fn get(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();

    let post = state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| post_not_found(post_id))?;

    let dto = to_post_dto(&state, post, identity.0.map(|i| i.user_id)).await?;
    Ok(HttpResponse::Ok().json(dto))
}

/// PUT /api/posts/{id} - Protected route; author only.
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let req = body.into_inner();

    let mut post = state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| post_not_found(post_id))?;

    if post.author_id != identity.user_id {
        return Err(AppError::Forbidden);
    }

    if let Some(title) = req.title {
        if !title.trim().is_empty() {
            post.title = title;
        }
    }
    if let Some(content) = req.content {
        if !content.trim().is_empty() {
            post.content = content;
        }
    }
    if let Some(image_url) = req.image_url {
        post.image_url = Some(image_url);
    }
    post.updated_at = chrono::Utc::now();

    let saved = state.posts.save(post).await?;

    let dto = to_post_dto(&state, saved, Some(identity.user_id)).await?;
    Ok(HttpResponse::Ok().json(dto))
}

/// DELETE /api/posts/{id} - Protected route; author only. Dependent
/// likes, bookmarks, reports and comments are removed first.
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();

    let post = state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| post_not_found(post_id))?;

    if post.author_id != identity.user_id {
        return Err(AppError::Forbidden);
    }

    state.likes.remove_by_post(post_id).await?;
    state.bookmarks.remove_by_post(post_id).await?;
    state.reports.remove_by_post(post_id).await?;
    state.comments.remove_by_post(post_id).await?;
    state.posts.delete(post_id).await?;

    tracing::info!(%post_id, "post deleted");
    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/posts/{id}/like - Protected route.
pub async fn toggle_like(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let outcome = state
        .engagement_ledger
        .toggle_like(path.into_inner(), identity.user_id)
        .await?;

    Ok(HttpResponse::Ok().json(LikeToggleResponse {
        liked: outcome.liked,
        likes_count: outcome.likes_count,
    }))
}

/// POST /api/posts/{id}/bookmark - Protected route.
pub async fn toggle_bookmark(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let bookmarked = state
        .engagement_ledger
        .toggle_bookmark(path.into_inner(), identity.user_id)
        .await?;

    Ok(HttpResponse::Ok().json(ToggleBookmarkResponse { bookmarked }))
}

/// POST /api/posts/{id}/report - Protected route.
pub async fn report(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<ReportPostRequest>,
) -> AppResult<HttpResponse> {
    state
        .engagement_ledger
        .report(path.into_inner(), identity.user_id, body.into_inner().reason)
        .await?;

    Ok(HttpResponse::Created().finish())
}

/// GET /api/posts/{id}/likes
pub async fn likes(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let entries = state.engagement_ledger.likes(path.into_inner()).await?;

    let dtos: Vec<PostLikeDto> = entries
        .into_iter()
        .map(|e| PostLikeDto {
            user_id: e.user_id,
            username: e.username,
            created_at: e.created_at,
        })
        .collect();

    Ok(HttpResponse::Ok().json(dtos))
}

/// GET /api/posts/{id}/stats
pub async fn stats(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let stats = state.engagement_ledger.stats(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(PostStatsDto {
        post_id: stats.post_id,
        likes_count: stats.likes_count,
        bookmarks_count: stats.bookmarks_count,
        reports_count: stats.reports_count,
        comments_count: stats.comments_count,
    }))
}

async fn to_comment_dto(state: &AppState, comment: Comment) -> AppResult<CommentDto> {
    let author_name = state
        .users
        .find_by_id(comment.author_id)
        .await?
        .map(|u| u.username)
        .unwrap_or_else(|| "unknown".to_string());

    Ok(CommentDto {
        id: comment.id,
        post_id: comment.post_id,
        author_id: comment.author_id,
        author_name,
        content: comment.content,
        created_at: comment.created_at,
    })
}

/// GET /api/posts/{id}/comments
pub async fn list_comments(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();

    if state.posts.find_by_id(post_id).await?.is_none() {
        return Err(post_not_found(post_id));
    }

    let mut dtos = Vec::new();
    for comment in state.comments.find_by_post(post_id).await? {
        dtos.push(to_comment_dto(&state, comment).await?);
    }

    Ok(HttpResponse::Ok().json(dtos))
}

/// POST /api/posts/{id}/comments - Protected route.
pub async fn create_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let req = body.into_inner();

    if req.content.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Comment content is required".to_string(),
        ));
    }

    if state.posts.find_by_id(post_id).await?.is_none() {
        return Err(post_not_found(post_id));
    }

    let comment = state
        .comments
        .insert(Comment::new(post_id, identity.user_id, req.content))
        .await?;

    let dto = to_comment_dto(&state, comment).await?;
    Ok(HttpResponse::Created().json(dto))
}

/// DELETE /api/posts/{id}/comments/{comment_id} - Protected route;
/// comment author only.
pub async fn delete_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();

    let comment = state
        .comments
        .find_by_id(comment_id)
        .await?
        .filter(|c| c.post_id == post_id)
        .ok_or_else(|| AppError::NotFound(format!("comment with id {comment_id} not found")))?;

    if comment.author_id != identity.user_id {
        return Err(AppError::Forbidden);
    }

    state.comments.remove(comment_id).await?;

    Ok(HttpResponse::NoContent().finish())
}
