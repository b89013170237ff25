use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    Bookmark, Comment, Community, Like, Membership, Page, PageRequest, Post, Profile, Report, User,
};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations for
/// entities with a single surrogate key.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific lookups.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// Profile repository - one row per user.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Profile>, RepoError>;

    /// Insert or replace the profile for its user.
    async fn upsert(&self, profile: Profile) -> Result<Profile, RepoError>;
}

/// Community repository.
#[async_trait]
pub trait CommunityRepository: BaseRepository<Community, Uuid> {
    async fn find_all(&self) -> Result<Vec<Community>, RepoError>;

    /// Substring search on the community name.
    async fn search_by_name(&self, fragment: &str) -> Result<Vec<Community>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    async fn find_by_community(&self, community_id: Uuid) -> Result<Vec<Post>, RepoError>;

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError>;

    /// All posts, newest first.
    async fn find_page(&self, page: PageRequest) -> Result<Page<Post>, RepoError>;

    /// Posts whose id is in `ids`, newest first.
    async fn find_by_ids(&self, ids: &[Uuid], page: PageRequest) -> Result<Page<Post>, RepoError>;

    /// Posts belonging to any of `community_ids`, newest first.
    async fn find_by_communities(
        &self,
        community_ids: &[Uuid],
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError>;

    /// Substring search on title and content.
    async fn search(&self, query: &str, page: PageRequest) -> Result<Page<Post>, RepoError>;
}

/// Membership relation store, keyed by the natural (user, community) tuple.
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    async fn find(
        &self,
        user_id: Uuid,
        community_id: Uuid,
    ) -> Result<Option<Membership>, RepoError>;

    /// Insert a membership row. Fails with [`RepoError::Constraint`] if the
    /// pair already exists.
    async fn insert(&self, membership: Membership) -> Result<Membership, RepoError>;

    /// Delete a membership row. Fails with [`RepoError::NotFound`] if absent.
    async fn remove(&self, user_id: Uuid, community_id: Uuid) -> Result<(), RepoError>;

    /// Full count of membership rows for a community - the source of truth
    /// for the derived member count.
    async fn count_by_community(&self, community_id: Uuid) -> Result<u64, RepoError>;

    async fn find_by_community(&self, community_id: Uuid) -> Result<Vec<Membership>, RepoError>;

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Membership>, RepoError>;
}

/// Like relation store, keyed by (post, user).
#[async_trait]
pub trait LikeRepository: Send + Sync {
    async fn find(&self, post_id: Uuid, user_id: Uuid) -> Result<Option<Like>, RepoError>;

    async fn insert(&self, like: Like) -> Result<Like, RepoError>;

    async fn remove(&self, post_id: Uuid, user_id: Uuid) -> Result<(), RepoError>;

    /// Full count of like rows for a post - the source of truth for the
    /// derived likes count.
    async fn count_by_post(&self, post_id: Uuid) -> Result<u64, RepoError>;

    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Like>, RepoError>;

    async fn post_ids_by_user(&self, user_id: Uuid) -> Result<Vec<Uuid>, RepoError>;

    /// Delete all likes for a post (post deletion cleanup).
    async fn remove_by_post(&self, post_id: Uuid) -> Result<(), RepoError>;
}

/// Bookmark relation store, keyed by (post, user). No cached counter on
/// the post - counts are computed on demand.
#[async_trait]
pub trait BookmarkRepository: Send + Sync {
    async fn find(&self, post_id: Uuid, user_id: Uuid) -> Result<Option<Bookmark>, RepoError>;

    async fn insert(&self, bookmark: Bookmark) -> Result<Bookmark, RepoError>;

    async fn remove(&self, post_id: Uuid, user_id: Uuid) -> Result<(), RepoError>;

    async fn count_by_post(&self, post_id: Uuid) -> Result<u64, RepoError>;

    async fn post_ids_by_user(&self, user_id: Uuid) -> Result<Vec<Uuid>, RepoError>;

    async fn remove_by_post(&self, post_id: Uuid) -> Result<(), RepoError>;
}

/// Report store - append-only, unique on (post, user).
#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn exists(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, RepoError>;

    async fn insert(&self, report: Report) -> Result<Report, RepoError>;

    async fn count_by_post(&self, post_id: Uuid) -> Result<u64, RepoError>;

    async fn remove_by_post(&self, post_id: Uuid) -> Result<(), RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError>;

    async fn insert(&self, comment: Comment) -> Result<Comment, RepoError>;

    async fn remove(&self, id: Uuid) -> Result<(), RepoError>;

    /// Comments for a post, oldest first.
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;

    async fn count_by_post(&self, post_id: Uuid) -> Result<u64, RepoError>;

    async fn remove_by_post(&self, post_id: Uuid) -> Result<(), RepoError>;
}
