//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbConn, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};
use uuid::Uuid;

use campus_core::domain::{
    Bookmark, Comment, Community, Like, Membership, Page, PageRequest, Post, Profile, Report, User,
};
use campus_core::error::RepoError;
use campus_core::ports::{
    BookmarkRepository, CommentRepository, CommunityRepository, LikeRepository,
    MembershipRepository, PostRepository, ProfileRepository, ReportRepository, UserRepository,
};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::community::{self, Entity as CommunityEntity};
use super::entity::membership::{self, Entity as MembershipEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_bookmark::{self, Entity as BookmarkEntity};
use super::entity::post_like::{self, Entity as LikeEntity};
use super::entity::post_report::{self, Entity as ReportEntity};
use super::entity::profile::{self, Entity as ProfileEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL community repository.
pub type PostgresCommunityRepository = PostgresBaseRepository<CommunityEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

fn query_err(e: DbErr) -> RepoError {
    RepoError::Query(e.to_string())
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        // Mask email for logging to avoid PII in logs
        let masked = if let Some(at_pos) = email.find('@') {
            let (local, domain) = email.split_at(at_pos);
            let masked_local = if local.len() > 1 {
                format!("{}***", &local[..1])
            } else {
                "***".to_string()
            };
            format!("{}{}", masked_local, domain)
        } else {
            "***".to_string()
        };
        tracing::debug!(user_email = %masked, "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl CommunityRepository for PostgresCommunityRepository {
    async fn find_all(&self) -> Result<Vec<Community>, RepoError> {
        let result = CommunityEntity::find()
            .order_by_asc(community::Column::Name)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn search_by_name(&self, fragment: &str) -> Result<Vec<Community>, RepoError> {
        let result = CommunityEntity::find()
            .filter(community::Column::Name.contains(fragment))
            .order_by_asc(community::Column::Name)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

async fn fetch_page(
    query: sea_orm::Select<PostEntity>,
    db: &DbConn,
    page: PageRequest,
) -> Result<Page<Post>, RepoError> {
    let paginator = query
        .order_by_desc(post::Column::CreatedAt)
        .paginate(db, page.per_page);

    let total = paginator.num_items().await.map_err(query_err)?;
    let models = paginator.fetch_page(page.page).await.map_err(query_err)?;

    Ok(Page {
        items: models.into_iter().map(Into::into).collect(),
        page: page.page,
        per_page: page.per_page,
        total,
    })
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_community(&self, community_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::CommunityId.eq(community_id))
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_page(&self, page: PageRequest) -> Result<Page<Post>, RepoError> {
        fetch_page(PostEntity::find(), &self.db, page).await
    }

    async fn find_by_ids(&self, ids: &[Uuid], page: PageRequest) -> Result<Page<Post>, RepoError> {
        if ids.is_empty() {
            return Ok(Page::empty(page));
        }

        fetch_page(
            PostEntity::find().filter(post::Column::Id.is_in(ids.iter().copied())),
            &self.db,
            page,
        )
        .await
    }

    async fn find_by_communities(
        &self,
        community_ids: &[Uuid],
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        if community_ids.is_empty() {
            return Ok(Page::empty(page));
        }

        fetch_page(
            PostEntity::find()
                .filter(post::Column::CommunityId.is_in(community_ids.iter().copied())),
            &self.db,
            page,
        )
        .await
    }

    async fn search(&self, query: &str, page: PageRequest) -> Result<Page<Post>, RepoError> {
        fetch_page(
            PostEntity::find().filter(
                Condition::any()
                    .add(post::Column::Title.contains(query))
                    .add(post::Column::Content.contains(query)),
            ),
            &self.db,
            page,
        )
        .await
    }
}

/// PostgreSQL profile repository.
pub struct PostgresProfileRepository {
    db: DbConn,
}

impl PostgresProfileRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfileRepository for PostgresProfileRepository {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Profile>, RepoError> {
        let result = ProfileEntity::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn upsert(&self, p: Profile) -> Result<Profile, RepoError> {
        let active: profile::ActiveModel = p.into();

        match active.clone().update(&self.db).await {
            Ok(model) => Ok(model.into()),
            Err(DbErr::RecordNotUpdated) => {
                let model = active.insert(&self.db).await.map_err(map_db_err)?;
                Ok(model.into())
            }
            Err(e) => Err(map_db_err(e)),
        }
    }
}

/// PostgreSQL membership repository.
pub struct PostgresMembershipRepository {
    db: DbConn,
}

impl PostgresMembershipRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MembershipRepository for PostgresMembershipRepository {
    async fn find(
        &self,
        user_id: Uuid,
        community_id: Uuid,
    ) -> Result<Option<Membership>, RepoError> {
        let result = MembershipEntity::find_by_id((user_id, community_id))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn insert(&self, m: Membership) -> Result<Membership, RepoError> {
        let active: membership::ActiveModel = m.into();
        let model = active.insert(&self.db).await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn remove(&self, user_id: Uuid, community_id: Uuid) -> Result<(), RepoError> {
        let result = MembershipEntity::delete_by_id((user_id, community_id))
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn count_by_community(&self, community_id: Uuid) -> Result<u64, RepoError> {
        MembershipEntity::find()
            .filter(membership::Column::CommunityId.eq(community_id))
            .count(&self.db)
            .await
            .map_err(query_err)
    }

    async fn find_by_community(&self, community_id: Uuid) -> Result<Vec<Membership>, RepoError> {
        let result = MembershipEntity::find()
            .filter(membership::Column::CommunityId.eq(community_id))
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Membership>, RepoError> {
        let result = MembershipEntity::find()
            .filter(membership::Column::UserId.eq(user_id))
            .order_by_desc(membership::Column::JoinedAt)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

/// PostgreSQL like repository.
pub struct PostgresLikeRepository {
    db: DbConn,
}

impl PostgresLikeRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LikeRepository for PostgresLikeRepository {
    async fn find(&self, post_id: Uuid, user_id: Uuid) -> Result<Option<Like>, RepoError> {
        let result = LikeEntity::find_by_id((post_id, user_id))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn insert(&self, like: Like) -> Result<Like, RepoError> {
        let active: post_like::ActiveModel = like.into();
        let model = active.insert(&self.db).await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn remove(&self, post_id: Uuid, user_id: Uuid) -> Result<(), RepoError> {
        let result = LikeEntity::delete_by_id((post_id, user_id))
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn count_by_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        LikeEntity::find()
            .filter(post_like::Column::PostId.eq(post_id))
            .count(&self.db)
            .await
            .map_err(query_err)
    }

    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Like>, RepoError> {
        let result = LikeEntity::find()
            .filter(post_like::Column::PostId.eq(post_id))
            .order_by_desc(post_like::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn post_ids_by_user(&self, user_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        let result = LikeEntity::find()
            .filter(post_like::Column::UserId.eq(user_id))
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(|l| l.post_id).collect())
    }

    async fn remove_by_post(&self, post_id: Uuid) -> Result<(), RepoError> {
        LikeEntity::delete_many()
            .filter(post_like::Column::PostId.eq(post_id))
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        Ok(())
    }
}

/// PostgreSQL bookmark repository.
pub struct PostgresBookmarkRepository {
    db: DbConn,
}

impl PostgresBookmarkRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookmarkRepository for PostgresBookmarkRepository {
    async fn find(&self, post_id: Uuid, user_id: Uuid) -> Result<Option<Bookmark>, RepoError> {
        let result = BookmarkEntity::find_by_id((post_id, user_id))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn insert(&self, bookmark: Bookmark) -> Result<Bookmark, RepoError> {
        let active: post_bookmark::ActiveModel = bookmark.into();
        let model = active.insert(&self.db).await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn remove(&self, post_id: Uuid, user_id: Uuid) -> Result<(), RepoError> {
        let result = BookmarkEntity::delete_by_id((post_id, user_id))
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn count_by_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        BookmarkEntity::find()
            .filter(post_bookmark::Column::PostId.eq(post_id))
            .count(&self.db)
            .await
            .map_err(query_err)
    }

    async fn post_ids_by_user(&self, user_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        let result = BookmarkEntity::find()
            .filter(post_bookmark::Column::UserId.eq(user_id))
            .order_by_desc(post_bookmark::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(|b| b.post_id).collect())
    }

    async fn remove_by_post(&self, post_id: Uuid) -> Result<(), RepoError> {
        BookmarkEntity::delete_many()
            .filter(post_bookmark::Column::PostId.eq(post_id))
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        Ok(())
    }
}

/// PostgreSQL report repository.
pub struct PostgresReportRepository {
    db: DbConn,
}

impl PostgresReportRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReportRepository for PostgresReportRepository {
    async fn exists(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, RepoError> {
        let count = ReportEntity::find()
            .filter(post_report::Column::PostId.eq(post_id))
            .filter(post_report::Column::UserId.eq(user_id))
            .count(&self.db)
            .await
            .map_err(query_err)?;

        Ok(count > 0)
    }

    async fn insert(&self, report: Report) -> Result<Report, RepoError> {
        let active: post_report::ActiveModel = report.into();
        let model = active.insert(&self.db).await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn count_by_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        ReportEntity::find()
            .filter(post_report::Column::PostId.eq(post_id))
            .count(&self.db)
            .await
            .map_err(query_err)
    }

    async fn remove_by_post(&self, post_id: Uuid) -> Result<(), RepoError> {
        ReportEntity::delete_many()
            .filter(post_report::Column::PostId.eq(post_id))
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        Ok(())
    }
}

/// PostgreSQL comment repository.
pub struct PostgresCommentRepository {
    db: DbConn,
}

impl PostgresCommentRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        let result = CommentEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn insert(&self, c: Comment) -> Result<Comment, RepoError> {
        let active: comment::ActiveModel = c.into();
        let model = active.insert(&self.db).await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn remove(&self, id: Uuid) -> Result<(), RepoError> {
        let result = CommentEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count_by_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .count(&self.db)
            .await
            .map_err(query_err)
    }

    async fn remove_by_post(&self, post_id: Uuid) -> Result<(), RepoError> {
        CommentEntity::delete_many()
            .filter(comment::Column::PostId.eq(post_id))
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        Ok(())
    }
}
