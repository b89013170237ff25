//! In-memory port fakes backing the ledger unit tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{
    Bookmark, Comment, Community, Like, Membership, Page, PageRequest, Post, Profile, Report, User,
};
use crate::error::RepoError;
use crate::ports::{
    BaseRepository, BookmarkRepository, CommentRepository, CommunityRepository, LikeRepository,
    MembershipRepository, PostRepository, ProfileRepository, ReportRepository, UserRepository,
};

use super::{EngagementLedger, MembershipLedger};

/// One shared in-memory store implementing every repository port.
#[derive(Default)]
pub(crate) struct MemStore {
    users: RwLock<HashMap<Uuid, User>>,
    profiles: RwLock<HashMap<Uuid, Profile>>,
    communities: RwLock<HashMap<Uuid, Community>>,
    posts: RwLock<HashMap<Uuid, Post>>,
    memberships: RwLock<HashMap<(Uuid, Uuid), Membership>>,
    likes: RwLock<HashMap<(Uuid, Uuid), Like>>,
    bookmarks: RwLock<HashMap<(Uuid, Uuid), Bookmark>>,
    reports: RwLock<Vec<Report>>,
    comments: RwLock<HashMap<Uuid, Comment>>,
}

#[async_trait]
impl BaseRepository<User, Uuid> for MemStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn save(&self, entity: User) -> Result<User, RepoError> {
        self.users.write().await.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.users
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl UserRepository for MemStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

#[async_trait]
impl ProfileRepository for MemStore {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Profile>, RepoError> {
        Ok(self.profiles.read().await.get(&user_id).cloned())
    }

    async fn upsert(&self, profile: Profile) -> Result<Profile, RepoError> {
        self.profiles
            .write()
            .await
            .insert(profile.user_id, profile.clone());
        Ok(profile)
    }
}

#[async_trait]
impl BaseRepository<Community, Uuid> for MemStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Community>, RepoError> {
        Ok(self.communities.read().await.get(&id).cloned())
    }

    async fn save(&self, entity: Community) -> Result<Community, RepoError> {
        self.communities
            .write()
            .await
            .insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.communities
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl CommunityRepository for MemStore {
    async fn find_all(&self) -> Result<Vec<Community>, RepoError> {
        Ok(self.communities.read().await.values().cloned().collect())
    }

    async fn search_by_name(&self, fragment: &str) -> Result<Vec<Community>, RepoError> {
        let needle = fragment.to_lowercase();
        Ok(self
            .communities
            .read()
            .await
            .values()
            .filter(|c| c.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for MemStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.posts.read().await.get(&id).cloned())
    }

    async fn save(&self, entity: Post) -> Result<Post, RepoError> {
        self.posts.write().await.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.posts
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

fn page_of(mut posts: Vec<Post>, request: PageRequest) -> Page<Post> {
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let total = posts.len() as u64;
    let items = posts
        .into_iter()
        .skip(request.offset() as usize)
        .take(request.per_page as usize)
        .collect();
    Page {
        items,
        page: request.page,
        per_page: request.per_page,
        total,
    }
}

#[async_trait]
impl PostRepository for MemStore {
    async fn find_by_community(&self, community_id: Uuid) -> Result<Vec<Post>, RepoError> {
        Ok(self
            .posts
            .read()
            .await
            .values()
            .filter(|p| p.community_id == community_id)
            .cloned()
            .collect())
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        Ok(self
            .posts
            .read()
            .await
            .values()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect())
    }

    async fn find_page(&self, page: PageRequest) -> Result<Page<Post>, RepoError> {
        Ok(page_of(
            self.posts.read().await.values().cloned().collect(),
            page,
        ))
    }

    async fn find_by_ids(&self, ids: &[Uuid], page: PageRequest) -> Result<Page<Post>, RepoError> {
        let posts = self.posts.read().await;
        Ok(page_of(
            ids.iter().filter_map(|id| posts.get(id).cloned()).collect(),
            page,
        ))
    }

    async fn find_by_communities(
        &self,
        community_ids: &[Uuid],
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        Ok(page_of(
            self.posts
                .read()
                .await
                .values()
                .filter(|p| community_ids.contains(&p.community_id))
                .cloned()
                .collect(),
            page,
        ))
    }

    async fn search(&self, query: &str, page: PageRequest) -> Result<Page<Post>, RepoError> {
        let needle = query.to_lowercase();
        Ok(page_of(
            self.posts
                .read()
                .await
                .values()
                .filter(|p| {
                    p.title.to_lowercase().contains(&needle)
                        || p.content.to_lowercase().contains(&needle)
                })
                .cloned()
                .collect(),
            page,
        ))
    }
}

#[async_trait]
impl MembershipRepository for MemStore {
    async fn find(
        &self,
        user_id: Uuid,
        community_id: Uuid,
    ) -> Result<Option<Membership>, RepoError> {
        Ok(self
            .memberships
            .read()
            .await
            .get(&(user_id, community_id))
            .cloned())
    }

    async fn insert(&self, membership: Membership) -> Result<Membership, RepoError> {
        let mut rows = self.memberships.write().await;
        let key = (membership.user_id, membership.community_id);
        if rows.contains_key(&key) {
            return Err(RepoError::Constraint("membership exists".to_string()));
        }
        rows.insert(key, membership.clone());
        Ok(membership)
    }

    async fn remove(&self, user_id: Uuid, community_id: Uuid) -> Result<(), RepoError> {
        self.memberships
            .write()
            .await
            .remove(&(user_id, community_id))
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }

    async fn count_by_community(&self, community_id: Uuid) -> Result<u64, RepoError> {
        Ok(self
            .memberships
            .read()
            .await
            .values()
            .filter(|m| m.community_id == community_id)
            .count() as u64)
    }

    async fn find_by_community(&self, community_id: Uuid) -> Result<Vec<Membership>, RepoError> {
        Ok(self
            .memberships
            .read()
            .await
            .values()
            .filter(|m| m.community_id == community_id)
            .cloned()
            .collect())
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Membership>, RepoError> {
        Ok(self
            .memberships
            .read()
            .await
            .values()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl LikeRepository for MemStore {
    async fn find(&self, post_id: Uuid, user_id: Uuid) -> Result<Option<Like>, RepoError> {
        Ok(self.likes.read().await.get(&(post_id, user_id)).cloned())
    }

    async fn insert(&self, like: Like) -> Result<Like, RepoError> {
        let mut rows = self.likes.write().await;
        let key = (like.post_id, like.user_id);
        if rows.contains_key(&key) {
            return Err(RepoError::Constraint("like exists".to_string()));
        }
        rows.insert(key, like.clone());
        Ok(like)
    }

    async fn remove(&self, post_id: Uuid, user_id: Uuid) -> Result<(), RepoError> {
        self.likes
            .write()
            .await
            .remove(&(post_id, user_id))
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }

    async fn count_by_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        Ok(self
            .likes
            .read()
            .await
            .values()
            .filter(|l| l.post_id == post_id)
            .count() as u64)
    }

    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Like>, RepoError> {
        Ok(self
            .likes
            .read()
            .await
            .values()
            .filter(|l| l.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn post_ids_by_user(&self, user_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        Ok(self
            .likes
            .read()
            .await
            .values()
            .filter(|l| l.user_id == user_id)
            .map(|l| l.post_id)
            .collect())
    }

    async fn remove_by_post(&self, post_id: Uuid) -> Result<(), RepoError> {
        self.likes.write().await.retain(|_, l| l.post_id != post_id);
        Ok(())
    }
}

#[async_trait]
impl BookmarkRepository for MemStore {
    async fn find(&self, post_id: Uuid, user_id: Uuid) -> Result<Option<Bookmark>, RepoError> {
        Ok(self
            .bookmarks
            .read()
            .await
            .get(&(post_id, user_id))
            .cloned())
    }

    async fn insert(&self, bookmark: Bookmark) -> Result<Bookmark, RepoError> {
        let mut rows = self.bookmarks.write().await;
        let key = (bookmark.post_id, bookmark.user_id);
        if rows.contains_key(&key) {
            return Err(RepoError::Constraint("bookmark exists".to_string()));
        }
        rows.insert(key, bookmark.clone());
        Ok(bookmark)
    }

    async fn remove(&self, post_id: Uuid, user_id: Uuid) -> Result<(), RepoError> {
        self.bookmarks
            .write()
            .await
            .remove(&(post_id, user_id))
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }

    async fn count_by_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        Ok(self
            .bookmarks
            .read()
            .await
            .values()
            .filter(|b| b.post_id == post_id)
            .count() as u64)
    }

    async fn post_ids_by_user(&self, user_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        Ok(self
            .bookmarks
            .read()
            .await
            .values()
            .filter(|b| b.user_id == user_id)
            .map(|b| b.post_id)
            .collect())
    }

    async fn remove_by_post(&self, post_id: Uuid) -> Result<(), RepoError> {
        self.bookmarks
            .write()
            .await
            .retain(|_, b| b.post_id != post_id);
        Ok(())
    }
}

#[async_trait]
impl ReportRepository for MemStore {
    async fn exists(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, RepoError> {
        Ok(self
            .reports
            .read()
            .await
            .iter()
            .any(|r| r.post_id == post_id && r.user_id == user_id))
    }

    async fn insert(&self, report: Report) -> Result<Report, RepoError> {
        let mut rows = self.reports.write().await;
        if rows
            .iter()
            .any(|r| r.post_id == report.post_id && r.user_id == report.user_id)
        {
            return Err(RepoError::Constraint("report exists".to_string()));
        }
        rows.push(report.clone());
        Ok(report)
    }

    async fn count_by_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        Ok(self
            .reports
            .read()
            .await
            .iter()
            .filter(|r| r.post_id == post_id)
            .count() as u64)
    }

    async fn remove_by_post(&self, post_id: Uuid) -> Result<(), RepoError> {
        self.reports.write().await.retain(|r| r.post_id != post_id);
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for MemStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.comments.read().await.get(&id).cloned())
    }

    async fn insert(&self, comment: Comment) -> Result<Comment, RepoError> {
        self.comments
            .write()
            .await
            .insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn remove(&self, id: Uuid) -> Result<(), RepoError> {
        self.comments
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }

    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let mut comments: Vec<Comment> = self
            .comments
            .read()
            .await
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments)
    }

    async fn count_by_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        Ok(self
            .comments
            .read()
            .await
            .values()
            .filter(|c| c.post_id == post_id)
            .count() as u64)
    }

    async fn remove_by_post(&self, post_id: Uuid) -> Result<(), RepoError> {
        self.comments
            .write()
            .await
            .retain(|_, c| c.post_id != post_id);
        Ok(())
    }
}

/// Test fixture: one shared store plus seed helpers.
pub(crate) struct Fixture {
    pub(crate) store: Arc<MemStore>,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        Self {
            store: Arc::new(MemStore::default()),
        }
    }

    pub(crate) fn membership_ledger(&self) -> MembershipLedger {
        MembershipLedger::new(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
        )
    }

    pub(crate) fn engagement_ledger(&self) -> EngagementLedger {
        EngagementLedger::new(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
        )
    }

    pub(crate) async fn seed_user(&self, username: &str) -> Uuid {
        let user = User::new(
            username.to_string(),
            format!("{username}@example.com"),
            "hash".to_string(),
        );
        let id = user.id;
        self.store.users.write().await.insert(id, user);
        id
    }

    pub(crate) async fn seed_community(&self, name: &str) -> Uuid {
        let community = Community::new(name.to_string(), None, None);
        let id = community.id;
        self.store.communities.write().await.insert(id, community);
        id
    }

    pub(crate) async fn seed_post(&self, title: &str) -> Uuid {
        let post = Post::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            title.to_string(),
            "content".to_string(),
            None,
        );
        let id = post.id;
        self.store.posts.write().await.insert(id, post);
        id
    }

    /// Persisted derived member count, as the ledger left it.
    pub(crate) async fn member_count(&self, community_id: Uuid) -> i64 {
        self.store
            .communities
            .read()
            .await
            .get(&community_id)
            .map(|c| c.member_count)
            .unwrap_or_default()
    }

    /// Persisted derived likes count, as the ledger left it.
    pub(crate) async fn likes_count(&self, post_id: Uuid) -> i32 {
        self.store
            .posts
            .read()
            .await
            .get(&post_id)
            .map(|p| p.likes_count)
            .unwrap_or_default()
    }
}
