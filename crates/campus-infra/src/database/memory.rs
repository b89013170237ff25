//! In-memory repositories - used as fallback when no database is
//! configured. Data is lost on process restart.
//!
//! One shared store implements every repository port, enforcing the same
//! uniqueness rules the database schema declares: unique username and
//! email on users, and the natural-tuple keys on the relation tables.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use campus_core::domain::{
    Bookmark, Comment, Community, Like, Membership, Page, PageRequest, Post, Profile, Report, User,
};
use campus_core::error::RepoError;
use campus_core::ports::{
    BaseRepository, BookmarkRepository, CommentRepository, CommunityRepository, LikeRepository,
    MembershipRepository, PostRepository, ProfileRepository, ReportRepository, UserRepository,
};

/// Shared in-memory backing store.
#[derive(Default)]
pub struct InMemoryStore {
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

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        tracing::info!("Using in-memory repositories - data will not survive a restart");
        Arc::new(Self::default())
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn save(&self, entity: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;

        // Same uniqueness the schema enforces with unique indexes.
        let clash = users.values().any(|u| {
            u.id != entity.id && (u.username == entity.username || u.email == entity.email)
        });
        if clash {
            return Err(RepoError::Constraint(
                "username or email already taken".to_string(),
            ));
        }

        users.insert(entity.id, entity.clone());
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
impl UserRepository for InMemoryStore {
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
impl ProfileRepository for InMemoryStore {
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
impl BaseRepository<Community, Uuid> for InMemoryStore {
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
impl CommunityRepository for InMemoryStore {
    async fn find_all(&self) -> Result<Vec<Community>, RepoError> {
        let mut all: Vec<Community> = self.communities.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn search_by_name(&self, fragment: &str) -> Result<Vec<Community>, RepoError> {
        let needle = fragment.to_lowercase();
        let mut hits: Vec<Community> = self
            .communities
            .read()
            .await
            .values()
            .filter(|c| c.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        hits.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(hits)
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryStore {
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

/// Newest-first page over an unsorted snapshot.
fn page_newest_first(mut posts: Vec<Post>, request: PageRequest) -> Page<Post> {
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
impl PostRepository for InMemoryStore {
    async fn find_by_community(&self, community_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let mut posts: Vec<Post> = self
            .posts
            .read()
            .await
            .values()
            .filter(|p| p.community_id == community_id)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let mut posts: Vec<Post> = self
            .posts
            .read()
            .await
            .values()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn find_page(&self, page: PageRequest) -> Result<Page<Post>, RepoError> {
        Ok(page_newest_first(
            self.posts.read().await.values().cloned().collect(),
            page,
        ))
    }

    async fn find_by_ids(&self, ids: &[Uuid], page: PageRequest) -> Result<Page<Post>, RepoError> {
        let posts = self.posts.read().await;
        Ok(page_newest_first(
            ids.iter().filter_map(|id| posts.get(id).cloned()).collect(),
            page,
        ))
    }

    async fn find_by_communities(
        &self,
        community_ids: &[Uuid],
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        Ok(page_newest_first(
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
        Ok(page_newest_first(
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
impl MembershipRepository for InMemoryStore {
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
        let mut rows: Vec<Membership> = self
            .memberships
            .read()
            .await
            .values()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.joined_at.cmp(&a.joined_at));
        Ok(rows)
    }
}

#[async_trait]
impl LikeRepository for InMemoryStore {
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
        let mut rows: Vec<Like> = self
            .likes
            .read()
            .await
            .values()
            .filter(|l| l.post_id == post_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
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
impl BookmarkRepository for InMemoryStore {
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
        let mut rows: Vec<&Bookmark> = Vec::new();
        let bookmarks = self.bookmarks.read().await;
        for bookmark in bookmarks.values() {
            if bookmark.user_id == user_id {
                rows.push(bookmark);
            }
        }
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows.into_iter().map(|b| b.post_id).collect())
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
impl ReportRepository for InMemoryStore {
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
impl CommentRepository for InMemoryStore {
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
        let mut rows: Vec<Comment> = self
            .comments
            .read()
            .await
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(rows)
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

#[cfg(test)]
mod tests {
    use campus_core::ledger::{EngagementLedger, MembershipLedger};

    use super::*;

    #[tokio::test]
    async fn test_user_save_rejects_duplicate_username() {
        let store = InMemoryStore::new();

        let alice = User::new(
            "alice".to_string(),
            "alice@example.com".to_string(),
            "hash".to_string(),
        );
        store.save(alice).await.unwrap();

        let impostor = User::new(
            "alice".to_string(),
            "other@example.com".to_string(),
            "hash".to_string(),
        );
        let err = store.save(impostor).await.unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn test_membership_insert_enforces_tuple_uniqueness() {
        let store = InMemoryStore::new();
        let user_id = Uuid::new_v4();
        let community_id = Uuid::new_v4();

        MembershipRepository::insert(&*store, Membership::new(user_id, community_id))
            .await
            .unwrap();
        let err = MembershipRepository::insert(&*store, Membership::new(user_id, community_id))
            .await
            .unwrap_err();

        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn test_post_search_matches_title_and_content() {
        let store = InMemoryStore::new();
        let community_id = Uuid::new_v4();
        let author_id = Uuid::new_v4();

        BaseRepository::<Post, Uuid>::save(
            &*store,
            Post::new(
                community_id,
                author_id,
                "Rust meetup".to_string(),
                "join us".to_string(),
                None,
            ),
        )
        .await
        .unwrap();
        BaseRepository::<Post, Uuid>::save(
            &*store,
            Post::new(
                community_id,
                author_id,
                "Picnic".to_string(),
                "bring rustic bread".to_string(),
                None,
            ),
        )
        .await
        .unwrap();

        let page = store
            .search("rust", PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total, 2);
    }

    // End-to-end: the ledgers running against the in-memory store, the
    // same wiring the server uses without a database.
    #[tokio::test]
    async fn test_ledgers_against_in_memory_store() {
        let store = InMemoryStore::new();

        let alice = User::new(
            "alice".to_string(),
            "alice@example.com".to_string(),
            "hash".to_string(),
        );
        let alice_id = alice.id;
        store.save(alice).await.unwrap();

        let community = Community::new("rustaceans".to_string(), None, None);
        let community_id = community.id;
        BaseRepository::<Community, Uuid>::save(&*store, community)
            .await
            .unwrap();

        let membership_ledger = MembershipLedger::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
        );
        assert_eq!(membership_ledger.join(alice_id, community_id).await.unwrap(), 1);

        let post = Post::new(
            community_id,
            alice_id,
            "hello".to_string(),
            "world".to_string(),
            None,
        );
        let post_id = post.id;
        BaseRepository::<Post, Uuid>::save(&*store, post)
            .await
            .unwrap();

        let engagement_ledger = EngagementLedger::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
        );
        let outcome = engagement_ledger.toggle_like(post_id, alice_id).await.unwrap();
        assert!(outcome.liked);
        assert_eq!(outcome.likes_count, 1);

        let stored = BaseRepository::<Post, Uuid>::find_by_id(&*store, post_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.likes_count, 1);
    }
}
