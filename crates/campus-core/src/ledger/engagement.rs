//! Engagement ledger - toggle-style like/bookmark relations plus
//! append-only reports, with derived counts on posts.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Bookmark, Like, LikeEntry, LikeOutcome, Post, PostStats, Report};
use crate::error::DomainError;
use crate::ports::{
    BookmarkRepository, CommentRepository, LikeRepository, PostRepository, ReportRepository,
    UserRepository,
};

use super::lock::KeyedLock;

/// Maintains like/bookmark/report rows for posts and keeps
/// `Post::likes_count` equal to the like row count after every toggle.
pub struct EngagementLedger {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    likes: Arc<dyn LikeRepository>,
    bookmarks: Arc<dyn BookmarkRepository>,
    reports: Arc<dyn ReportRepository>,
    comments: Arc<dyn CommentRepository>,
    locks: KeyedLock,
}

impl EngagementLedger {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        likes: Arc<dyn LikeRepository>,
        bookmarks: Arc<dyn BookmarkRepository>,
        reports: Arc<dyn ReportRepository>,
        comments: Arc<dyn CommentRepository>,
    ) -> Self {
        Self {
            posts,
            users,
            likes,
            bookmarks,
            reports,
            comments,
            locks: KeyedLock::new(),
        }
    }

    /// Like the post if the user has not liked it, unlike it otherwise.
    /// Either way the likes counter is recomputed from the like relation
    /// and persisted before returning.
    pub async fn toggle_like(
        &self,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<LikeOutcome, DomainError> {
        let _guard = self.locks.acquire(post_id).await;

        let mut post =
            self.posts
                .find_by_id(post_id)
                .await?
                .ok_or(DomainError::NotFound {
                    entity_type: "post",
                    id: post_id,
                })?;

        let (liked, existing) = match self.likes.find(post_id, user_id).await? {
            Some(like) => {
                self.likes.remove(post_id, user_id).await?;
                (false, Some(like))
            }
            None => {
                self.likes.insert(Like::new(post_id, user_id)).await?;
                (true, None)
            }
        };

        // Recompute runs on both branches - the counter must never go
        // stale relative to the relation rows. If the counter cannot be
        // persisted, undo the relation write.
        let count = match self.recount(&mut post).await {
            Ok(count) => count,
            Err(e) => {
                let undo = match existing {
                    Some(like) => self.likes.insert(like).await.map(|_| ()),
                    None => self.likes.remove(post_id, user_id).await,
                };
                if let Err(undo) = undo {
                    tracing::error!(%post_id, %user_id, error = %undo, "failed to undo like toggle");
                }
                return Err(e);
            }
        };

        tracing::debug!(%post_id, %user_id, liked, likes_count = count, "like toggled");
        Ok(LikeOutcome {
            liked,
            likes_count: count,
        })
    }

    /// Recompute the likes count from the like relation and persist it
    /// on the post.
    async fn recount(&self, post: &mut Post) -> Result<u64, DomainError> {
        let count = self.likes.count_by_post(post.id).await?;
        post.likes_count = count as i32;
        self.posts.save(post.clone()).await?;
        Ok(count)
    }

    /// Bookmark the post if not bookmarked, remove the bookmark otherwise.
    /// Returns the new state. Bookmarks carry no cached counter on the
    /// post; counts are computed on demand by [`Self::stats`].
    pub async fn toggle_bookmark(
        &self,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, DomainError> {
        let _guard = self.locks.acquire(post_id).await;

        if self.posts.find_by_id(post_id).await?.is_none() {
            return Err(DomainError::NotFound {
                entity_type: "post",
                id: post_id,
            });
        }

        let bookmarked = if self.bookmarks.find(post_id, user_id).await?.is_some() {
            self.bookmarks.remove(post_id, user_id).await?;
            false
        } else {
            self.bookmarks
                .insert(Bookmark::new(post_id, user_id))
                .await?;
            true
        };

        tracing::debug!(%post_id, %user_id, bookmarked, "bookmark toggled");
        Ok(bookmarked)
    }

    /// File a report against the post. A second report from the same
    /// user is rejected, not toggled.
    pub async fn report(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        reason: String,
    ) -> Result<Report, DomainError> {
        let reason = reason.trim().to_string();
        if reason.is_empty() {
            return Err(DomainError::Validation(
                "report reason must not be empty".to_string(),
            ));
        }

        let _guard = self.locks.acquire(post_id).await;

        if self.posts.find_by_id(post_id).await?.is_none() {
            return Err(DomainError::NotFound {
                entity_type: "post",
                id: post_id,
            });
        }

        if self.reports.exists(post_id, user_id).await? {
            return Err(DomainError::AlreadyReported);
        }

        let report = self
            .reports
            .insert(Report::new(post_id, user_id, reason))
            .await?;

        tracing::info!(%post_id, %user_id, "post reported");
        Ok(report)
    }

    /// Engagement snapshot for a post. The four counts are read
    /// independently, not under one transaction.
    pub async fn stats(&self, post_id: Uuid) -> Result<PostStats, DomainError> {
        if self.posts.find_by_id(post_id).await?.is_none() {
            return Err(DomainError::NotFound {
                entity_type: "post",
                id: post_id,
            });
        }

        let likes_count = self.likes.count_by_post(post_id).await?;
        let bookmarks_count = self.bookmarks.count_by_post(post_id).await?;
        let reports_count = self.reports.count_by_post(post_id).await?;
        let comments_count = self.comments.count_by_post(post_id).await?;

        Ok(PostStats {
            post_id,
            likes_count,
            bookmarks_count,
            reports_count,
            comments_count,
        })
    }

    /// Users who liked a post, resolved to usernames. Likes whose user no
    /// longer resolves are skipped.
    pub async fn likes(&self, post_id: Uuid) -> Result<Vec<LikeEntry>, DomainError> {
        if self.posts.find_by_id(post_id).await?.is_none() {
            return Err(DomainError::NotFound {
                entity_type: "post",
                id: post_id,
            });
        }

        let likes = self.likes.find_by_post(post_id).await?;

        let mut entries = Vec::with_capacity(likes.len());
        for like in likes {
            let Some(user) = self.users.find_by_id(like.user_id).await? else {
                continue;
            };
            entries.push(LikeEntry {
                user_id: like.user_id,
                username: user.username,
                created_at: like.created_at,
            });
        }

        Ok(entries)
    }

    /// Whether the user currently likes / has bookmarked the post.
    pub async fn engagement_flags(
        &self,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<(bool, bool), DomainError> {
        let liked = self.likes.find(post_id, user_id).await?.is_some();
        let bookmarked = self.bookmarks.find(post_id, user_id).await?.is_some();
        Ok((liked, bookmarked))
    }
}

#[cfg(test)]
mod tests {
    use super::super::fakes::Fixture;
    use crate::error::DomainError;

    #[tokio::test]
    async fn test_toggle_like_round_trip() {
        let fx = Fixture::new();
        let user = fx.seed_user("alice").await;
        let post = fx.seed_post("hello").await;
        let ledger = fx.engagement_ledger();

        let first = ledger.toggle_like(post, user).await.unwrap();
        assert!(first.liked);
        assert_eq!(first.likes_count, 1);

        let second = ledger.toggle_like(post, user).await.unwrap();
        assert!(!second.liked);
        assert_eq!(second.likes_count, 0);
        assert_eq!(fx.likes_count(post).await, 0);
    }

    #[tokio::test]
    async fn test_likes_count_matches_relation_after_every_toggle() {
        let fx = Fixture::new();
        let x = fx.seed_user("x").await;
        let y = fx.seed_user("y").await;
        let post = fx.seed_post("hello").await;
        let ledger = fx.engagement_ledger();

        let outcome = ledger.toggle_like(post, x).await.unwrap();
        assert!(outcome.liked);
        assert_eq!(outcome.likes_count, 1);
        assert_eq!(fx.likes_count(post).await, 1);

        let outcome = ledger.toggle_like(post, y).await.unwrap();
        assert!(outcome.liked);
        assert_eq!(outcome.likes_count, 2);
        assert_eq!(fx.likes_count(post).await, 2);

        let outcome = ledger.toggle_like(post, x).await.unwrap();
        assert!(!outcome.liked);
        assert_eq!(outcome.likes_count, 1);
        assert_eq!(fx.likes_count(post).await, 1);
    }

    #[tokio::test]
    async fn test_toggle_like_unknown_post_fails_with_not_found() {
        let fx = Fixture::new();
        let user = fx.seed_user("alice").await;
        let ledger = fx.engagement_ledger();

        let err = ledger
            .toggle_like(uuid::Uuid::new_v4(), user)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_concurrent_toggles_from_different_users() {
        let fx = Fixture::new();
        let x = fx.seed_user("x").await;
        let y = fx.seed_user("y").await;
        let post = fx.seed_post("hello").await;
        let ledger = fx.engagement_ledger();

        let (rx, ry) = tokio::join!(ledger.toggle_like(post, x), ledger.toggle_like(post, y));
        assert!(rx.unwrap().liked);
        assert!(ry.unwrap().liked);

        assert_eq!(fx.likes_count(post).await, 2);
    }

    #[tokio::test]
    async fn test_toggle_bookmark_round_trip() {
        let fx = Fixture::new();
        let user = fx.seed_user("alice").await;
        let post = fx.seed_post("hello").await;
        let ledger = fx.engagement_ledger();

        assert!(ledger.toggle_bookmark(post, user).await.unwrap());
        assert!(!ledger.toggle_bookmark(post, user).await.unwrap());
    }

    #[tokio::test]
    async fn test_report_duplicate_rejected_other_user_accepted() {
        let fx = Fixture::new();
        let x = fx.seed_user("x").await;
        let y = fx.seed_user("y").await;
        let post = fx.seed_post("hello").await;
        let ledger = fx.engagement_ledger();

        ledger.report(post, x, "spam".to_string()).await.unwrap();

        let err = ledger
            .report(post, x, "spam".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::AlreadyReported));

        ledger.report(post, y, "spam".to_string()).await.unwrap();

        let stats = ledger.stats(post).await.unwrap();
        assert_eq!(stats.reports_count, 2);
    }

    #[tokio::test]
    async fn test_report_empty_reason_rejected() {
        let fx = Fixture::new();
        let user = fx.seed_user("alice").await;
        let post = fx.seed_post("hello").await;
        let ledger = fx.engagement_ledger();

        let err = ledger.report(post, user, "  ".to_string()).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_stats_snapshot() {
        let fx = Fixture::new();
        let x = fx.seed_user("x").await;
        let y = fx.seed_user("y").await;
        let post = fx.seed_post("hello").await;
        let ledger = fx.engagement_ledger();

        ledger.toggle_like(post, x).await.unwrap();
        ledger.toggle_like(post, y).await.unwrap();
        ledger.toggle_bookmark(post, x).await.unwrap();
        ledger.report(post, y, "spam".to_string()).await.unwrap();

        let stats = ledger.stats(post).await.unwrap();
        assert_eq!(stats.likes_count, 2);
        assert_eq!(stats.bookmarks_count, 1);
        assert_eq!(stats.reports_count, 1);
        assert_eq!(stats.comments_count, 0);
    }

    #[tokio::test]
    async fn test_likes_resolved_to_usernames() {
        let fx = Fixture::new();
        let user = fx.seed_user("alice").await;
        let post = fx.seed_post("hello").await;
        let ledger = fx.engagement_ledger();

        ledger.toggle_like(post, user).await.unwrap();

        let entries = ledger.likes(post).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].username, "alice");
    }
}
