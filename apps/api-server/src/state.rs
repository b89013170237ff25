//! Application state - shared across all handlers.

use std::sync::Arc;

use campus_core::ledger::{EngagementLedger, MembershipLedger};
use campus_core::ports::{
    BookmarkRepository, CommentRepository, CommunityRepository, LikeRepository,
    MembershipRepository, PostRepository, ProfileRepository, ReportRepository, UserRepository,
};
use campus_infra::database::{DatabaseConfig, InMemoryStore};

// The postgres wiring clones the `DatabaseConnection` once per repository.
// `sea-orm` only derives `Clone` for `DatabaseConnection` when its `mock`
// feature is off, and that feature is pulled in (via workspace feature
// unification) whenever the test profile builds campus-infra's dev-deps. The
// postgres path is never exercised under test, so gate it on `not(test)` to
// keep the test-profile build clone-free; the production build is unchanged.
#[cfg(all(feature = "postgres", not(test)))]
use campus_infra::database::{
    DatabaseConnections, PostgresBookmarkRepository, PostgresCommentRepository,
    PostgresCommunityRepository, PostgresLikeRepository, PostgresMembershipRepository,
    PostgresPostRepository, PostgresProfileRepository, PostgresReportRepository,
    PostgresUserRepository,
};

/// Shared application state: one handle per repository port plus the two
/// ledgers wired on top of them.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub communities: Arc<dyn CommunityRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub memberships: Arc<dyn MembershipRepository>,
    pub likes: Arc<dyn LikeRepository>,
    pub bookmarks: Arc<dyn BookmarkRepository>,
    pub reports: Arc<dyn ReportRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub membership_ledger: Arc<MembershipLedger>,
    pub engagement_ledger: Arc<EngagementLedger>,
}

struct Repositories {
    users: Arc<dyn UserRepository>,
    profiles: Arc<dyn ProfileRepository>,
    communities: Arc<dyn CommunityRepository>,
    posts: Arc<dyn PostRepository>,
    memberships: Arc<dyn MembershipRepository>,
    likes: Arc<dyn LikeRepository>,
    bookmarks: Arc<dyn BookmarkRepository>,
    reports: Arc<dyn ReportRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        #[cfg(all(feature = "postgres", not(test)))]
        {
            if let Some(config) = db_config {
                match DatabaseConnections::init(config).await {
                    Ok(connections) => {
                        let state = Self::wire(Self::postgres_repositories(connections));
                        tracing::info!("Application state initialized (postgres)");
                        return state;
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory fallback.",
                            e
                        );
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running with in-memory repositories.");
            }
        }

        #[cfg(not(all(feature = "postgres", not(test))))]
        {
            let _ = db_config;
            tracing::info!("Built without postgres feature - using in-memory repositories");
        }

        let state = Self::wire(Self::in_memory_repositories());
        tracing::info!("Application state initialized (in-memory)");
        state
    }

    fn in_memory_repositories() -> Repositories {
        let store = InMemoryStore::new();
        Repositories {
            users: store.clone(),
            profiles: store.clone(),
            communities: store.clone(),
            posts: store.clone(),
            memberships: store.clone(),
            likes: store.clone(),
            bookmarks: store.clone(),
            reports: store.clone(),
            comments: store,
        }
    }

    #[cfg(all(feature = "postgres", not(test)))]
    fn postgres_repositories(connections: DatabaseConnections) -> Repositories {
        let db = connections.main;
        Repositories {
            users: Arc::new(PostgresUserRepository::new(db.clone())),
            profiles: Arc::new(PostgresProfileRepository::new(db.clone())),
            communities: Arc::new(PostgresCommunityRepository::new(db.clone())),
            posts: Arc::new(PostgresPostRepository::new(db.clone())),
            memberships: Arc::new(PostgresMembershipRepository::new(db.clone())),
            likes: Arc::new(PostgresLikeRepository::new(db.clone())),
            bookmarks: Arc::new(PostgresBookmarkRepository::new(db.clone())),
            reports: Arc::new(PostgresReportRepository::new(db.clone())),
            comments: Arc::new(PostgresCommentRepository::new(db)),
        }
    }

    fn wire(repos: Repositories) -> Self {
        let membership_ledger = Arc::new(MembershipLedger::new(
            repos.communities.clone(),
            repos.memberships.clone(),
            repos.users.clone(),
            repos.profiles.clone(),
        ));
        let engagement_ledger = Arc::new(EngagementLedger::new(
            repos.posts.clone(),
            repos.users.clone(),
            repos.likes.clone(),
            repos.bookmarks.clone(),
            repos.reports.clone(),
            repos.comments.clone(),
        ));

        Self {
            users: repos.users,
            profiles: repos.profiles,
            communities: repos.communities,
            posts: repos.posts,
            memberships: repos.memberships,
            likes: repos.likes,
            bookmarks: repos.bookmarks,
            reports: repos.reports,
            comments: repos.comments,
            membership_ledger,
            engagement_ledger,
        }
    }
}
