#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};

    use campus_core::domain::{Membership, Post};
    use campus_core::ports::{BaseRepository, LikeRepository, MembershipRepository, UserRepository};

    use crate::database::entity::{membership, post, user};
    use crate::database::postgres_repo::{
        PostgresLikeRepository, PostgresMembershipRepository, PostgresPostRepository,
        PostgresUserRepository,
    };

    #[tokio::test]
    async fn test_find_post_by_id() {
        let post_id = uuid::Uuid::new_v4();
        let community_id = uuid::Uuid::new_v4();
        let author_id = uuid::Uuid::new_v4();
        let now = chrono::Utc::now();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post::Model {
                id: post_id,
                community_id,
                author_id,
                title: "Test Post".to_owned(),
                content: "Content".to_owned(),
                image_url: None,
                likes_count: 0,
                created_at: now.into(),
                updated_at: now.into(),
            }]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

        assert!(result.is_some());
        let found = result.unwrap();
        assert_eq!(found.title, "Test Post");
        assert_eq!(found.id, post_id);
        assert_eq!(found.community_id, community_id);
    }

    #[tokio::test]
    async fn test_find_user_by_username() {
        let user_id = uuid::Uuid::new_v4();
        let now = chrono::Utc::now();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![user::Model {
                id: user_id,
                username: "alice".to_owned(),
                email: "alice@example.com".to_owned(),
                password_hash: "hash".to_owned(),
                created_at: now.into(),
                updated_at: now.into(),
            }]])
            .into_connection();

        let repo = PostgresUserRepository::new(db);

        let user = repo.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(user.id, user_id);
        assert_eq!(user.email, "alice@example.com");
    }

    #[tokio::test]
    async fn test_find_membership_by_composite_key() {
        let user_id = uuid::Uuid::new_v4();
        let community_id = uuid::Uuid::new_v4();
        let now = chrono::Utc::now();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![membership::Model {
                user_id,
                community_id,
                role: Membership::DEFAULT_ROLE.to_owned(),
                joined_at: now.into(),
            }]])
            .into_connection();

        let repo = PostgresMembershipRepository::new(db);

        let found = repo.find(user_id, community_id).await.unwrap().unwrap();
        assert_eq!(found.user_id, user_id);
        assert_eq!(found.community_id, community_id);
        assert_eq!(found.role, "Member");
    }

    #[tokio::test]
    async fn test_count_likes_by_post() {
        let row = BTreeMap::from([("num_items", Into::<Value>::into(3i64))]);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![row]])
            .into_connection();

        let repo = PostgresLikeRepository::new(db);

        let count = repo.count_by_post(uuid::Uuid::new_v4()).await.unwrap();
        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn test_remove_membership_reports_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = PostgresMembershipRepository::new(db);

        let err = repo
            .remove(uuid::Uuid::new_v4(), uuid::Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, campus_core::error::RepoError::NotFound));
    }
}
