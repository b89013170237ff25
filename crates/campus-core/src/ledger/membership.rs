//! Membership ledger - the set of (user, community) memberships and the
//! derived per-community member count.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Community, JoinedCommunity, MemberProfile, Membership};
use crate::error::DomainError;
use crate::ports::{CommunityRepository, MembershipRepository, ProfileRepository, UserRepository};

use super::lock::KeyedLock;

/// Maintains membership rows and keeps `Community::member_count` equal to
/// the row count for that community after every join/leave.
pub struct MembershipLedger {
    communities: Arc<dyn CommunityRepository>,
    memberships: Arc<dyn MembershipRepository>,
    users: Arc<dyn UserRepository>,
    profiles: Arc<dyn ProfileRepository>,
    locks: KeyedLock,
}

impl MembershipLedger {
    pub fn new(
        communities: Arc<dyn CommunityRepository>,
        memberships: Arc<dyn MembershipRepository>,
        users: Arc<dyn UserRepository>,
        profiles: Arc<dyn ProfileRepository>,
    ) -> Self {
        Self {
            communities,
            memberships,
            users,
            profiles,
            locks: KeyedLock::new(),
        }
    }

    /// Add the user to the community and return the updated member count.
    pub async fn join(&self, user_id: Uuid, community_id: Uuid) -> Result<u64, DomainError> {
        let _guard = self.locks.acquire(community_id).await;

        let mut community = self.communities.find_by_id(community_id).await?.ok_or(
            DomainError::NotFound {
                entity_type: "community",
                id: community_id,
            },
        )?;

        if self.memberships.find(user_id, community_id).await?.is_some() {
            return Err(DomainError::AlreadyMember);
        }

        self.memberships
            .insert(Membership::new(user_id, community_id))
            .await?;

        // Full re-count from the relation, never an increment. If the
        // counter cannot be persisted, undo the relation write so the
        // operation commits either both writes or neither.
        let count = match self.recount(&mut community).await {
            Ok(count) => count,
            Err(e) => {
                if let Err(undo) = self.memberships.remove(user_id, community_id).await {
                    tracing::error!(%user_id, %community_id, error = %undo, "failed to undo join");
                }
                return Err(e);
            }
        };

        tracing::debug!(%user_id, %community_id, member_count = count, "user joined community");
        Ok(count)
    }

    /// Remove the user from the community and return the updated member count.
    pub async fn leave(&self, user_id: Uuid, community_id: Uuid) -> Result<u64, DomainError> {
        let _guard = self.locks.acquire(community_id).await;

        let Some(membership) = self.memberships.find(user_id, community_id).await? else {
            return Err(DomainError::NotMember);
        };

        let mut community = self.communities.find_by_id(community_id).await?.ok_or(
            DomainError::NotFound {
                entity_type: "community",
                id: community_id,
            },
        )?;

        self.memberships.remove(user_id, community_id).await?;

        let count = match self.recount(&mut community).await {
            Ok(count) => count,
            Err(e) => {
                if let Err(undo) = self.memberships.insert(membership).await {
                    tracing::error!(%user_id, %community_id, error = %undo, "failed to undo leave");
                }
                return Err(e);
            }
        };

        tracing::debug!(%user_id, %community_id, member_count = count, "user left community");
        Ok(count)
    }

    /// Recompute the member count from the membership relation and
    /// persist it on the community.
    async fn recount(&self, community: &mut Community) -> Result<u64, DomainError> {
        let count = self.memberships.count_by_community(community.id).await?;
        community.member_count = count as i64;
        self.communities.save(community.clone()).await?;
        Ok(count)
    }

    /// Whether the user currently belongs to the community.
    pub async fn is_member(&self, user_id: Uuid, community_id: Uuid) -> Result<bool, DomainError> {
        Ok(self.memberships.find(user_id, community_id).await?.is_some())
    }

    /// All members of a community, resolved to their public profile
    /// fields. Order is unspecified. Rows whose user no longer resolves
    /// are skipped.
    pub async fn members(&self, community_id: Uuid) -> Result<Vec<MemberProfile>, DomainError> {
        if self.communities.find_by_id(community_id).await?.is_none() {
            return Err(DomainError::NotFound {
                entity_type: "community",
                id: community_id,
            });
        }

        let relations = self.memberships.find_by_community(community_id).await?;

        let mut members = Vec::with_capacity(relations.len());
        for relation in relations {
            let Some(user) = self.users.find_by_id(relation.user_id).await? else {
                tracing::warn!(user_id = %relation.user_id, "membership row with no user, skipping");
                continue;
            };
            let profile = self.profiles.find_by_user_id(user.id).await?;

            members.push(MemberProfile {
                user_id: user.id,
                username: user.username,
                email: user.email,
                role: relation.role,
                joined_at: relation.joined_at,
                name: profile.as_ref().and_then(|p| p.name.clone()),
                university: profile.as_ref().and_then(|p| p.university.clone()),
                profile_pic_url: profile.and_then(|p| p.profile_pic_url),
            });
        }

        Ok(members)
    }

    /// All communities the user belongs to, annotated with role and
    /// joined_at, most recent join first.
    pub async fn memberships(&self, user_id: Uuid) -> Result<Vec<JoinedCommunity>, DomainError> {
        let mut relations = self.memberships.find_by_user(user_id).await?;
        relations.sort_by(|a, b| b.joined_at.cmp(&a.joined_at));

        let mut joined = Vec::with_capacity(relations.len());
        for relation in relations {
            let Some(community) = self.communities.find_by_id(relation.community_id).await? else {
                continue;
            };
            joined.push(JoinedCommunity {
                community,
                role: relation.role,
                joined_at: relation.joined_at,
            });
        }

        Ok(joined)
    }
}

#[cfg(test)]
mod tests {
    use super::super::fakes::Fixture;
    use crate::error::DomainError;

    #[tokio::test]
    async fn test_join_increments_member_count_by_one() {
        let fx = Fixture::new();
        let user = fx.seed_user("alice").await;
        let community = fx.seed_community("rustaceans").await;
        let ledger = fx.membership_ledger();

        let count = ledger.join(user, community).await.unwrap();

        assert_eq!(count, 1);
        assert_eq!(fx.member_count(community).await, 1);
    }

    #[tokio::test]
    async fn test_join_twice_fails_with_already_member() {
        let fx = Fixture::new();
        let user = fx.seed_user("alice").await;
        let community = fx.seed_community("rustaceans").await;
        let ledger = fx.membership_ledger();

        ledger.join(user, community).await.unwrap();
        let err = ledger.join(user, community).await.unwrap_err();

        assert!(matches!(err, DomainError::AlreadyMember));
        // The failed join must not disturb the counter.
        assert_eq!(fx.member_count(community).await, 1);
    }

    #[tokio::test]
    async fn test_join_unknown_community_fails_with_not_found() {
        let fx = Fixture::new();
        let user = fx.seed_user("alice").await;
        let ledger = fx.membership_ledger();

        let err = ledger.join(user, uuid::Uuid::new_v4()).await.unwrap_err();

        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_leave_non_member_fails_and_count_unchanged() {
        let fx = Fixture::new();
        let member = fx.seed_user("alice").await;
        let outsider = fx.seed_user("bob").await;
        let community = fx.seed_community("rustaceans").await;
        let ledger = fx.membership_ledger();

        ledger.join(member, community).await.unwrap();
        let err = ledger.leave(outsider, community).await.unwrap_err();

        assert!(matches!(err, DomainError::NotMember));
        assert_eq!(fx.member_count(community).await, 1);
    }

    #[tokio::test]
    async fn test_join_join_leave_scenario() {
        let fx = Fixture::new();
        let a = fx.seed_user("alice").await;
        let b = fx.seed_user("bob").await;
        let community = fx.seed_community("rustaceans").await;
        let ledger = fx.membership_ledger();

        assert_eq!(fx.member_count(community).await, 0);
        assert_eq!(ledger.join(a, community).await.unwrap(), 1);
        assert_eq!(ledger.join(b, community).await.unwrap(), 2);
        assert_eq!(ledger.leave(a, community).await.unwrap(), 1);

        let members = ledger.members(community).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].user_id, b);
        assert_eq!(members[0].username, "bob");
        assert_eq!(members[0].role, "Member");
    }

    #[tokio::test]
    async fn test_memberships_ordered_most_recent_first() {
        let fx = Fixture::new();
        let user = fx.seed_user("alice").await;
        let first = fx.seed_community("first").await;
        let second = fx.seed_community("second").await;
        let ledger = fx.membership_ledger();

        ledger.join(user, first).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        ledger.join(user, second).await.unwrap();

        let joined = ledger.memberships(user).await.unwrap();
        assert_eq!(joined.len(), 2);
        assert_eq!(joined[0].community.id, second);
        assert_eq!(joined[1].community.id, first);
        assert!(joined[0].joined_at >= joined[1].joined_at);
    }

    #[tokio::test]
    async fn test_concurrent_joins_from_different_users() {
        let fx = Fixture::new();
        let a = fx.seed_user("alice").await;
        let b = fx.seed_user("bob").await;
        let community = fx.seed_community("rustaceans").await;
        let ledger = std::sync::Arc::new(fx.membership_ledger());

        let (ra, rb) = tokio::join!(ledger.join(a, community), ledger.join(b, community));
        ra.unwrap();
        rb.unwrap();

        assert_eq!(fx.member_count(community).await, 2);
    }
}
