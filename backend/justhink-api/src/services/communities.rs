/// Communities and membership
use bson::oid::ObjectId;
use serde::Deserialize;

use crate::db::{CommunityRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::models::{Community, CommunityView};

/// Body of `POST /communities/create`
#[derive(Debug, Default, Deserialize)]
pub struct NewCommunity {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub bio: String,
    pub image: Option<String>,
    pub banner: Option<String>,
}

impl NewCommunity {
    fn into_community(self, founder: ObjectId) -> Result<Community> {
        if self.title.trim().is_empty() || self.bio.trim().is_empty() {
            return Err(AppError::Validation(
                "Title and bio of the community must be provided".to_string(),
            ));
        }
        Ok(Community::found(
            founder,
            self.title,
            self.bio,
            self.image,
            self.banner,
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipAction {
    Join,
    Leave,
}

impl MembershipAction {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "join" => Ok(MembershipAction::Join),
            "leave" => Ok(MembershipAction::Leave),
            _ => Err(AppError::NotFound("Not Found".to_string())),
        }
    }
}

#[derive(Clone)]
pub struct CommunityService {
    communities: CommunityRepository,
    users: UserRepository,
}

impl CommunityService {
    pub fn new(communities: CommunityRepository, users: UserRepository) -> Self {
        Self { communities, users }
    }

    pub async fn create(&self, founder: ObjectId, new_community: NewCommunity) -> Result<ObjectId> {
        let community = new_community.into_community(founder)?;
        let id = self.communities.insert(&community).await?;
        self.users.add_community(founder, id).await?;

        tracing::info!(community = %id, founder = %founder, "community created");
        Ok(id)
    }

    pub async fn find(&self, id: ObjectId, viewer: ObjectId) -> Result<CommunityView> {
        self.communities
            .find_view(id, viewer)
            .await?
            .ok_or_else(|| AppError::NotFound("Community Not Found".to_string()))
    }

    pub async fn of_member(&self, member: ObjectId, viewer: ObjectId) -> Result<Vec<CommunityView>> {
        self.communities.of_member(member, viewer).await
    }

    pub async fn membership_action(
        &self,
        action: MembershipAction,
        id: ObjectId,
        caller: ObjectId,
    ) -> Result<()> {
        let joined = self
            .communities
            .membership(id, caller)
            .await?
            .ok_or_else(|| AppError::NotFound("Community Not Found".to_string()))?;

        match action {
            MembershipAction::Join => {
                if joined {
                    return Err(AppError::Conflict("Community already joined".to_string()));
                }
                self.communities.add_member(id, caller).await?;
                self.users.add_community(caller, id).await?;
            }
            MembershipAction::Leave => {
                if !joined {
                    return Err(AppError::Conflict("Community already left".to_string()));
                }
                self.communities.remove_member(id, caller).await?;
                self.users.remove_community(caller, id).await?;
            }
        }

        tracing::debug!(community = %id, user = %caller, ?action, "membership updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_and_bio_required() {
        let new_community = NewCommunity {
            title: "Rust".into(),
            ..NewCommunity::default()
        };
        let err = new_community.into_community(ObjectId::new()).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_action_parse() {
        assert_eq!(MembershipAction::parse("join").unwrap(), MembershipAction::Join);
        assert!(matches!(
            MembershipAction::parse("ban"),
            Err(AppError::NotFound(_))
        ));
    }
}
