/// Ownership checks for destructive operations
use bson::oid::ObjectId;

use crate::error::{AppError, Result};

/// Only the author may delete a post
pub fn check_post_ownership(user: ObjectId, author: ObjectId) -> Result<()> {
    check_ownership(user, author)
}

/// Only the author may delete a comment
pub fn check_comment_ownership(user: ObjectId, author: ObjectId) -> Result<()> {
    check_ownership(user, author)
}

fn check_ownership(user: ObjectId, author: ObjectId) -> Result<()> {
    if user == author {
        Ok(())
    } else {
        Err(AppError::Forbidden("Unauthorized".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_allowed() {
        let id = ObjectId::new();
        assert!(check_post_ownership(id, id).is_ok());
        assert!(check_comment_ownership(id, id).is_ok());
    }

    #[test]
    fn test_other_user_forbidden() {
        let err = check_post_ownership(ObjectId::new(), ObjectId::new()).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(ref m) if m == "Unauthorized"));
    }
}
