use std::sync::Arc;

use async_trait::async_trait;

use super::{Requirement, RequirementError};
use crate::session::Session;

/// Passes only when the session holds credentials.
pub struct LoginRequirement {
    session: Arc<Session>,
}

impl LoginRequirement {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl Requirement for LoginRequirement {
    async fn execute(&self) -> Result<(), RequirementError> {
        let logged_in = self
            .session
            .logged_in()
            .map_err(|e| RequirementError::Lookup(e.to_string()))?;
        if logged_in {
            Ok(())
        } else {
            Err(RequirementError::NotLoggedIn)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fails_when_logged_out() {
        let session = Arc::new(Session::open(":memory:").unwrap());
        let requirement = LoginRequirement::new(session);
        assert_eq!(
            requirement.execute().await,
            Err(RequirementError::NotLoggedIn)
        );
    }

    #[tokio::test]
    async fn passes_when_logged_in() {
        let session = Arc::new(Session::open(":memory:").unwrap());
        session.login("admin", "secret-token").unwrap();
        let requirement = LoginRequirement::new(session);
        assert_eq!(requirement.execute().await, Ok(()));
    }
}
