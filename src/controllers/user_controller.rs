use std::sync::Arc;

use futures::future::join_all;
use tracing::info;

use crate::models::user::{UserDirectoryAggregate, UserFilters, UserProfile, UserRole};
use crate::repositories::UserDirectory;
use crate::utils::errors::AppResult;

pub struct UserController {
    directory: Arc<dyn UserDirectory>,
}

impl UserController {
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }

    pub async fn list_role(&self, role: UserRole, filters: &UserFilters) -> AppResult<Vec<UserProfile>> {
        let users = self.directory.list_by_role(role).await?;
        Ok(filters.apply(users))
    }

    /// Directorio completo: los cuatro roles en paralelo, tolerando fallos parciales
    pub async fn directory(&self, filters: &UserFilters) -> UserDirectoryAggregate {
        let fetches = UserRole::DIRECTORY.into_iter().map(|role| {
            let directory = Arc::clone(&self.directory);
            async move { (role, directory.list_by_role(role).await) }
        });

        let results = join_all(fetches).await;
        let mut aggregate = UserDirectoryAggregate::from_results(results);
        aggregate.users = filters.apply(std::mem::take(&mut aggregate.users));

        info!(
            "👥 Directorio de usuarios: {} usuarios, {} roles con error",
            aggregate.users.len(),
            aggregate.failed_roles.len()
        );

        aggregate
    }
}
