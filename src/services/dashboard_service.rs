// src/services/dashboard_service.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::{MaterialStore, UserStore},
    models::{
        auth::{SessionContext, SUPER_ADMIN},
        dashboard::Statistics,
    },
};

#[derive(Clone)]
pub struct DashboardService {
    users: Arc<dyn UserStore>,
    materials: Arc<dyn MaterialStore>,
}

impl DashboardService {
    pub fn new(users: Arc<dyn UserStore>, materials: Arc<dyn MaterialStore>) -> Self {
        Self { users, materials }
    }

    pub async fn statistics(&self, ctx: &SessionContext) -> Result<Statistics, AppError> {
        ctx.require(SUPER_ADMIN)?;
        let (total_users, total_materi) = tokio::try_join!(self.users.count(), self.materials.count())?;
        Ok(Statistics { total_users, total_materi })
    }
}
