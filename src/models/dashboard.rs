// src/models/dashboard.rs

use serde::Serialize;
use utoipa::ToSchema;

// Cards do painel do super admin
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_users: i64,
    pub total_materi: i64,
}
