use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::domain::revocation::ListFetcher;
use crate::server::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub ok: bool,
    pub service: String,
}

pub async fn health_check<F: ListFetcher>(State(state): State<AppState<F>>) -> Json<HealthStatus> {
    Json(HealthStatus {
        ok: true,
        service: state.service_name.to_string(),
    })
}
