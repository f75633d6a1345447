use sea_orm::DatabaseConnection;

/// Outcome of a connectivity probe, reported by the readiness endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Unhealthy(String),
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }
}

/// Ping the database connection pool.
pub async fn check_health(db: &DatabaseConnection) -> HealthStatus {
    match db.ping().await {
        Ok(()) => HealthStatus::Healthy,
        Err(e) => HealthStatus::Unhealthy(e.to_string()),
    }
}
