use serde::Serialize;

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: &'static str,
    /// Storage backend in use.
    #[schema(example = "sqlite")]
    pub database: &'static str,
}
