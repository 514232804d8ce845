use utoipa_axum::{router::OpenApiRouter, routes};

use crate::handlers;
use crate::state::AppState;

/// Routes mounted under `/api`.
pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::login))
        .routes(routes!(
            handlers::student::create_submission,
            handlers::student::list_submissions
        ))
        .merge(admin_routes())
}

fn admin_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::admin::admin_login))
        .routes(routes!(handlers::admin::list_submissions))
        .routes(routes!(handlers::admin::export_submissions))
}

/// Routes served outside the `/api` prefix.
pub fn root_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::health::health))
}
