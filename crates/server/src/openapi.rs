use axum::Json;
use utoipa::OpenApi;

use crate::routes::public::{CheckLimitResponse, RegisterResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::public::check_limit,
        crate::routes::public::register,
    ),
    components(schemas(CheckLimitResponse, RegisterResponse)),
    tags(
        (name = "health"),
        (name = "registration")
    )
)]
pub struct ApiDoc;

/// `GET /api-docs/openapi.json` handler.
pub async fn serve() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
