mod handlers;

use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use chub_kernel::server::ApiState;

/// Customer endpoints under `/customers`.
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::create_customer))
        .routes(routes!(handlers::get_customers))
        .routes(routes!(handlers::get_customer_by_id))
        .routes(routes!(handlers::get_customers_by_emails))
}
