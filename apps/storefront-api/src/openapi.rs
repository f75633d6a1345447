use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Storefront API",
        version = "0.1.0",
        description = "E-commerce backend: users, products, orders, and order statuses"
    ),
    servers(
        (url = "/api/v1", description = "API base path")
    ),
    nest(
        (path = "/", api = domain_users::auth_handlers::ApiDoc),
        (path = "/users", api = domain_users::handlers::ApiDoc),
        (path = "/products", api = domain_products::handlers::ApiDoc),
        (path = "/orders", api = domain_orders::handlers::ApiDoc),
        (path = "/statuses", api = domain_statuses::handlers::ApiDoc)
    )
)]
pub struct ApiDoc;
