use axum::{middleware, Router};
use std::sync::Arc;

use domain_orders::{OrderService, PgOrderRepository};
use domain_products::{PgProductRepository, ProductService};
use domain_statuses::{PgStatusRepository, StatusService};
use domain_users::{auth_handlers, AuthState, PgUserRepository, UserService};

pub mod health;

/// Composes the API routes without the version prefix; `create_router`
/// nests the result under `/api/v1`.
///
/// Each domain gets its service wired to the shared connection pool.
/// The auth middleware is layered onto exactly the routers that need a
/// principal; catalog browsing, registration, and login stay public.
pub fn routes(state: &crate::state::AppState) -> Router {
    let users_service = UserService::new(PgUserRepository::new(state.db.clone()));
    let products_service = Arc::new(ProductService::new(PgProductRepository::new(
        state.db.clone(),
    )));
    let statuses_service = StatusService::new(PgStatusRepository::new(state.db.clone()));
    let orders_service = Arc::new(OrderService::new(
        PgOrderRepository::new(state.db.clone()),
        PgProductRepository::new(state.db.clone()),
        PgStatusRepository::new(state.db.clone()),
    ));

    let auth_state = AuthState {
        service: users_service.clone(),
        jwt: state.jwt.clone(),
    };
    let users_service = Arc::new(users_service);

    let require_auth = middleware::from_fn_with_state(
        auth_state.clone(),
        auth_handlers::auth_middleware::<PgUserRepository>,
    );

    Router::new()
        .merge(auth_handlers::router(auth_state))
        .nest(
            "/users",
            domain_users::handlers::public_router(users_service.clone())
                .merge(
                    domain_users::handlers::protected_router(users_service)
                        .layer(require_auth.clone()),
                )
                .merge(
                    domain_orders::handlers::user_orders_router(orders_service.clone())
                        .layer(require_auth.clone()),
                ),
        )
        .nest(
            "/products",
            domain_products::handlers::public_router(products_service.clone()).merge(
                domain_products::handlers::admin_router(products_service)
                    .layer(require_auth.clone()),
            ),
        )
        .nest(
            "/orders",
            domain_orders::handlers::router(orders_service).layer(require_auth.clone()),
        )
        .nest(
            "/statuses",
            domain_statuses::handlers::router(statuses_service).layer(require_auth),
        )
}

/// Router with the `/ready` endpoint performing a real database probe.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
