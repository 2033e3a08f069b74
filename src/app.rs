use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers::{auth, customers, health, posts, products, sales};
use crate::state::AppState;

/// Full application: API routes, static SPA fallback and global middleware
pub fn app(state: AppState) -> Router {
    let static_dir = state.config.server.static_dir.clone();
    let spa = ServeDir::new(&static_dir).fallback(ServeFile::new(static_dir.join("index.html")));
    let cors = cors_layer(&state.config.security);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .merge(auth_routes())
        .merge(product_routes())
        .merge(customer_routes())
        .merge(sale_routes())
        .merge(post_routes())
        .fallback_service(spa)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/:id",
            get(products::get).put(products::update).delete(products::delete),
        )
        .route("/products/:id/sales", get(products::sales))
}

fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/customers", get(customers::list).post(customers::create))
        .route(
            "/customers/:id",
            get(customers::get).put(customers::update).delete(customers::delete),
        )
        .route("/customers/:id/sales", get(customers::sales))
}

fn sale_routes() -> Router<AppState> {
    Router::new()
        .route("/sales", get(sales::list).post(sales::create))
        .route(
            "/sales/:id",
            get(sales::get).put(sales::update).delete(sales::delete),
        )
}

fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(posts::list).post(posts::create))
        .route(
            "/posts/:id",
            get(posts::get).put(posts::update).delete(posts::delete),
        )
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
