use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use auth::BearerGate;
use axum::body::Body;
use axum::http::HeaderValue;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::AllowOrigin;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::count_posts_by_user::count_posts_by_user;
use super::handlers::create_post::create_post;
use super::handlers::delete_post::delete_post;
use super::handlers::delete_user::delete_user;
use super::handlers::get_post::get_post;
use super::handlers::get_user::get_user;
use super::handlers::list_posts::list_posts;
use super::handlers::list_users::list_users;
use super::handlers::login::login;
use super::handlers::me::me;
use super::handlers::signup::signup;
use super::handlers::update_post::update_post;
use super::handlers::update_user::update_user;
use super::middleware::require_bearer;
use crate::config::CorsConfig;
use crate::domain::post::ports::PostServicePort;
use crate::domain::user::ports::UserServicePort;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub post_service: Arc<dyn PostServicePort>,
    pub authenticator: Arc<Authenticator>,
    pub gate: BearerGate,
}

pub fn create_router(
    user_service: Arc<dyn UserServicePort>,
    post_service: Arc<dyn PostServicePort>,
    authenticator: Arc<Authenticator>,
    cors: &CorsConfig,
) -> Router {
    let state = AppState {
        user_service,
        post_service,
        gate: authenticator.gate(),
        authenticator,
    };

    let public_routes = Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login));

    let protected_routes = Router::new()
        .route("/auth/me", get(me))
        .route("/api/users", get(list_users))
        .route(
            "/api/users/:user_id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/api/posts", post(create_post).get(list_posts))
        .route(
            "/api/posts/:post_id",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route("/api/stats/posts-by-user", get(count_posts_by_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_bearer,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(cors_layer(cors))
        .with_state(state)
}

fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    if cors.is_permissive() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
