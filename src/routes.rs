use axum::{
    extract::{Request, State},
    middleware::{from_fn, Next},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::policy;
use crate::handlers::{auth, comments, materials, problems, solutions, tags, users};
use crate::middleware::{authenticate, require_roles};
use crate::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api/auth", auth_routes())
        .nest("/api/problems", problem_routes())
        .nest("/api/solutions", solution_routes())
        .nest("/api/comments", comment_routes())
        .nest("/api/tags", tag_routes())
        .nest("/api/materials", material_routes())
        .nest("/api/users", user_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

fn problem_routes() -> Router<AppState> {
    // Read is public; mutations require admin/interviewer, and update/delete
    // additionally apply the ownership policy in the handler.
    // Layer order: the last-added layer runs first, so authenticate precedes
    // the role check.
    let protected = Router::new()
        .route("/", post(problems::create_problem))
        .route("/:id", put(problems::update_problem).delete(problems::delete_problem))
        .route_layer(from_fn(|req: Request, next: Next| {
            require_roles(policy::CONTENT_MANAGERS, req, next)
        }))
        .route_layer(from_fn(authenticate));

    Router::new()
        .route("/", get(problems::list_problems))
        .route("/:id", get(problems::get_problem))
        .merge(protected)
}

fn solution_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(solutions::submit_solution))
        .route("/my", get(solutions::my_solutions))
        .route("/problem/:problemId", get(solutions::problem_solutions))
        .route_layer(from_fn(authenticate))
}

fn comment_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(comments::create_comment))
        .route("/problem/:problemId", get(comments::problem_comments))
        .route("/:id", put(comments::update_comment).delete(comments::delete_comment))
        .route_layer(from_fn(authenticate))
}

fn tag_routes() -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(tags::create_tag))
        .route("/:id", put(tags::update_tag).delete(tags::delete_tag))
        .route_layer(from_fn(|req: Request, next: Next| {
            require_roles(policy::CONTENT_MANAGERS, req, next)
        }))
        .route_layer(from_fn(authenticate));

    Router::new()
        .route("/", get(tags::list_tags))
        .route("/:id/problems", get(tags::tag_problems))
        .merge(protected)
}

fn material_routes() -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(materials::create_material))
        .route("/:id", put(materials::update_material).delete(materials::delete_material))
        .route_layer(from_fn(authenticate));

    Router::new()
        .route("/", get(materials::list_materials))
        .route("/:id", get(materials::get_material))
        .merge(protected)
}

fn user_routes() -> Router<AppState> {
    let staff_list = Router::new()
        .route("/", get(users::list_users))
        .route_layer(from_fn(|req: Request, next: Next| {
            require_roles(policy::USER_DIRECTORY, req, next)
        }));

    let admin_only = Router::new()
        .route("/:id/role", put(users::update_user_role))
        .route("/:id/deactivate", put(users::deactivate_user))
        .route_layer(from_fn(|req: Request, next: Next| {
            require_roles(policy::ADMIN_ONLY, req, next)
        }));

    let rating = Router::new()
        .route("/:id/rating", put(users::update_user_rating))
        .route_layer(from_fn(|req: Request, next: Next| {
            require_roles(policy::RATING_MANAGERS, req, next)
        }));

    Router::new()
        .route("/:id", get(users::get_user))
        .merge(staff_list)
        .merge(admin_only)
        .merge(rating)
        .route_layer(from_fn(authenticate))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Codedrill API",
            "version": version,
            "description": "Coding-practice platform backend",
            "endpoints": {
                "auth": "/api/auth/register, /api/auth/login, /api/auth/logout (public)",
                "problems": "/api/problems[/:id] (public read, admin/interviewer write)",
                "solutions": "/api/solutions, /api/solutions/my, /api/solutions/problem/:problemId (authenticated)",
                "comments": "/api/comments[/:id], /api/comments/problem/:problemId (authenticated)",
                "tags": "/api/tags[/:id] (public read, admin/interviewer write)",
                "materials": "/api/materials[/:id] (public read, authenticated write)",
                "users": "/api/users[/:id] (admin/interviewer list, authenticated profile)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match crate::db::health_check(&state.pool).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
