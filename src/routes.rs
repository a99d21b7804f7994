use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::{config, SecurityConfig};
use crate::handlers::{
    admin, cases, departments, email_reminders, mail, root, statistics, sub_departments,
};

/// Full application router with CORS and request tracing
pub fn app() -> Router {
    Router::new()
        // Probes
        .route("/", get(root::root))
        .route("/health", get(root::health))
        // Records
        .merge(case_routes())
        .merge(department_routes())
        .merge(sub_department_routes())
        .merge(reminder_routes())
        .route("/statistics", get(statistics::statistics))
        // Admin and utilities
        .route("/admin/login", post(admin::admin_login))
        .route("/admin/seed", post(admin::admin_seed))
        .route("/send-email", post(mail::send_email))
        // Global middleware
        .layer(cors_layer(&config().security))
        .layer(TraceLayer::new_for_http())
}

fn case_routes() -> Router {
    Router::new()
        .route("/cases", get(cases::case_list).post(cases::case_create))
        .route(
            "/cases/:id",
            get(cases::case_show).put(cases::case_update).delete(cases::case_delete),
        )
}

fn department_routes() -> Router {
    Router::new()
        .route("/departments", get(departments::department_list).post(departments::department_create))
        .route("/departments/:id", get(departments::department_show))
        .route("/seed-data", post(departments::department_seed))
}

fn sub_department_routes() -> Router {
    Router::new()
        .route(
            "/sub-departments",
            get(sub_departments::sub_department_list).post(sub_departments::sub_department_create),
        )
        .route(
            "/sub-departments/:id",
            get(sub_departments::sub_department_show)
                .put(sub_departments::sub_department_update)
                .delete(sub_departments::sub_department_delete),
        )
}

fn reminder_routes() -> Router {
    Router::new()
        .route("/email-reminders", post(email_reminders::reminder_create))
        .route("/email-reminders/case/:caseId", get(email_reminders::reminder_list))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
