mod config;
mod domain;
mod infrastructure;
mod presentation;
mod shared;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, patch, post},
    Router,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::presentation::handlers::{
    admin_handlers, auth_handlers, calendar_handlers, meeting_handlers, notification_handlers,
    task_handlers, task_message_handlers, user_handlers,
};
use crate::presentation::middleware::auth_middleware;

use crate::config::AppConfig;
use crate::infrastructure::Schedulers;
use crate::shared::{AppState, Result};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    init_tracing();

    // Load configuration
    let config = AppConfig::from_env()?;
    let bind_addr = config.bind_address();

    tracing::info!("Starting Taskchi Backend");
    tracing::info!("Environment: {:?}", config.server.environment);

    // Build the application
    let app = build_app(config).await?;

    // Start the server
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| shared::TaskchiError::Configuration {
            message: format!("Failed to bind to {}: {}", bind_addr, e),
        })?;

    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| shared::TaskchiError::Internal {
            message: format!("Server error: {}", e),
        })?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn build_app(config: AppConfig) -> Result<Router> {
    // Prometheus exposition for /metrics
    let metrics_handle = init_metrics()?;

    // Create shared application state with the database connection;
    // migrations run inside
    let app_state = Arc::new(AppState::new(config).await?);

    // Seed the development admin account on an empty database
    infrastructure::seed::seed_dev_admin(&app_state).await?;

    // Public auth routes
    let public_routes = Router::new().route("/auth/login", post(auth_handlers::login));

    // Protected API routes (require authentication)
    let protected_routes = Router::new()
        .route("/auth/logout", post(auth_handlers::logout))
        .route("/auth/me", get(auth_handlers::me))
        .route("/users/assignable", get(user_handlers::list_assignable))
        .route(
            "/admin/users",
            get(admin_handlers::list_users).post(admin_handlers::create_user),
        )
        .route(
            "/admin/users/:id/reset-password",
            patch(admin_handlers::reset_password),
        )
        .route(
            "/admin/users/:id/activate",
            patch(admin_handlers::activate_user),
        )
        .route("/admin/users/:id/manager", patch(admin_handlers::set_manager))
        .route(
            "/tasks",
            get(task_handlers::list_tasks).post(task_handlers::create_task),
        )
        .route(
            "/tasks/:id",
            patch(task_handlers::patch_task).delete(task_handlers::delete_task),
        )
        .route("/tasks/:id/request-close", post(task_handlers::request_close))
        .route("/tasks/:id/close", post(task_handlers::close_task))
        .route(
            "/tasks/:id/messages",
            get(task_message_handlers::list_messages).post(task_message_handlers::create_message),
        )
        .route("/me/tasks", get(task_handlers::list_my_tasks))
        .route("/notifications", get(notification_handlers::list_mine))
        .route(
            "/notifications/:id/read",
            post(notification_handlers::mark_read),
        )
        .route(
            "/meetings",
            get(meeting_handlers::list_meetings).post(meeting_handlers::create_meeting),
        )
        .route(
            "/meetings/:id",
            get(meeting_handlers::get_meeting)
                .put(meeting_handlers::update_meeting)
                .delete(meeting_handlers::delete_meeting),
        )
        .route(
            "/calendar/holidays/range",
            get(calendar_handlers::holidays_range),
        )
        .layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware::auth_middleware,
        ));

    let api = Router::new().merge(public_routes).merge(protected_routes);

    // Build the main router
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route(
            "/metrics",
            get(move || {
                let handle = metrics_handle.clone();
                async move { handle.render() }
            }),
        )
        .route("/", get(root_handler))
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(app_state.clone());

    // Start the reminder schedulers
    let mut schedulers = Schedulers::new(app_state);
    schedulers.start();

    Ok(app)
}

/// Health check endpoint - always returns healthy if the service is running
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "service": "taskchi-backend",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness check endpoint - checks if the service is ready to accept traffic
async fn readiness_check(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Json<Value>, StatusCode> {
    // Check database connectivity
    let db_status = match state.database.health_check().await {
        Ok(_) => "ok",
        Err(_) => "error",
    };

    let overall_status = if db_status == "ok" { "ready" } else { "not_ready" };

    let response = Json(json!({
        "status": overall_status,
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "service": "taskchi-backend",
        "version": env!("CARGO_PKG_VERSION"),
        "checks": {
            "database": db_status,
        }
    }));

    if overall_status == "ready" {
        Ok(response)
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}

/// Root handler - basic API information
async fn root_handler() -> Json<Value> {
    Json(json!({
        "service": "Taskchi Backend API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Task management backend with Jalali calendar support",
        "endpoints": {
            "health": "/health",
            "ready": "/ready",
            "metrics": "/metrics",
            "api": "/api"
        }
    }))
}

/// Initialize tracing/logging
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // Default log level based on environment
        if cfg!(debug_assertions) {
            "debug,hyper=info,tower=info".into()
        } else {
            "info".into()
        }
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(true),
        )
        .init();
}

/// Install the global Prometheus metrics recorder
fn init_metrics() -> Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| shared::TaskchiError::Configuration {
            message: format!("Failed to install metrics recorder: {}", e),
        })
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
