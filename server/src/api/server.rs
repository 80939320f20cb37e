//! API server initialization

use std::net::SocketAddr;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::auth::{require_auth, AuthState};
use super::middleware::{self, AllowedOrigins};
use super::openapi::openapi_json;
use super::routes::{
    auth, chatbot, health, materials, notifications, students, teachers, timetable, users,
};
use crate::core::constants::{DEFAULT_BODY_LIMIT, UPLOAD_BODY_LIMIT};
use crate::core::CoreApp;

pub struct ApiServer {
    app: CoreApp,
    allowed_origins: AllowedOrigins,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        let allowed_origins = AllowedOrigins::new(&app.config.cors_origins);
        Self {
            app,
            allowed_origins,
        }
    }

    /// Returns CoreApp for graceful shutdown
    pub async fn start(self) -> Result<CoreApp> {
        let Self {
            app,
            allowed_origins,
        } = self;

        let host = app.config.server.host.clone();
        let port = app.config.server.port;
        let addr = SocketAddr::new(host.parse()?, port);

        let auth_state = AuthState {
            auth_manager: app.auth.clone(),
            database: app.database.clone(),
        };
        let with_auth = || {
            axum::middleware::from_fn_with_state(auth_state.clone(), require_auth)
        };

        // Public: login plus the health/openapi endpoints
        let auth_routes = auth::routes(app.auth.clone(), app.database.clone())
            .merge(auth::protected_routes(app.database.clone()).layer(with_auth()));

        // Protected resource groups; each carries the session-resolver layer
        let users_routes = users::routes(app.database.clone()).layer(with_auth());
        let students_routes = students::routes(app.database.clone()).layer(with_auth());
        let teachers_routes = teachers::routes(app.database.clone()).layer(with_auth());
        let timetable_routes = timetable::routes(app.database.clone()).layer(with_auth());
        let notifications_routes = notifications::routes(app.database.clone()).layer(with_auth());
        let sender_routes = notifications::sender_routes(app.database.clone()).layer(with_auth());
        let chat_routes = chatbot::routes(app.database.clone()).layer(with_auth());

        // Uploads get a bigger body limit than the JSON endpoints
        let materials_routes = materials::routes(app.database.clone(), app.files.clone())
            .layer(with_auth())
            .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT));

        let router = Router::new()
            .route("/health", get(health::health))
            .route("/api/openapi.json", get(openapi_json))
            .nest("/api/auth", auth_routes)
            .nest("/api/users", users_routes)
            .nest("/api/students", students_routes)
            .nest("/api/teachers", teachers_routes)
            .nest("/api/timetable", timetable_routes)
            .nest("/api/materials", materials_routes)
            .nest("/api/notifications", notifications_routes)
            .nest("/api/teacher/notifications", sender_routes)
            .nest("/api/chat", chat_routes)
            .nest_service("/uploads", ServeDir::new(app.files.root()))
            .fallback(middleware::handle_404)
            .layer(middleware::cors(&allowed_origins))
            .layer(TraceLayer::new_for_http())
            .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT));

        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Listening on http://{}", addr);

        let shutdown = app.shutdown.clone();
        let mut shutdown_rx = shutdown.subscribe();
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = shutdown_rx.changed() => {}
                }
            })
            .await?;

        shutdown.shutdown().await;
        Ok(app)
    }
}
