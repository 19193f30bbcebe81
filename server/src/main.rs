mod config;
mod routes;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = config::ServerConfig::from_env().expect("invalid server configuration");
    if let Some(backend) = &config.backend {
        tracing::info!(project = backend.project_ref(), url = %backend.url, "hosted backend configured");
    }

    let app = routes::leptos_app().expect("failed to build app router");
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(port = config.port, "agenda listening");
    axum::serve(listener, app).await.expect("server failed");
}
