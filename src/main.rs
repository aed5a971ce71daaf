use axum::{
    routing::{get, post},
    Router,
};
use quotation_maker::{api, create_pool, db, AppConfig, QuotationService};
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    let config = AppConfig::from_env();
    info!("Starting server with config: {:?}", config);

    let pool = create_pool(&config.database.url).await?;
    db::ensure_schema(&pool).await?;
    info!("Database pool created, schema ready");

    let service = Arc::new(QuotationService::new(pool));

    let app = Router::new()
        .route("/api/health", get(api::health_check))
        .route(
            "/api/quotations",
            post(api::create_quotation).get(api::list_quotations),
        )
        .route(
            "/api/quotations/:id",
            get(api::get_quotation)
                .put(api::update_quotation)
                .delete(api::delete_quotation),
        )
        .route(
            "/api/quotations/number/:quotation_number",
            get(api::get_by_number),
        )
        .route(
            "/api/quotations/search/:client_name",
            get(api::search_quotations),
        )
        .layer(ServiceBuilder::new())
        .with_state(service);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST   /api/quotations                      - create");
    info!("  GET    /api/quotations                      - list all, newest first");
    info!("  GET    /api/quotations/:id                  - fetch by id");
    info!("  GET    /api/quotations/number/:number       - fetch by business key");
    info!("  PUT    /api/quotations/:id                  - update");
    info!("  DELETE /api/quotations/:id                  - delete");
    info!("  GET    /api/quotations/search/:client_name  - substring search");
    info!("  GET    /api/health                          - liveness + DB status");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
