use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use dotenvy::dotenv;
use log::info;
use std::sync::Arc;

use cg_api::middleware::{create_cors, SecurityMiddleware};
use cg_api::routes;
use cg_api::state::build_state;
use cg_core::services::identity::ProviderIdentityBinder;
use cg_core::services::otp::Notifier;
use cg_infra::database::{create_pool, MySqlSessionStore};
use cg_infra::email::{MockNotifier, SmtpNotifier};
use cg_infra::identity::HttpIdentityProvider;
use cg_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    // One subscriber for everything: core and infra emit through
    // `tracing`, and the log bridge picks up this crate's `log` macros
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    info!(
        "Starting CodeGate API ({} environment)",
        config.environment
    );

    let pool = create_pool(&config.database)
        .await
        .expect("Failed to connect to the session database");
    let store = Arc::new(MySqlSessionStore::new(pool));

    let provider = Arc::new(
        HttpIdentityProvider::new(&config.identity)
            .expect("Failed to initialize the identity provider client"),
    );

    // The mock notifier prints codes to the console; anything staged or
    // deployed must use the SMTP relay.
    if config.smtp.use_mock {
        info!("Using mock notifier; codes will be printed to the console");
        run_server(store, Arc::new(MockNotifier::new()), provider, config).await
    } else {
        let notifier = Arc::new(
            SmtpNotifier::new(&config.smtp).expect("Failed to initialize the SMTP notifier"),
        );
        run_server(store, notifier, provider, config).await
    }
}

async fn run_server<N: Notifier + 'static>(
    store: Arc<MySqlSessionStore>,
    notifier: Arc<N>,
    provider: Arc<HttpIdentityProvider>,
    config: AppConfig,
) -> std::io::Result<()> {
    let bind_address = config.server.bind_address();
    let workers = config.server.workers;
    let state = web::Data::new(build_state(store, notifier, provider, config.otp.clone()));

    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .wrap(SecurityMiddleware::new())
            .app_data(state.clone())
            .route("/health", web::get().to(routes::health::health_check))
            .service(web::scope("/api/v1").configure(
                routes::otp::configure::<
                    MySqlSessionStore,
                    N,
                    HttpIdentityProvider,
                    ProviderIdentityBinder<HttpIdentityProvider>,
                >,
            ))
            .default_service(web::route().to(not_found))
    })
    .bind(&bind_address)?;

    if workers > 0 {
        server = server.workers(workers);
    }

    server.run().await
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "NOT_FOUND",
        "message": "The requested resource was not found"
    }))
}
