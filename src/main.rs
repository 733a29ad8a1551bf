use std::sync::Arc;

use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;
use dotenvy::dotenv;

use leave_actions::config::Config;
use leave_actions::docs::ApiDoc;
use leave_actions::leave::date_parser::NaturalDateParser;
use leave_actions::leave::flow::LeaveDesk;
use leave_actions::routes;
use leave_actions::store::backend::FileBackend;
use leave_actions::store::ledger::LeaveLedger;
use leave_actions::store::usage::{FileUsage, NoUsage, UsageProvider};

use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "leave_actions.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(ledger = %config.ledger_path.display(), "Leave action server starting...");

    let ledger = LeaveLedger::new(Arc::new(FileBackend::new(&config.ledger_path)));
    let usage: Arc<dyn UsageProvider> = match &config.usage_path {
        Some(path) => Arc::new(FileUsage::new(path)),
        None => Arc::new(NoUsage),
    };
    let desk = Data::new(LeaveDesk::new(ledger, usage, Arc::new(NaturalDateParser)));

    let limiter = Arc::new(
        routes::build_limiter(config.rate_actions_per_min)
            .context("RATE_ACTIONS_PER_MIN does not give a usable rate limit")?,
    );

    let server_addr = config.server_addr.clone();
    let workers = config.workers.max(1);

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(desk.clone())
            .configure(|cfg| routes::configure(cfg, &config, limiter.clone()))
    })
    .workers(workers)
    .bind(&server_addr)
    .with_context(|| format!("could not bind {server_addr}"))?
    .run()
    .await
    .context("leave action server stopped with an error")
}
