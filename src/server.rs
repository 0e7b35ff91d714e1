use actix_web::{web, HttpServer};
use error_stack::{Result, ResultExt};
use thiserror::Error;
use tracing_actix_web::TracingLogger;

use crate::{config, http, App};

#[derive(Debug, Error)]
#[error("Failed to start the HTTP server")]
pub struct StartServerError;

/// Runs the HTTP server until it is shut down.
pub async fn run(config: config::Server) -> Result<(), StartServerError> {
    let address = (config.address, config.port);
    let workers = config.workers.get();

    let app = App::new(config).await.change_context(StartServerError)?;
    let prefix = app.config.api_prefix.clone();

    tracing::info!(address = %address.0, port = address.1, %prefix, "starting HTTP server");

    HttpServer::new(move || {
        actix_web::App::new()
            .app_data(web::Data::new(app.clone()))
            .wrap(TracingLogger::default())
            .configure(|cfg| http::controllers::configure(cfg, &prefix))
    })
    .workers(workers)
    .bind(address)
    .change_context(StartServerError)
    .attach_printable_lazy(|| format!("could not bind to {}:{}", address.0, address.1))?
    .run()
    .await
    .change_context(StartServerError)
}
