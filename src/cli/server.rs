use actix_web::{web, HttpServer};
use clap::Parser;
use error_stack::{Result, ResultExt};
use ripple::{config, http, telemetry, App};
use std::net::IpAddr;
use std::num::NonZeroUsize;
use thiserror::Error;
use tracing::info;
use tracing_actix_web::TracingLogger;

/// Expose the ripple API HTTP server
#[derive(Debug, Parser)]
pub struct ServerCommand {
    #[clap(long)]
    pub address: Option<IpAddr>,
    #[clap(long)]
    pub port: Option<u16>,
    #[clap(long)]
    pub workers: Option<NonZeroUsize>,
}

#[derive(Debug, Error)]
#[error("Could not start ripple HTTP server")]
pub struct StartServerError;

pub fn run(args: ServerCommand) -> Result<(), StartServerError> {
    let mut config = config::Server::load().change_context(StartServerError)?;
    args.override_config(&mut config);

    telemetry::init().change_context(StartServerError)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(config.workers)
        .build()
        .change_context(StartServerError)
        .attach_printable("could not build tokio runtime")?
        .block_on(start_server(config))
}

#[tracing::instrument(skip_all, name = "server.run")]
async fn start_server(config: config::Server) -> Result<(), StartServerError> {
    let app = App::new(config).await.change_context(StartServerError)?;

    app.primary_db
        .run_pending_migrations()
        .await
        .change_context(StartServerError)
        .attach_printable("could not apply pending database migrations")?;

    let workers = app.config.workers;
    let addr = (app.config.ip, app.config.port);

    info!(
        "ripple HTTP server is listening at http://{}:{} with {workers} workers",
        addr.0, addr.1
    );

    HttpServer::new(move || {
        actix_web::App::new()
            .app_data(web::Data::new(app.clone()))
            .wrap(TracingLogger::default())
            .configure(http::controllers::configure)
    })
    .workers(workers)
    .bind(addr)
    .change_context(StartServerError)
    .attach_printable("could not bind server with address and port")?
    .run()
    .await
    .change_context(StartServerError)
}

impl ServerCommand {
    fn override_config(&self, config: &mut config::Server) {
        // override server configurations if set by the cli
        if let Some(address) = self.address {
            config.ip = address;
        }

        if let Some(port) = self.port {
            config.port = port;
        }

        if let Some(workers) = self.workers {
            config.workers = workers.get();
        }
    }
}
