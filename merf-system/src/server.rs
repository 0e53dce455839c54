use std::sync::Arc;

use actix_easy_multipart::MultipartFormConfig;
use colored::Colorize;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::api;
use crate::infrastructure::{config::build_config, initialize_telemetry, ServiceProvider};

pub fn run() {
    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(x) => x,
        Err(e) => {
            return eprintln!("{}: {}", "Cannot build tokio runtime".red(), e);
        }
    };
    runtime.block_on(async_run());
}

pub async fn async_run() {
    let config = match build_config() {
        Ok(x) => x,
        Err(e) => {
            return eprintln!("{}: {}", "Cannot build config".red(), e);
        }
    };
    if let Err(e) = initialize_telemetry(&config.telemetry) {
        return eprintln!("{}: {}", "Cannot build logger".red(), e);
    };
    let service_provider = match ServiceProvider::build(config).await {
        Ok(x) => Arc::new(x),
        Err(e) => {
            return eprintln!("{}: {}", "Cannot build Service Provider".red(), e);
        }
    };

    let handles = service_provider
        .outbox_runner
        .clone()
        .into_iter()
        .map(|runner| tokio::spawn(async move { runner.run().await }))
        .collect::<Vec<JoinHandle<()>>>();
    tokio::select! {
        _ = initialize_web_host(service_provider) => {

        }
        _ = tokio::signal::ctrl_c() => {
            info!("Stoping Services (ctrl-c handling).");
            for handle in handles {
                handle.abort()
            }
            std::process::exit(0);
        }
    }
}

pub async fn initialize_web_host(sp: Arc<ServiceProvider>) {
    let host = sp.config.host.clone();
    let upload_limit = host.upload_limit_mb * 1024 * 1024;
    let server = actix_web::HttpServer::new(move || {
        let cors = actix_cors::Cors::default()
            .allow_any_origin()
            .allow_any_header()
            .allow_any_method()
            .max_age(86400);

        actix_web::App::new()
            .wrap(tracing_actix_web::TracingLogger::default())
            .wrap(cors)
            .app_data(MultipartFormConfig::default().total_limit(upload_limit))
            .app_data(actix_web::web::Data::from(sp.clone()))
            .service(api::request_form::submit)
            .service(api::admin::login)
            .service(api::admin::logout)
            .service(api::admin::list_pending)
            .service(api::admin::list_all)
            .service(api::admin::approve)
            .service(api::admin::return_request)
            .service(api::admin::export_csv)
            .service(api::admin::download_document)
    })
    .bind((host.bind_address.to_owned(), host.bind_port));
    let server = match server {
        Ok(x) => x,
        Err(e) => return error!("Cannot bind {}:{}: {}", host.bind_address, host.bind_port, e),
    };
    info!("Listening on {}:{}.", host.bind_address, host.bind_port);
    match server.disable_signals().run().await {
        Ok(_) => info!("Web server stopped successfully."),
        Err(e) => error!("Web server into error: {}", e),
    }
}
