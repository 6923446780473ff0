use actix_web::{App, HttpServer, middleware, web};
use dotenvy::dotenv;

use storefront_admin::config::ServerConfig;
use storefront_admin::domain::permission::PermissionTable;
use storefront_admin::notify::MessageComposer;
use storefront_admin::repository::InMemoryRepository;
use storefront_admin::routes::configure;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let permissions = match &config.permissions_path {
        Some(path) => match PermissionTable::from_json_file(path) {
            Ok(table) => table,
            Err(e) => {
                log::error!("Failed to load permission table {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => PermissionTable::builtin(),
    };

    let repo = if config.snapshot_path.exists() {
        match InMemoryRepository::from_json_file(&config.snapshot_path) {
            Ok(repo) => repo,
            Err(e) => {
                log::error!("Failed to load snapshot: {e}");
                std::process::exit(1);
            }
        }
    } else {
        log::warn!(
            "Snapshot {} not found, starting with an empty store",
            config.snapshot_path.display()
        );
        InMemoryRepository::new()
    };

    let composer = MessageComposer::new(&config.store_name, &config.dashboard_url);
    let permissions = web::Data::new(permissions);

    log::info!("Listening on {}:{}", config.address, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .configure(configure)
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(composer.clone()))
            .app_data(permissions.clone())
    })
    .bind((config.address.clone(), config.port))?
    .run()
    .await
}
