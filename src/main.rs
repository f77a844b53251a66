use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use clap::Parser;
use std::path::PathBuf;
use supercollege::config::Settings;
use supercollege::provider::{self, SuperCollegeProvider};
use supercollege::routes::{self, scholarships::AppState};
use tracing::{info, error};
use tracing_subscriber::EnvFilter;

/// SuperCollege scholarship gateway
#[derive(Parser, Debug)]
#[command(name = "supercollege", version)]
struct Cli {
    /// Read configuration from this file instead of config/default + config/local
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Write the configuration template into DIR and exit
    #[arg(long, value_name = "DIR")]
    publish_config: Option<PathBuf>,
    /// Overwrite an already published template
    #[arg(long, requires = "publish_config")]
    force: bool,
}

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let loaded = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    let settings = loaded.map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    // Initialize logging; LOG_LEVEL / LOG_FORMAT win over the config file
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }

    if let Some(dir) = &cli.publish_config {
        let path = provider::publish_config(dir, cli.force)?;
        info!("Configuration template available at {}", path.display());
        return Ok(());
    }

    info!("Starting SuperCollege gateway...");

    // Construct the client up front so a bad configuration stops startup
    let provider = SuperCollegeProvider::new(settings.supercollege.clone());
    let supercollege = provider.resolve().await.map_err(|e| {
        error!("Failed to initialize SuperCollege client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e)
    })?;

    info!("SuperCollege client initialized (services: {:?})", provider::provides());

    let app_state = AppState { supercollege };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["supercollege"]).unwrap();
        assert!(cli.config.is_none());
        assert!(cli.publish_config.is_none());
        assert!(!cli.force);
    }

    #[test]
    fn test_cli_publish_config_takes_directory() {
        let cli = Cli::try_parse_from(["supercollege", "--publish-config", "deploy/conf", "--force"]).unwrap();
        assert_eq!(cli.publish_config, Some(PathBuf::from("deploy/conf")));
        assert!(cli.force);

        assert!(Cli::try_parse_from(["supercollege", "--publish-config"]).is_err());
        assert!(Cli::try_parse_from(["supercollege", "--force"]).is_err());
    }

    #[test]
    fn test_cli_config_path() {
        let cli = Cli::try_parse_from(["supercollege", "--config", "/etc/supercollege.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/etc/supercollege.toml")));
    }
}
