use std::net::SocketAddr;

use clap::Parser;
use companydb::server::country::LOOKUP_TIMEOUT;
use companydb::storage::{MemoryStorage, PgStorage};
use companydb::{create_router, CountryGate};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "companydb")]
#[command(about = "CompanyDB - a filtered company registry over HTTP", long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// PostgreSQL connection string
    #[arg(long, env = "DSN", default_value = "postgres://localhost/companies")]
    dsn: String,

    /// Run on the in-memory storage backend instead of PostgreSQL
    #[arg(long)]
    memory: bool,

    /// Country code allowed through the access gate; unset disables the gate
    #[arg(long, env = "ALLOWED_COUNTRY_CODE")]
    allowed_country: Option<String>,

    /// Geolocation lookup URL template, `{ip}` is replaced per request
    #[arg(long, default_value = "https://ipapi.co/{ip}/json/")]
    geoip_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "companydb=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let gate = match &args.allowed_country {
        Some(country) => {
            let client = reqwest::Client::builder().timeout(LOOKUP_TIMEOUT).build()?;
            tracing::info!("country gate enabled, allowing {}", country);
            Some(CountryGate::new(client, args.geoip_url.clone(), country.clone()))
        }
        None => None,
    };

    let app = if args.memory {
        tracing::info!("using in-memory storage");
        create_router(MemoryStorage::new(), gate)
    } else {
        let storage = PgStorage::connect(&args.dsn).await?;
        storage.initialize().await?;
        tracing::info!("connected to PostgreSQL");
        create_router(storage, gate)
    };

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
