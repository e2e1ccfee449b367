use dinebot::cli::validate_address;
use dinebot::config::Config;
use dinebot::database::json_file::JsonFileDb;
use dinebot::endpoints::create_http_router;
use dinebot::errors::Result;
use dinebot::http::HttpServer;
use dinebot::seed::seed;
use std::sync::{Arc, Mutex};

fn run() -> Result<()> {
    let mut config = Config::from_env();
    if let Some(address) = std::env::args().nth(1) {
        config.override_address(validate_address(&address)?)?;
    }

    let mut db = JsonFileDb::new(config.data_dir.clone());
    tracing::info!(
        address = %config.address(),
        data_dir = %db.data_dir().display(),
        "starting server"
    );
    seed(&mut db)?;

    let db = Arc::new(Mutex::new(db));
    let router = Arc::new(create_http_router()?);
    let server = HttpServer::new(&config.address())?;

    server.serve(config.workers, move |request| {
        let mut db = match db.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        router.handle(request, &mut *db)
    })
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dinebot=info,server=info".into()),
        )
        .init();

    if let Err(err) = run() {
        tracing::error!(%err, "server stopped");
        std::process::exit(1);
    }
}
