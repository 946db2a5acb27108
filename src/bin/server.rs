use std::{env, fs::OpenOptions, net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::{ArgGroup, Parser};
use rusqlite::Connection;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use pocket_ledger::{
    AppState, Transaction, build_router, graceful_shutdown, logging_middleware,
    stores::{RealtimeDatabase, SQLiteTransactionStore, TRANSACTIONS_COLLECTION, TransactionStore},
};

/// The web server for adding transactions with Pocket Ledger.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(group(ArgGroup::new("store").required(true).args(["db_path", "database_url"])))]
struct Args {
    /// File path to a SQLite database to store transactions in.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// URL of the remote real-time database to store transactions in.
    ///
    /// Set the `DATABASE_SECRET` environment variable if the database
    /// requires authentication.
    #[arg(long)]
    database_url: Option<String>,

    /// The port to serve the app from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let store = open_store(&args);
    let state = AppState::with_callback(
        store,
        Arc::new(|transaction: &Transaction| {
            tracing::info!(
                "Added transaction {} \"{}\" for {} on {}",
                transaction.id,
                transaction.name,
                transaction.amount,
                transaction.date
            );
        }),
    );

    let submission_tasks = state.submission_tasks.clone();

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(
        build_router(state).layer(middleware::from_fn(logging_middleware)),
    );

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .expect("Server stopped unexpectedly");

    // Submissions whose clients have gone away may still be writing.
    submission_tasks.close();
    if tokio::time::timeout(SUBMISSION_SHUTDOWN_TIMEOUT, submission_tasks.wait())
        .await
        .is_err()
    {
        tracing::error!(
            "{} submissions did not finish before shutdown",
            submission_tasks.len()
        );
    }
}

/// How long to wait for in-progress submissions after the server stops.
const SUBMISSION_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

fn open_store(args: &Args) -> Arc<dyn TransactionStore> {
    if let Some(database_url) = &args.database_url {
        let secret = env::var("DATABASE_SECRET").ok();

        if secret.is_none() {
            tracing::warn!("DATABASE_SECRET is not set, writes will be unauthenticated");
        }

        let store = RealtimeDatabase::new(database_url, secret)
            .unwrap_or_else(|error| panic!("Could not create database client: {error}"));
        tracing::info!("Writing transactions to {database_url}");

        return Arc::new(store);
    }

    let db_path = args
        .db_path
        .as_ref()
        .expect("clap requires either --db-path or --database-url");
    let connection = Connection::open(db_path)
        .unwrap_or_else(|error| panic!("Could not open {}: {error}", db_path.display()));
    let store = SQLiteTransactionStore::new(connection)
        .unwrap_or_else(|error| panic!("Could not initialize {}: {error}", db_path.display()));

    match store.count(TRANSACTIONS_COLLECTION) {
        Ok(count) => tracing::info!("Opened {} with {count} transactions", db_path.display()),
        Err(error) => tracing::warn!("Could not count transactions: {error}"),
    }

    Arc::new(store)
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_ansi(false)
        .with_writer(Arc::new(log_file))
        .with_filter(filter::LevelFilter::DEBUG);

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
