//! # Creamery
//!
//! Inventory and sales tracking for a single ice cream shop.
//!
//! The app serves a small set of HTML pages (dashboard, stock and sale
//! forms, flavor management, sales report) plus a JSON API, all backed by
//! the [`store::Store`] data layer. Storage is either Supabase tables or
//! local JSON files, picked once at startup from the environment; see
//! [`config::Config`].
//!
//! # Setup
//!
//! ```sh
//! SUPABASE_URL=... SUPABASE_KEY=... USE_LOCAL_STORAGE=false cargo run
//! ```
//!
//! Leave the credentials unset (or as the sample placeholders) to run
//! entirely off JSON files under `data/`.
use std::time::Duration;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};

use signal::{
    ctrl_c,
    unix::{signal, SignalKind},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

pub mod config;
pub mod error;
pub mod flash;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod templates;
pub mod utils;

use routes::{
    add_stock_page, add_stock_submit, api_add_stock, api_inventory, api_record_sale, dashboard,
    debug_info, manage_flavors_page, manage_flavors_submit, record_sale_page, record_sale_submit,
    sales_report,
};
use state::AppState;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new();

    info!("Starting server...");

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let app = Router::new()
        .route("/", get(dashboard))
        .route("/add_stock", get(add_stock_page).post(add_stock_submit))
        .route(
            "/record_sale",
            get(record_sale_page).post(record_sale_submit),
        )
        .route(
            "/manage_flavors",
            get(manage_flavors_page).post(manage_flavors_submit),
        )
        .route("/sales_report", get(sales_report))
        .route("/api/inventory", get(api_inventory))
        .route("/api/add_stock", post(api_add_stock))
        .route("/api/record_sale", post(api_record_sale))
        .route("/debug", get(debug_info))
        .layer(cors)
        .with_state(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
