// Shared primitives for one-time server bootstrapping across integration tests.
#![allow(dead_code)]

use std::{
    sync::{Arc, OnceLock},
    time::Duration,
};

use api_server::{ApiModule, AppConfig, AppError};
use axum::{Router, extract::Path, routing::get};

// Base URL published once the test server has bound its port.
static SERVER_URL: OnceLock<String> = OnceLock::new();
// One-time guard that ensures the server bootstrap path runs only once.
static SERVER_READY: OnceLock<()> = OnceLock::new();

pub const DOCS_USERNAME: &str = "admin";
pub const DOCS_PASSWORD: &str = "admin";

// Failing routes used to exercise the error boundary end to end.
fn widgets_module() -> ApiModule {
    async fn find_widget(Path(id): Path<u32>) -> Result<String, AppError> {
        Err(AppError::not_found(format!("widget {id} does not exist")))
    }

    async fn boom() -> Result<String, AppError> {
        Err(AppError::internal("boom"))
    }

    async fn silent() -> Result<String, AppError> {
        Err(AppError::unknown())
    }

    let router = Router::new()
        .route("/widgets/{id}", get(find_widget))
        .route("/boom", get(boom))
        .route("/silent", get(silent));
    ApiModule::new("widgets", router).versioned(1)
}

// Ensure the test server is running and return the shared base URL.
pub fn ensure_server() -> &'static str {
    SERVER_READY.get_or_init(|| {
        let published_url = Arc::new(OnceLock::<String>::new());
        let published_url_thread = Arc::clone(&published_url);
        // Own OS thread so the server outlives individual `#[tokio::test]` runtimes.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            runtime.block_on(async move {
                // Ephemeral port avoids collisions with local services.
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                let addr = listener.local_addr().expect("get local addr");
                let _ = published_url_thread.set(format!("http://{}", addr));

                // Documentation gate on, as with APP_ENV=dev.
                let config = AppConfig::from_lookup(|key| match key {
                    "APP_ENV" => Some("dev".to_string()),
                    _ => None,
                });
                let mut modules = api_server::root_modules();
                modules.push(widgets_module());

                api_server::run(listener, &config, modules)
                    .await
                    .expect("server failed");
            });
        });
        wait_for_server_url_and_readiness(published_url);
    });

    SERVER_URL
        .get()
        .expect("server url should be initialized")
        .as_str()
}

// Wait for URL publication and then wait for the server socket to accept TCP connections.
fn wait_for_server_url_and_readiness(published_url: Arc<OnceLock<String>>) {
    let base_url = loop {
        if let Some(url) = published_url.get() {
            break url.clone();
        }
        std::thread::sleep(Duration::from_millis(10));
    };

    let _ = SERVER_URL.set(base_url.clone());

    let addr = base_url
        .strip_prefix("http://")
        .expect("base url should use http://");

    for _ in 0..100 {
        if std::net::TcpStream::connect(addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    panic!("server did not become ready in time");
}
