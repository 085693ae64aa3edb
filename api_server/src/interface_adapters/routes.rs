use crate::interface_adapters::docs::{self, DOCS_ROOT, DocsCredentials};
use crate::interface_adapters::http::{normalize_errors, panic_response, route_not_found};
use crate::interface_adapters::modules::{ApiModule, mount_modules};
use crate::interface_adapters::security::{compression_layer, cors_layer, with_security_headers};
use crate::interface_adapters::state::ErrorBoundary;
use axum::{Router, middleware};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

// Assemble the whole HTTP surface. Layers listed first sit closest to the
// handlers; the error boundary wraps every route, the fallback and panics.
pub fn app(
    modules: Vec<ApiModule>,
    docs_credentials: Option<DocsCredentials>,
    boundary: ErrorBoundary,
) -> Router {
    let document = docs::build_document(&modules);

    let router = Router::new()
        .merge(mount_modules(modules))
        .nest(DOCS_ROOT, docs::docs_router(document, docs_credentials))
        .fallback(route_not_found)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn_with_state(boundary, normalize_errors))
        .layer(cors_layer());

    with_security_headers(router)
        .layer(compression_layer())
        .layer(TraceLayer::new_for_http())
}
