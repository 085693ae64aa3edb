//! Generated API documentation: the OpenAPI document, the Swagger UI page
//! that renders it, and the optional HTTP Basic gate in front of both.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use utoipa::openapi::{InfoBuilder, OpenApi, OpenApiBuilder};

use crate::interface_adapters::http::route_not_found;
use crate::interface_adapters::modules::ApiModule;

pub const DOCS_TITLE: &str = "API Documentation";
pub const DOCS_DESCRIPTION: &str = "Automatically generated API documentation";
pub const DOCS_VERSION: &str = "1.0";
pub const DOCS_SITE_TITLE: &str = "PBAR Server API Documentation";

// Everything under this prefix is documentation.
pub const DOCS_ROOT: &str = "/docs";
// UI at `{DOCS_ROOT}{DOCS_PATH}`, JSON document at `{DOCS_ROOT}{DOCS_PATH}-json`.
pub const DOCS_PATH: &str = "/api";

/// The single username/password pair accepted by the documentation gate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocsCredentials {
    pub username: String,
    pub password: String,
}

impl DocsCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    // Both sides are always compared in full.
    pub fn matches(&self, username: &str, password: &str) -> bool {
        let user_ok = constant_time_eq(self.username.as_bytes(), username.as_bytes());
        let pass_ok = constant_time_eq(self.password.as_bytes(), password.as_bytes());
        user_ok & pass_ok
    }
}

fn constant_time_eq(expected: &[u8], given: &[u8]) -> bool {
    let mut diff = expected.len() ^ given.len();
    for (i, byte) in given.iter().enumerate() {
        let other = expected.get(i).copied().unwrap_or(0);
        diff |= usize::from(other ^ byte);
    }
    diff == 0
}

/// Builds the OpenAPI document from every module's fragment, re-rooting
/// each fragment's paths under the module's mount point.
pub fn build_document(modules: &[ApiModule]) -> OpenApi {
    let info = InfoBuilder::new()
        .title(DOCS_TITLE)
        .description(Some(DOCS_DESCRIPTION))
        .version(DOCS_VERSION)
        .build();
    let mut document = OpenApiBuilder::new().info(info).build();

    for module in modules {
        let Some(fragment) = module.openapi() else {
            continue;
        };
        let mut fragment = fragment.clone();
        let mount_path = module.mount_path();
        let paths = std::mem::take(&mut fragment.paths.paths);
        for (path, item) in paths {
            fragment.paths.paths.insert(format!("{mount_path}{path}"), item);
        }
        document.merge(fragment);
    }

    document
}

/// Router serving the documentation, meant to be nested at [`DOCS_ROOT`].
///
/// Unmatched paths under the root get their own fallback so the gate covers
/// the whole prefix, not only the two documentation routes.
pub fn docs_router(document: OpenApi, credentials: Option<DocsCredentials>) -> Router {
    let json_path = format!("{DOCS_PATH}-json");
    let router = Router::new()
        .route(DOCS_PATH, get(swagger_ui))
        .route(&json_path, get(openapi_json))
        .fallback(route_not_found)
        .with_state(Arc::new(document));

    match credentials {
        Some(credentials) => {
            router.layer(middleware::from_fn_with_state(credentials, require_basic_auth))
        }
        None => router,
    }
}

async fn openapi_json(State(document): State<Arc<OpenApi>>) -> Json<OpenApi> {
    Json(document.as_ref().clone())
}

async fn swagger_ui() -> Html<String> {
    let json_url = format!("{DOCS_ROOT}{DOCS_PATH}-json");
    Html(format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>{DOCS_SITE_TITLE}</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js" crossorigin></script>
  <script>
    window.onload = () => {{
      window.ui = SwaggerUIBundle({{ url: "{json_url}", dom_id: "#swagger-ui" }});
    }};
  </script>
</body>
</html>
"##
    ))
}

// HTTP Basic gate; answers with a challenge so browsers prompt for login.
pub async fn require_basic_auth(
    State(credentials): State<DocsCredentials>,
    req: Request,
    next: Next,
) -> Response {
    match parse_basic_credentials(req.headers()) {
        Some((username, password)) if credentials.matches(&username, &password) => {
            next.run(req).await
        }
        _ => {
            tracing::debug!(path = %req.uri().path(), "documentation access denied");
            challenge()
        }
    }
}

fn challenge() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Basic")],
    )
        .into_response()
}

fn parse_basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = BASE64.decode(encoded.trim()).ok()?;
    let pair = String::from_utf8(decoded).ok()?;
    let (username, password) = pair.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}
