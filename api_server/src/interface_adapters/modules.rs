// API modules: routers supplied by the application, mounted under the
// global prefix and their URI version segment.

use std::collections::BTreeMap;

use axum::Router;
use utoipa::openapi::OpenApi;

// Global URL prefix for every API route.
pub const API_PREFIX: &str = "api";

/// A collaborator router plus the OpenAPI fragment describing it.
///
/// Paths in both the router and the fragment are relative to the module's
/// mount point (`/api/v{version}`, or `/api` for version-neutral modules).
#[derive(Clone)]
pub struct ApiModule {
    name: &'static str,
    version: Option<u16>,
    router: Router,
    openapi: Option<OpenApi>,
}

impl ApiModule {
    pub fn new(name: &'static str, router: Router) -> Self {
        Self {
            name,
            version: None,
            router,
            openapi: None,
        }
    }

    pub fn versioned(mut self, version: u16) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_openapi(mut self, openapi: OpenApi) -> Self {
        self.openapi = Some(openapi);
        self
    }

    pub fn openapi(&self) -> Option<&OpenApi> {
        self.openapi.as_ref()
    }

    pub fn mount_path(&self) -> String {
        match self.version {
            Some(version) => format!("/{API_PREFIX}/v{version}"),
            None => format!("/{API_PREFIX}"),
        }
    }
}

// Modules sharing a mount path are merged before nesting, since a path can
// only be nested once.
pub fn mount_modules(modules: Vec<ApiModule>) -> Router {
    let mut by_mount: BTreeMap<String, Router> = BTreeMap::new();

    for module in modules {
        let mount_path = module.mount_path();
        tracing::debug!(module = module.name, %mount_path, "mounting api module");
        let merged = match by_mount.remove(&mount_path) {
            Some(existing) => existing.merge(module.router),
            None => module.router,
        };
        by_mount.insert(mount_path, merged);
    }

    by_mount
        .into_iter()
        .fold(Router::new(), |app, (mount_path, router)| {
            app.nest(&mount_path, router)
        })
}
