use std::env;

use crate::interface_adapters::docs::DocsCredentials;

// Runtime/server configuration, resolved once at startup.

pub const DEFAULT_HTTP_PORT: u16 = 5000;

// `APP_ENV` value that turns the documentation gate on.
pub const DEV_ENVIRONMENT: &str = "dev";

const DOCS_USERNAME: &str = "admin";
const DOCS_PASSWORD: &str = "admin";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppEnvironment {
    Dev,
    Other(String),
}

impl AppEnvironment {
    pub fn parse(value: Option<String>) -> Self {
        match value {
            Some(value) if value == DEV_ENVIRONMENT => Self::Dev,
            Some(value) => Self::Other(value),
            None => Self::Other(String::new()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub environment: AppEnvironment,
    // Present only when documentation requires a login. Note the gate is on
    // for `APP_ENV=dev` and off everywhere else, production included.
    pub docs_credentials: Option<DocsCredentials>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = AppEnvironment::parse(lookup("APP_ENV"));
        let docs_credentials = match environment {
            AppEnvironment::Dev => Some(DocsCredentials::new(DOCS_USERNAME, DOCS_PASSWORD)),
            AppEnvironment::Other(_) => None,
        };

        Self {
            port: http_port(lookup("APP_PORT")),
            environment,
            docs_credentials,
        }
    }
}

pub fn http_port(value: Option<String>) -> u16 {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(DEFAULT_HTTP_PORT)
}
