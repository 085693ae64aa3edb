pub mod domain;
pub mod frameworks;
pub mod interface_adapters;
pub mod use_cases;

pub use domain::{AppError, ErrorEnvelope, ErrorMessage};
pub use frameworks::config::{AppConfig, AppEnvironment, http_port};
pub use frameworks::server::{StartupError, build_app, root_modules, run, run_with_config};
pub use interface_adapters::modules::ApiModule;
pub use interface_adapters::validation::{Validate, ValidatedJson};
