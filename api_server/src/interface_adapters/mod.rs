// Interface adapters: HTTP wiring around the normalizer and the API modules.

pub mod docs;
pub mod http;
pub mod modules;
pub mod routes;
pub mod security;
pub mod state;
pub mod system;
pub mod validation;
