use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match api_server::run_with_config().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "startup failed");
            ExitCode::FAILURE
        }
    }
}
