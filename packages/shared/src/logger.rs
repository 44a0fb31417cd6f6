//! Logging setup utilities for the syncwatch binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose log output is enabled at the default level.
const WORKSPACE_TARGETS: [&str; 3] = ["syncwatch_shared", "syncwatch_server", "syncwatch_client"];

/// Build the default filter directive for the workspace crates and the binary.
fn default_directive(binary_name: &str, default_log_level: &str) -> String {
    let mut directives: Vec<String> = WORKSPACE_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, default_log_level))
        .collect();

    let binary_target = binary_name.replace('-', "_");
    if !WORKSPACE_TARGETS.contains(&binary_target.as_str()) {
        directives.push(format!("{}={}", binary_target, default_log_level));
    }
    directives.push("tower_http=info".to_string());

    directives.join(",")
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The level applies to every workspace crate and to the binary itself.
/// It can be overridden with the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "syncwatch-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info")
///
/// # Examples
///
/// ```no_run
/// use syncwatch_shared::logger::setup_logger;
///
/// setup_logger("syncwatch-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
