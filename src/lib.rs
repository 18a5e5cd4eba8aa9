//! CareerBoost core: resume and job-description analysis tasks over the Gemini API.

pub mod config;
pub mod pipeline;

pub use config::{AnalyzerConfig, ConfigError};
pub use pipeline::{CareerAnalyzer, TaskFailure, TaskKind, TaskRequest, TaskResult};

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise [`config::default_log_filter`] applies.
/// Safe to call more than once: later calls are no-ops.
pub fn init_tracing() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
    }
}
