use thiserror::Error;

/// Errors that end the process before or instead of a load run.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid scenario configuration: {0}")]
    Config(#[from] carga::ConfigError),

    #[error("Unable to install the Prometheus exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
}
