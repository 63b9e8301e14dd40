use crate::types::LogLevel;
use tracing_subscriber::EnvFilter;

const CRATES: [&str; 5] = [
    "sessionseek_cli",
    "sessionseek_runtime",
    "sessionseek_index",
    "sessionseek_engine",
    "sessionseek",
];

/// Install the stderr subscriber. `RUST_LOG` overrides `--log-level`.
pub fn init_logging(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directives: Vec<String> = CRATES
            .iter()
            .map(|krate| format!("{krate}={level}"))
            .collect();
        EnvFilter::new(directives.join(","))
    });

    // keep an already installed subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
