/// Log setup for the terminal viewer
///
/// The ASCII renderer owns stdout and stderr while it runs, so log records go
/// to a file instead of the console.
use anyhow::Context;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "info,hmview_core=debug,hmview_terminal=debug";

/// Install a file-backed subscriber; `RUST_LOG` overrides the default filter
pub fn init_logging(log_file: &Path) -> anyhow::Result<()> {
    let file = File::create(log_file)
        .with_context(|| format!("failed to create log file {}", log_file.display()))?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_target(true)
                .with_thread_names(true)
                .with_ansi(false),
        )
        .try_init()
        .context("failed to install the log subscriber")?;

    // Raw mode hides panic output, so make sure it reaches the log
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        tracing::error!("Panic occurred: {}", panic_info);
        default_hook(panic_info);
    }));

    tracing::info!("logging to {}", log_file.display());
    Ok(())
}
