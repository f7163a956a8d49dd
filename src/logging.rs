//! Logger bootstrap for the `ambler` binary and tests.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes the global logger.
///
/// When `verbose` is `true`, per-frame locomotion traces at debug level are
/// printed. Otherwise only info level and above are shown. `RUST_LOG`, when
/// set, takes precedence over both.
pub fn init(verbose: bool) {
    let env = Env::default().default_filter_or(default_filter(verbose));
    let mut builder = Builder::from_env(env);
    builder.format_timestamp_millis();

    // `try_init` only fails if a logger was already set, which repeated test
    // calls do routinely.
    if builder.try_init().is_err() {
        log::debug!("logger already initialised");
    }
}

fn default_filter(verbose: bool) -> String {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    format!("{level},bevy_app=warn,bevy_ecs=warn")
}
