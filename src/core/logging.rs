//! Log setup shared by the generator binary, benches and tests

/// Environment variable read before falling back to `RUST_LOG`.
pub const LOG_ENV: &str = "HEXGEN_LOG";

/// Logger builder filtered by `HEXGEN_LOG` (or `RUST_LOG`), `info` when neither is set.
pub fn builder() -> env_logger::Builder {
    let filter = std::env::var(LOG_ENV)
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(&filter);
    builder
}

/// Install the default logger. Safe to call more than once.
///
/// # Example
/// ```
/// hexgen::core::logging::init();
/// log::info!("generating cell 0:0");
/// ```
pub fn init() {
    let _ = builder().try_init();
}
