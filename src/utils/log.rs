use env_logger::{Builder, Env};

/// Initialises `env_logger`, honouring `RUST_LOG` and defaulting to `info`
pub fn init_logging() {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .format_module_path(false)
        .init();
}
