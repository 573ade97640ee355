use log::LevelFilter;

/// Install the env_logger backend. `RUST_LOG` still overrides the default.
pub fn init(debug: bool) {
    let level = if debug {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}
