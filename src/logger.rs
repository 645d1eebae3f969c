/// Initializes `env_logger`. Verbose runs trace every pipeline step,
/// otherwise only warnings and errors are shown.
pub fn init_logger(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose { log::LevelFilter::Trace } else { log::LevelFilter::Warn })
        .format_timestamp(None)
        .init();
}
