use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// Install the stderr logger. Safe to call more than once.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let config = ConfigBuilder::new()
        .add_filter_allow_str("character_browser")
        .add_filter_allow_str("chars")
        .build();

    // Ignore the error if a logger was already installed.
    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto);
}

/// Logger for tests; no-ops if one is already set.
pub fn initialize_for_tests() {
    init(cfg!(debug_assertions));
}
