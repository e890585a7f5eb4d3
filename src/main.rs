//! nwtest - help front end
//!
//! Resolves the requested topic, prints the version banner and the topic text
//! on stdout and exits with the help status. Diagnostics go to stderr only.

use clap::Parser;
use nwtest::{
    cli::{Cli, HelpSystem},
    config::{display_config_summary, load_config, validate_config},
    logging::{LogLevel, Logger},
    models::Config,
};
use std::process;

fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(1);
    }));

    let mut bootstrap = Logger::new("nwtest");
    if std::env::args_os().any(|arg| arg == "--debug") {
        bootstrap.set_level(LogLevel::Debug);
    }

    // Malformed arguments, including non-UTF-8 ones, still get the usage text
    let cli = match Cli::try_parse() {
        Ok(cli) => cli.hoist_global_flags(),
        Err(e) => {
            bootstrap.debug("Unrecognised arguments, showing usage")
                .field("error", e.to_string().trim())
                .log();
            Cli::default()
        }
    };

    let use_color = cli.use_colors();
    let config = match load_config(cli.clone()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.format_for_console(use_color));
            bootstrap.warn("Falling back to built-in defaults").log();
            let mut config = Config::default();
            config.debug = cli.debug;
            config
        }
    };

    let logger = Logger::with_config("nwtest", &config);

    match validate_config(&config) {
        Ok(warnings) => {
            for warning in warnings {
                logger.warn(&warning.format(config.enable_color)).log();
            }
        }
        Err(e) => {
            logger.error("Configuration rejected")
                .error_info(&e)
                .location(file!(), line!())
                .log();
        }
    }

    if logger.would_log(LogLevel::Debug) {
        logger.debug(&nwtest::build_info()).log();
        for line in display_config_summary(&config).lines() {
            logger.debug(line).log();
        }
    }

    HelpSystem::new(config.help)
        .with_logger(logger)
        .show_and_exit(cli.requested_topic())
}
