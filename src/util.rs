// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright © 2021-2022 Adrian <adrian.eddy at gmail>

use simplelog::*;

pub fn get_version() -> String {
    let ver = env!("CARGO_PKG_VERSION");
    match option_env!("GITHUB_RUN_NUMBER") {
        Some(gh_run) => format!("{ver} (gh{gh_run})"),
        None => format!("{ver} (dev)")
    }
}

/// Terminal logger plus a debug log file next to the working directory.
/// `HMDWARP_DEBUG` raises the terminal level to debug.
pub fn init_logging() {
    let term_level = if std::env::var_os("HMDWARP_DEBUG").is_some() { LevelFilter::Debug } else { LevelFilter::Info };

    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .set_time_level(LevelFilter::Debug)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![
        TermLogger::new(term_level, config.clone(), TerminalMode::Mixed, ColorChoice::Auto)
    ];
    match std::fs::File::create("hmdwarp.log") {
        Ok(file) => loggers.push(WriteLogger::new(LevelFilter::Debug, config, file)),
        Err(e) => eprintln!("Failed to create log file: {e:?}")
    }
    let _ = CombinedLogger::init(loggers);
}
