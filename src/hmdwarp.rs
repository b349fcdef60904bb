// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright © 2021-2022 Adrian <adrian.eddy at gmail>

pub use hmdwarp_core as core;
pub mod util;
mod cli;

fn main() {
    util::init_logging();
    log_panics::init();

    ::log::debug!("hmdwarp {}", util::get_version());

    if let Err(e) = cli::run() {
        ::log::error!("{e}");
        std::process::exit(1);
    }
}
