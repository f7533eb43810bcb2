//
//   Copyright 2016 Andrew Hunter
//
//   Licensed under the Apache License, Version 2.0 (the "License");
//   you may not use this file except in compliance with the License.
//   You may obtain a copy of the License at
//
//       http://www.apache.org/licenses/LICENSE-2.0
//
//   Unless required by applicable law or agreed to in writing, software
//   distributed under the License is distributed on an "AS IS" BASIS,
//   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//   See the License for the specific language governing permissions and
//   limitations under the License.
//

//!
//! # Logging
//!
//! The library logs through the `log` facade. Binaries call `init_log` once at startup to send those messages somewhere.
//! The `RUST_LOG` environment variable overrides the default level for either mode.
//!

use anyhow::Result;
use flexi_logger::{DeferredNow, Logger};
use log::Record;

///
/// How much the command-line tool should report
///
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LogMode {
    /// Warnings and errors only
    Normal,

    /// Progress of each parse and determinization
    Verbose,
}

fn plain_format(w: &mut dyn std::io::Write, _now: &mut DeferredNow, record: &Record) -> Result<(), std::io::Error> {
    write!(w, "{} [{}] {}", record.level(), record.module_path().unwrap_or("metastate"), &record.args())
}

///
/// Starts the logger for a particular mode
///
pub fn init_log(mode: LogMode) -> Result<()> {
    let default_level = match mode {
        LogMode::Normal     => "warn",
        LogMode::Verbose    => "debug",
    };

    Logger::try_with_env_or_str(default_level)?
        .format(plain_format)
        .log_to_stderr()
        .start()?;

    Ok(())
}
