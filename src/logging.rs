// This file is part of the tpg-resource project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::{env, fs::File, sync::Mutex};

use anyhow::{anyhow, Result};
use tracing::Level;

/// Install the global tracing subscriber
///
/// When `PLUGIN_LOG_FILE` is set, every event down to `TRACE` is written to that file, the way
/// Terraform plugins log. Otherwise events are written to stderr, starting at `WARN` and
/// lowered by one level per `verbosity` step.
pub fn init(verbosity: u8) -> Result<()> {
    if let Ok(path) = env::var("PLUGIN_LOG_FILE") {
        let log_file = File::create(path)?;
        return tracing_subscriber::fmt()
            .with_max_level(Level::TRACE)
            .with_ansi(false)
            .with_writer(Mutex::new(log_file))
            .try_init()
            .map_err(|err| anyhow!(err));
    }

    tracing_subscriber::fmt()
        .with_max_level(stderr_level(verbosity))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
}

fn stderr_level(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}
