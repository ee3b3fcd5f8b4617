// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs::OpenOptions;
use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    Layer,
};

/// Warnings and errors go to stderr (RUST_LOG overrides the level); the
/// full debug stream is appended to a log file in the data dir so the last
/// fault of a dead process can still be inspected.
pub fn init() -> Result<()> {
    let log_path = crate::db::data_dir()?.join("tallybook.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Could not open log file at {}", log_path.display()))?;

    let stderr_log = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        );
    let file_log = tracing_subscriber::fmt::layer()
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .with_filter(LevelFilter::DEBUG);

    tracing_subscriber::registry()
        .with(stderr_log)
        .with(file_log)
        .init();

    install_panic_hook();
    Ok(())
}

// The file layer writes through before the process dies, so a panic is
// recorded on disk even when nobody is watching stderr.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            String::from("opaque panic payload")
        };
        let location = info
            .location()
            .map(|l| l.to_string())
            .unwrap_or_else(|| String::from("unknown location"));
        tracing::error!(%location, "panic: {payload}");
        default_hook(info);
    }));
}
