// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// folio-app: the pick → convert → open pipeline as an async service.
//
// The host (a mobile shell or the desktop binary) owns the UI. It calls
// `init_tracing` once, builds a `ConversionService`, and awaits its methods.

pub mod services;

pub use services::conversion::{ConversionOutcome, ConversionService};

/// Install the global `tracing` subscriber.
///
/// Honours `RUST_LOG`; defaults to `info`. Safe to call more than once, later
/// calls are ignored.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}
