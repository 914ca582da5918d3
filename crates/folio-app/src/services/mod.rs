// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer: wraps the synthesizer and the platform bridge in async
// methods the UI can await without blocking its executor.

pub mod config_store;
pub mod conversion;
pub mod data_dir;
