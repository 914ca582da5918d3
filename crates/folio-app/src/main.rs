// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Folio desktop entry point.
//
// `folio`          show the file picker, convert, open the PDF
// `folio <path>`   convert <path> directly, then open the PDF

use std::process::ExitCode;

use folio_core::error::FolioError;
use folio_core::human_errors::humanize_error;

#[cfg(not(any(target_os = "ios", target_os = "android")))]
#[tokio::main]
async fn main() -> ExitCode {
    use folio_app::ConversionService;
    use folio_bridge::desktop::DesktopBridge;

    folio_app::init_tracing();

    let service = ConversionService::init();
    tracing::info!(platform = service.platform_name(), "Folio starting");

    let result = match std::env::args_os().nth(1) {
        Some(path) => {
            let source = DesktopBridge::source_for_path(std::path::Path::new(&path));
            service.convert(Some(source)).await
        }
        None => service.pick_and_convert().await,
    };

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(err) => {
            report(&err);
            return ExitCode::FAILURE;
        }
    };

    println!(
        "Saved {} ({} page{})",
        outcome.pdf_path.display(),
        outcome.page_count,
        if outcome.page_count == 1 { "" } else { "s" }
    );

    // The PDF is already saved; a missing viewer is reported but not fatal.
    if let Err(err) = service.open_pdf(outcome.pdf_path).await {
        report(&err);
    }
    ExitCode::SUCCESS
}

#[cfg(any(target_os = "ios", target_os = "android"))]
fn main() -> ExitCode {
    report(&FolioError::ViewerUnavailable(
        "the folio binary is desktop-only; mobile hosts embed the library".into(),
    ));
    ExitCode::FAILURE
}

fn report(err: &FolioError) {
    let human = humanize_error(err);
    tracing::debug!(error = %err, "reporting error");
    eprintln!("{}\n{}", human.message, human.suggestion);
}
