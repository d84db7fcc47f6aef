//! Progress display for batch extraction.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use notice_extract::{BatchEvent, BatchSummary};
use tokio::sync::mpsc;

fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}")
        .map(|style| style.progress_chars("█▓░"))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

/// Consume batch events until the sender side closes.
///
/// Returns the number of documents whose task died.
pub async fn track_batch(mut event_rx: mpsc::Receiver<BatchEvent>, show_progress: bool) -> usize {
    let mut progress: Option<ProgressBar> = None;
    let mut failed = 0;

    while let Some(event) = event_rx.recv().await {
        match event {
            BatchEvent::Started { total_documents } => {
                eprintln!(
                    "{} Extracting {} documents",
                    style("→").cyan(),
                    total_documents
                );
                if show_progress {
                    let bar = ProgressBar::new(total_documents as u64);
                    bar.set_style(bar_style());
                    bar.set_message("Extracting...");
                    progress = Some(bar);
                }
            }
            BatchEvent::DocumentStarted { document_id } => {
                if let Some(ref bar) = progress {
                    bar.set_message(document_id);
                }
            }
            BatchEvent::DocumentCompleted { .. } => {
                if let Some(ref bar) = progress {
                    bar.inc(1);
                }
            }
            BatchEvent::DocumentFailed { document_id, error } => {
                failed += 1;
                match progress {
                    Some(ref bar) => {
                        bar.println(format!("  {} {}: {}", style("✗").red(), document_id, error));
                        bar.inc(1);
                    }
                    None => eprintln!("  {} {}: {}", style("✗").red(), document_id, error),
                }
            }
            BatchEvent::Complete { summary } => {
                if let Some(bar) = progress.take() {
                    bar.finish_and_clear();
                }
                print_summary(&summary);
            }
        }
    }

    failed
}

fn print_summary(summary: &BatchSummary) {
    eprintln!(
        "{} {} documents extracted",
        style("✓").green(),
        summary.total
    );
    eprintln!("  {:<18} {}", "normal", summary.normal);
    eprintln!("  {:<18} {}", "ocr applied", summary.ocr_applied);
    eprintln!("  {:<18} {}", "webpage fallback", summary.webpage_fallback);
    if summary.total_failure > 0 {
        eprintln!(
            "  {:<18} {}",
            style("total failure").yellow(),
            summary.total_failure
        );
    }
    if summary.special_notices > 0 {
        eprintln!("  {:<18} {}", "special notices", summary.special_notices);
    }
}
