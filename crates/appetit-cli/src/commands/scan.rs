//! The photo scan command: the terminal stands in for the app screen,
//! rendering each snapshot as it is published and cancelling on Ctrl-C.

use anyhow::Result;
use appetit_client::{ImagePayload, VisionClient};
use appetit_core::config::ClientConfig;
use appetit_core::scan::{ScanPhase, ScanSnapshot};
use colored::Colorize;
use std::path::Path;

pub async fn run(config: &ClientConfig, image: &Path) -> Result<()> {
    let payload = ImagePayload::from_path(image).await?;
    println!(
        "{} {} ({} bytes, {})",
        "Analyzing".bold(),
        payload.filename(),
        payload.len(),
        payload.content_type()
    );

    let client = VisionClient::new(config)?;
    let handle = client.scan(payload);
    let mut rx = handle.subscribe();

    let mut printed_items = 0;
    let mut last_phase = rx.borrow().phase;
    print_phase(last_phase);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                eprintln!("{}", "Cancelling...".yellow());
                handle.cancel();
            }
            changed = rx.changed() => {
                let closed = changed.is_err();
                let snapshot = rx.borrow_and_update().clone();
                render(&snapshot, &mut printed_items, &mut last_phase);
                if closed || snapshot.phase.is_terminal() {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn render(snapshot: &ScanSnapshot, printed_items: &mut usize, last_phase: &mut ScanPhase) {
    for item in &snapshot.detected_items[*printed_items..] {
        println!("  - {} - {}", item.label.bold(), item.serving);
    }
    *printed_items = snapshot.detected_items.len();

    if snapshot.phase != *last_phase {
        *last_phase = snapshot.phase;
        print_phase(snapshot.phase);
    }

    if snapshot.phase.is_terminal() {
        if let Some(summary) = &snapshot.summary_text {
            println!("\n{}", summary.italic());
        }
        if let Some(error) = &snapshot.last_error {
            eprintln!("{} {}", "Scan failed:".red().bold(), error);
        }
    }
}

fn print_phase(phase: ScanPhase) {
    let label = match phase {
        ScanPhase::Uploading => "Uploading...".cyan(),
        ScanPhase::Scanning => "Scanning...".cyan(),
        ScanPhase::Summarizing => "Summarizing...".cyan(),
        ScanPhase::Done => "Done!".green().bold(),
        ScanPhase::Failed => "Failed".red().bold(),
        ScanPhase::Cancelled => "Cancelled".yellow(),
    };
    println!("{}", label);
}
