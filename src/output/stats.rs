//! Statistics reporting.

use console::style;

use crate::download::{GlobalState, PlaylistState};

/// Human-readable byte count.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

/// Print statistics for a single playlist.
pub fn print_playlist_stats(state: &PlaylistState) {
    println!();
    println!(
        "{}",
        style(format!("Statistics for {}:", state.title)).bold()
    );
    if let Some(folder) = &state.folder {
        println!("  Folder:     {}", folder.display());
    }
    println!("  Tracks:     {}", state.track_count);
    println!("  Downloaded: {} ({})", state.downloaded_count, format_bytes(state.bytes_downloaded));
    println!("  Skipped:    {} (already present)", state.skipped_count);
    if state.failed_count > 0 {
        println!("  Failed:     {}", style(state.failed_count).red());
    }
}

/// Print global statistics across all playlists.
pub fn print_global_stats(state: &GlobalState) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style("Global Statistics:").bold());
    println!("  Playlists processed: {}", state.playlists_processed);
    if state.playlists_failed > 0 {
        println!(
            "  Playlists failed:    {}",
            style(state.playlists_failed).red()
        );
    }
    println!(
        "  Downloaded: {} ({})",
        style(state.downloaded_count).green(),
        format_bytes(state.bytes_downloaded)
    );
    println!("  Skipped:    {}", style(state.skipped_count).yellow());
    if state.failed_count > 0 {
        println!("  Failed:     {}", style(state.failed_count).red());
    }
    println!("{}", style("═".repeat(50)).dim());
}
