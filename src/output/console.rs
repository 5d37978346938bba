//! Console output utilities.

use std::path::Path;

use console::style;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = format!(
        r#"
╔═══════════════════════════════════════════════════════╗
║     Suno Downloader v{:<33}║
║     Playlist audio downloader for suno.com            ║
╚═══════════════════════════════════════════════════════╝
"#,
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", style(banner).cyan());
}

/// Print configuration summary.
pub fn print_config_summary(playlists: &[String], output_root: &Path, workers: usize, auth_source: &str) {
    println!();
    println!("{}", style("Configuration:").bold());
    println!("  Playlists: {}", playlists.len());
    for id in playlists {
        println!("    - {}", id);
    }
    println!("  Output:    {}", output_root.display());
    println!("  Workers:   {}", workers);
    println!("  Auth:      {}", auth_source);
    println!();
}
