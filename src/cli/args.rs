//! Command-line argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::config::{AuthSource, Config, PlaylistEntry};

/// Suno playlist downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "suno-downloader",
    version,
    about = "Download the audio of Suno playlists",
    long_about = "A CLI tool to download every track of one or more Suno playlists.\n\n\
                  Run with --init first to create config.yaml, then add your token and playlists."
)]
pub struct Args {
    /// Playlist IDs or playlist URLs. Overrides the playlists in the config file.
    #[arg(value_name = "PLAYLIST_ID")]
    pub playlist_ids: Vec<String>,

    /// Write a template config.yaml and exit.
    #[arg(long)]
    pub init: bool,

    /// With --init, overwrite an existing config without asking.
    #[arg(long, requires = "init")]
    pub force: bool,

    /// Path to configuration file. Searched for in the standard locations when omitted.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Base directory for playlist folders.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of files downloaded at once.
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Where credentials come from (config or bitwarden).
    #[arg(long = "auth-source")]
    pub auth_source: Option<AuthSource>,

    /// Suno bearer token.
    #[arg(short, long, env = "SUNO_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Value for the device-id header.
    #[arg(long = "device-id", env = "SUNO_DEVICE_ID")]
    pub device_id: Option<String>,

    /// Hide progress bars and the banner.
    #[arg(long, short)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(self, config: &mut Config) {
        // Playlists on the command line replace the configured list
        if !self.playlist_ids.is_empty() {
            config.playlists = self
                .playlist_ids
                .into_iter()
                .map(PlaylistEntry::Id)
                .collect();
        }

        if let Some(source) = self.auth_source {
            config.auth_source = source;
        }

        if let Some(token) = self.token {
            config.token = token;
        }

        if let Some(device_id) = self.device_id {
            config.device_id = device_id;
        }

        if let Some(dir) = self.output {
            config.output_root = dir;
        }

        if let Some(workers) = self.workers {
            config.download_workers = workers;
        }

        if self.quiet {
            config.show_progress = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("suno-downloader").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_cli_playlists_replace_config() {
        let mut config = Config::from_yaml("token: abc\nplaylists:\n  - old\n").unwrap();
        parse(&["new-1", "new-2", "--workers", "8", "-o", "/music"]).merge_into_config(&mut config);

        assert_eq!(config.playlist_ids(), vec!["new-1".to_string(), "new-2".to_string()]);
        assert_eq!(config.download_workers, 8);
        assert_eq!(config.output_root, PathBuf::from("/music"));
        assert_eq!(config.token, "abc");
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let mut config = Config::from_yaml("token: abc\nplaylists:\n  - old\n").unwrap();
        let args = Args {
            token: None,
            device_id: None,
            ..parse(&[])
        };
        args.merge_into_config(&mut config);

        assert_eq!(config.playlist_ids(), vec!["old".to_string()]);
        assert!(config.show_progress);
    }

    #[test]
    fn test_auth_source_and_quiet() {
        let mut config = Config::default();
        parse(&["--auth-source", "bitwarden", "--quiet"]).merge_into_config(&mut config);

        assert_eq!(config.auth_source, AuthSource::Bitwarden);
        assert!(!config.show_progress);
    }

    #[test]
    fn test_force_requires_init() {
        assert!(Args::try_parse_from(["suno-downloader", "--force"]).is_err());
        let args = parse(&["--init", "--force"]);
        assert!(args.init && args.force);
    }
}
