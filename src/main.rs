//! Suno Downloader - CLI entry point.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use console::Term;
use indicatif::MultiProgress;
use tracing_subscriber::{fmt, EnvFilter};

use suno_downloader::{
    api::SunoApi,
    cli::Args,
    config::{
        find_config_file, init_config, parse_playlist_id, validate_config, Config, InitOutcome,
        CONFIG_FILE_NAME,
    },
    credentials::resolve_credentials,
    download::{download_playlist, GlobalState},
    error::{exit_codes, Error, Result},
    output::{
        create_multi_progress, print_banner, print_config_summary, print_error, print_global_stats,
        print_info, print_playlist_stats, print_success, print_warning,
    },
};

const CONFIG_HINT: &str = "Run `suno-downloader --init` to create config.yaml, then edit it.";

const BITWARDEN_HINT: &str =
    "Check that `bw` is installed and unlocked (export BW_SESSION=$(bw unlock --raw)), or set auth_source: config.";

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            if let Some(hint) = hint_for(&e) {
                print_info(hint);
            }
            ExitCode::from(exit_code_for(&e) as u8)
        }
    }
}

fn exit_code_for(error: &Error) -> i32 {
    match error {
        Error::Config(_)
        | Error::ConfigValidation { .. }
        | Error::MissingConfig(_)
        | Error::YamlParse(_)
        | Error::Bitwarden(_)
        | Error::BitwardenNotFound => exit_codes::CONFIG_ERROR,
        Error::Authentication(_)
        | Error::Api(_)
        | Error::PlaylistNotFound(_)
        | Error::RateLimited(_)
        | Error::Server(_)
        | Error::Http(_) => exit_codes::API_ERROR,
        Error::Download(_) | Error::NoDownloadUrl(_) => exit_codes::DOWNLOAD_ERROR,
        Error::PlaylistsFailed(_) => exit_codes::SOME_PLAYLISTS_FAILED,
        Error::Aborted => exit_codes::ABORT,
        _ => exit_codes::UNEXPECTED_ERROR,
    }
}

/// Follow-up advice printed under the error, if any.
fn hint_for(error: &Error) -> Option<&'static str> {
    match error {
        Error::Config(_)
        | Error::ConfigValidation { .. }
        | Error::MissingConfig(_)
        | Error::YamlParse(_) => Some(CONFIG_HINT),
        Error::Bitwarden(_) | Error::BitwardenNotFound => Some(BITWARDEN_HINT),
        _ => None,
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    if args.init {
        let path = args
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
        return run_init(&path, args.force);
    }

    if !args.quiet {
        print_banner();
    }

    // Load configuration
    let config_path = find_config_file(args.config.as_deref())?;
    tracing::debug!("Using config file {}", config_path.display());
    let mut config = Config::load(&config_path)?;

    // Merge CLI arguments into config
    args.merge_into_config(&mut config);

    // Validate configuration
    validate_config(&config)?;

    let playlist_ids = config
        .playlist_ids()
        .iter()
        .map(|raw| parse_playlist_id(raw))
        .collect::<Result<Vec<_>>>()?;

    if config.show_progress {
        print_config_summary(
            &playlist_ids,
            &config.output_root,
            config.download_workers,
            &config.auth_source.to_string(),
        );
    }

    let credentials = resolve_credentials(&config).await?;
    let api = SunoApi::new(&config.api_base, credentials, config.http_timeout())?;
    let progress = create_multi_progress(config.show_progress);

    let global_state = tokio::select! {
        state = download_all(&api, &config, &playlist_ids, &progress) => state,
        _ = tokio::signal::ctrl_c() => {
            print_warning("Interrupted, stopping downloads");
            return Err(Error::Aborted);
        }
    };

    // Print global statistics
    print_global_stats(&global_state);

    if global_state.playlists_failed > 0 {
        return Err(Error::PlaylistsFailed(global_state.playlists_failed));
    }

    Ok(())
}

/// Process each playlist in turn; a failed playlist does not stop the rest.
async fn download_all(
    api: &SunoApi,
    config: &Config,
    playlist_ids: &[String],
    progress: &MultiProgress,
) -> GlobalState {
    let mut global_state = GlobalState::default();

    for playlist_id in playlist_ids {
        print_info(&format!("Processing playlist: {}", playlist_id));

        match download_playlist(api, config, playlist_id, progress).await {
            Ok(state) => {
                print_playlist_stats(&state);
                global_state.add_playlist_stats(&state);
            }
            Err(e) => {
                print_error(&format!("Failed to process {}: {}", playlist_id, e));
                global_state.mark_playlist_failed();
            }
        }
    }

    global_state
}

fn run_init(path: &Path, force: bool) -> Result<()> {
    match init_config(path, force, confirm_overwrite)? {
        InitOutcome::Created | InitOutcome::Overwritten => {
            print_success(&format!("Wrote {}", path.display()));
            print_info("Add your token, device_id and playlists, then run suno-downloader.");
        }
        InitOutcome::Kept => {
            print_info(&format!("Left {} unchanged", path.display()));
        }
    }
    Ok(())
}

fn confirm_overwrite(path: &Path) -> Result<bool> {
    let term = Term::stdout();
    term.write_str(&format!("{} already exists. Overwrite? [y/N] ", path.display()))?;
    let answer = term.read_line()?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
