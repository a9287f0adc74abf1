use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use transcript_social::cli::{Cli, Commands, SpinnerProgress};
use transcript_social::config::Config;
use transcript_social::form::FormSession;
use transcript_social::generate::Platform;
use transcript_social::pipeline::{ContentPipeline, Submission};
use transcript_social::transcript::{FetchOutcome, TranscriptFetcher};
use transcript_social::video::VideoId;
use transcript_social::{output, utils, ContentError};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "transcript_social=debug"
    } else {
        "transcript_social=info"
    };

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load()?;

    match cli.command {
        Commands::Generate {
            video,
            intent,
            platforms,
            languages,
            format,
            output,
            parallel,
        } => {
            let pipeline = ContentPipeline::new(&config)?
                .languages(normalize_languages(&languages))
                .parallel(parallel || config.app.parallel_platforms);

            let platforms = if platforms.is_empty() {
                config.app.default_platforms.clone()
            } else {
                platforms
            };
            let format = format.unwrap_or(config.app.default_output_format);

            let submission = Submission {
                video,
                intent,
                platforms,
            };

            let progress = SpinnerProgress::new(cli.quiet);
            let report = pipeline.run(&submission, &progress).await;
            progress.clear();
            let report = report?;

            let rendered = output::render_report(&report, &format)?;
            match output {
                Some(path) => {
                    output::save_to_file(&rendered, &path)?;
                    println!("Posts saved to: {}", path.display());
                }
                None => output::print_to_console(&rendered),
            }
        }
        Commands::Form => {
            let pipeline = ContentPipeline::new(&config)?;
            let session = FormSession::new(
                pipeline,
                config.app.default_platforms.clone(),
                config.app.default_output_format,
                cli.quiet,
            );
            session.run().await?;
        }
        Commands::Transcript {
            video,
            languages,
            format,
            output,
        } => {
            let video_id = VideoId::resolve(&video)?;
            let languages = if languages.is_empty() {
                config.transcript.languages.clone()
            } else {
                normalize_languages(&languages)
            };

            tracing::info!("Fetching transcript for video: {}", video_id);

            let fetcher = TranscriptFetcher::new()?;
            let transcript = match fetcher.fetch(&video_id, &languages).await? {
                FetchOutcome::Available(text) => text,
                FetchOutcome::Unavailable { reason } => {
                    return Err(ContentError::TranscriptUnavailable {
                        video_id: video_id.to_string(),
                        reason,
                    }
                    .into());
                }
            };

            let rendered = output::render_transcript(&video_id, &transcript, &format)?;
            match output {
                Some(path) => {
                    output::save_to_file(&rendered, &path)?;
                    println!("Transcript saved to: {}", path.display());
                }
                None => output::print_to_console(&rendered),
            }
        }
        Commands::Config { show } => {
            if show {
                config.display();
            } else {
                let path = Config::config_path()?;
                if path.exists() {
                    println!("Configuration file already exists: {}", path.display());
                } else {
                    let path = config.save()?;
                    println!("Default configuration written to: {}", path.display());
                }
                println!(
                    "Set the API key with the {} environment variable",
                    transcript_social::config::API_KEY_ENV
                );
            }
        }
        Commands::Platforms => {
            println!("Supported platforms:");
            for platform in Platform::ALL {
                println!("  • {}", platform.label());
            }
        }
    }

    Ok(())
}

fn normalize_languages(languages: &[String]) -> Vec<String> {
    languages
        .iter()
        .map(|lang| utils::normalize_language_code(lang))
        .collect()
}
