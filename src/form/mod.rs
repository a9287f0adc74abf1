use anyhow::Result;
use console::{style, Term};

use crate::cli::{OutputFormat, SpinnerProgress};
use crate::generate::Platform;
use crate::output;
use crate::pipeline::{ContentPipeline, Submission};
use crate::ContentError;

/// Interactive prompt loop; one pipeline (and transcript memo) per session
pub struct FormSession {
    pipeline: ContentPipeline,
    default_platforms: Vec<Platform>,
    format: OutputFormat,
    quiet: bool,
    term: Term,
}

impl FormSession {
    pub fn new(
        pipeline: ContentPipeline,
        default_platforms: Vec<Platform>,
        format: OutputFormat,
        quiet: bool,
    ) -> Self {
        Self {
            pipeline,
            default_platforms,
            format,
            quiet,
            term: Term::stdout(),
        }
    }

    /// Prompt for submissions until the video answer is left empty
    pub async fn run(&self) -> Result<()> {
        self.term
            .write_line(&style("Social media content generator").bold().to_string())?;
        self.print_platform_menu()?;

        loop {
            let video = self.ask("YouTube URL or video ID (empty to quit)")?;
            if video.is_empty() {
                break;
            }

            let intent = self.ask("What do you want to generate? (optional)")?;
            let selection = self.ask(&format!(
                "Platforms, comma separated names or numbers [{}]",
                labels(&self.default_platforms)
            ))?;

            let platforms = match parse_platform_selection(&selection, &self.default_platforms) {
                Ok(platforms) => platforms,
                Err(e) => {
                    self.report_error(&e)?;
                    continue;
                }
            };

            let submission = Submission {
                video,
                intent: Some(intent).filter(|i| !i.is_empty()),
                platforms,
            };

            let progress = SpinnerProgress::new(self.quiet);
            let result = self.pipeline.run(&submission, &progress).await;
            progress.clear();

            match result {
                Ok(report) => {
                    let rendered = output::render_report(&report, &self.format)?;
                    output::print_to_console(&rendered);
                }
                Err(e) => self.report_error(&e)?,
            }
        }

        Ok(())
    }

    fn ask(&self, prompt: &str) -> Result<String> {
        self.term
            .write_str(&format!("{} ", style(format!("{}:", prompt)).cyan()))?;
        Ok(self.term.read_line()?.trim().to_string())
    }

    fn print_platform_menu(&self) -> Result<()> {
        for (index, platform) in Platform::ALL.iter().enumerate() {
            self.term
                .write_line(&format!("  {}. {}", index + 1, platform.label()))?;
        }
        Ok(())
    }

    fn report_error(&self, error: &ContentError) -> Result<()> {
        self.term
            .write_line(&format!("{} {}", style("Error:").red().bold(), error))?;
        Ok(())
    }
}

/// Parse a comma separated selection of platform names or 1-based menu numbers.
/// An empty answer selects `defaults`.
pub fn parse_platform_selection(
    input: &str,
    defaults: &[Platform],
) -> Result<Vec<Platform>, ContentError> {
    let mut selected = Vec::new();

    if input.trim().is_empty() {
        selected.extend_from_slice(defaults);
    }

    for token in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let platform = match token.parse::<usize>() {
            Ok(n) if (1..=Platform::ALL.len()).contains(&n) => Platform::ALL[n - 1],
            Ok(n) => {
                return Err(ContentError::InvalidInput(format!(
                    "no platform numbered {}",
                    n
                )))
            }
            Err(_) => token.parse::<Platform>()?,
        };

        if !selected.contains(&platform) {
            selected.push(platform);
        }
    }

    if selected.is_empty() {
        return Err(ContentError::InvalidInput(
            "select at least one platform".to_string(),
        ));
    }

    Ok(selected)
}

fn labels(platforms: &[Platform]) -> String {
    platforms
        .iter()
        .map(|p| p.label())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_selection_uses_defaults() {
        let selected = parse_platform_selection("  ", &[Platform::Reddit]).unwrap();
        assert_eq!(selected, vec![Platform::Reddit]);
    }

    #[test]
    fn test_empty_selection_without_defaults_is_rejected() {
        assert!(matches!(
            parse_platform_selection("", &[]),
            Err(ContentError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_names_and_numbers_mix() {
        let selected =
            parse_platform_selection("linkedin, 3, Blog", &[Platform::Reddit]).unwrap();
        assert_eq!(
            selected,
            vec![Platform::LinkedIn, Platform::ALL[2], Platform::Blog]
        );
    }

    #[test]
    fn test_duplicates_collapse() {
        let selected = parse_platform_selection("1,1,linkedin", &[]).unwrap();
        assert_eq!(selected, vec![Platform::ALL[0]]);
        assert_eq!(Platform::ALL[0], Platform::LinkedIn);
    }

    #[test]
    fn test_out_of_range_number() {
        assert!(parse_platform_selection("8", &[]).is_err());
        assert!(parse_platform_selection("0", &[]).is_err());
    }

    #[test]
    fn test_unknown_name() {
        assert!(matches!(
            parse_platform_selection("myspace", &[Platform::Blog]),
            Err(ContentError::InvalidInput(_))
        ));
    }
}
