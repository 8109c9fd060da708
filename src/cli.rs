//! Command-line interface definitions for newsreel.
//!
//! Arguments are parsed with `clap`. The API key can also come from the
//! environment.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for newsreel.
///
/// # Examples
///
/// ```sh
/// # Five top stories, JSON only
/// newsreel -j ./json
///
/// # Ten sports stories with an HTML page
/// newsreel -c Sports -n 10 -j ./json -o ./html
///
/// # Show which categories the config knows
/// newsreel --list-categories
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// News category to read (see --list-categories)
    #[arg(short, long, default_value = "Top Stories")]
    pub category: String,

    /// Number of articles to process
    #[arg(short = 'n', long, default_value_t = 5, value_parser = clap::value_parser!(u8).range(1..=20))]
    pub count: u8,

    /// Output directory for the JSON edition
    #[arg(short, long, required_unless_present = "list_categories")]
    pub json_output_dir: Option<String>,

    /// Output directory for the HTML page (skipped when absent)
    #[arg(short = 'o', long)]
    pub html_output_dir: Option<String>,

    /// Optional path to a YAML config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// API key for the summarization model
    #[arg(
        long,
        env = "GENAI_API_KEY",
        hide_env_values = true,
        required_unless_present = "list_categories"
    )]
    pub genai_api_key: Option<String>,

    /// Language code for narration
    #[arg(long, default_value = "en")]
    pub lang: String,

    /// Disable TLS certificate verification
    #[arg(long)]
    pub insecure: bool,

    /// Print the configured categories and exit
    #[arg(long)]
    pub list_categories: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(&[
            "newsreel",
            "--category",
            "Sports",
            "--count",
            "8",
            "--json-output-dir",
            "./json",
            "--html-output-dir",
            "./html",
            "--genai-api-key",
            "k",
        ]);

        assert_eq!(cli.category, "Sports");
        assert_eq!(cli.count, 8);
        assert_eq!(cli.json_output_dir.as_deref(), Some("./json"));
        assert_eq!(cli.html_output_dir.as_deref(), Some("./html"));
        assert_eq!(cli.genai_api_key.as_deref(), Some("k"));
        assert!(!cli.insecure);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(&[
            "newsreel",
            "-c",
            "World",
            "-n",
            "3",
            "-j",
            "/tmp/json",
            "-o",
            "/tmp/html",
            "--genai-api-key",
            "k",
        ]);

        assert_eq!(cli.category, "World");
        assert_eq!(cli.count, 3);
        assert_eq!(cli.json_output_dir.as_deref(), Some("/tmp/json"));
        assert_eq!(cli.html_output_dir.as_deref(), Some("/tmp/html"));
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(&["newsreel", "-j", "out", "--genai-api-key", "k"]);

        assert_eq!(cli.category, "Top Stories");
        assert_eq!(cli.count, 5);
        assert_eq!(cli.lang, "en");
        assert!(cli.html_output_dir.is_none());
        assert!(cli.config.is_none());
        assert!(!cli.list_categories);
    }

    #[test]
    fn test_cli_count_out_of_range() {
        for bad in ["0", "21"] {
            let res = Cli::try_parse_from(&[
                "newsreel",
                "-j",
                "out",
                "--genai-api-key",
                "k",
                "-n",
                bad,
            ]);
            assert!(res.is_err(), "count {bad} should be rejected");
        }
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from(&[
            "newsreel",
            "-j",
            "out",
            "--genai-api-key",
            "k",
            "--insecure",
            "--list-categories",
            "--config",
            "news.yaml",
            "--lang",
            "hi",
        ]);

        assert!(cli.insecure);
        assert!(cli.list_categories);
        assert_eq!(cli.config, Some(PathBuf::from("news.yaml")));
        assert_eq!(cli.lang, "hi");
    }

    #[test]
    fn test_cli_list_categories_needs_nothing_else() {
        let cli = Cli::try_parse_from(&["newsreel", "--list-categories"]).unwrap();
        assert!(cli.list_categories);
        assert!(cli.json_output_dir.is_none());
    }

    #[test]
    fn test_cli_json_dir_required_otherwise() {
        let res = Cli::try_parse_from(&["newsreel", "--genai-api-key", "k"]);
        assert!(res.is_err());
    }
}
