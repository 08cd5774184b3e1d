use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use clap::Parser;
use owo_colors::OwoColorize;
use pagecut_core::{Extractor, FetchConfig, ProfileLoader, ProfileParser, SiteProfile, TitleMode, fetch_file, fetch_stdin, fetch_url};
use tracing_subscriber::EnvFilter;

mod echo;

use echo::{print_banner, print_detail, print_extraction_details, print_info, print_step, print_success, print_warning};

const VERSION: &str = env!("CARGO_PKG_VERSION");

const TOTAL_STEPS: usize = 4;

/// Output format for the scrape result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Html,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "html" => Ok(Self::Html),
            _ => Err(format!("Invalid format: {}. Valid options: json, html", s)),
        }
    }
}

/// Extract the main content and images of a blog page
#[derive(Parser, Debug)]
#[command(name = "pagecut")]
#[command(version)]
#[command(about = "Extract the main content and images of a blog page", long_about = None)]
struct Args {
    /// URL to fetch, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (json, html)
    #[arg(short, long, default_value = "json", value_name = "FORMAT")]
    format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Embed the title as <h1> before an <article> wrapper
    #[arg(long)]
    embed_title: bool,

    /// Site profile file
    #[arg(long, value_name = "FILE")]
    profile: Option<PathBuf>,

    /// Directory searched for <domain>.txt profiles
    #[arg(long, value_name = "DIR")]
    profile_dir: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "20", value_name = "SECS")]
    timeout: u64,

    /// User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Only fetch URLs whose host contains DOMAIN (repeatable)
    #[arg(long = "allow-domain", value_name = "DOMAIN")]
    allow_domains: Vec<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn input_url(&self) -> Option<url::Url> {
        url::Url::parse(&self.input)
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https"))
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("pagecut_core=debug"))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Picks the profile: an explicit file, else a lookup by the URL's host.
fn resolve_profile(args: &Args) -> anyhow::Result<SiteProfile> {
    if let Some(path) = &args.profile {
        return ProfileParser::parse_file(path).with_context(|| format!("Failed to load profile: {}", path.display()));
    }

    let Some(url) = args.input_url() else {
        return Ok(SiteProfile::new());
    };

    let mut loader = match &args.profile_dir {
        Some(dir) => ProfileLoader::builder().custom_dir(dir).build(),
        None => ProfileLoader::default(),
    };

    loader
        .load_for_url(url.as_str())
        .with_context(|| format!("Failed to load profile for {}", url))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.verbose {
        init_logging();
        print_banner();
        print_info("Debug logging enabled");
        eprintln!();
    }

    if args.verbose {
        print_step(1, TOTAL_STEPS, "Resolving site profile");
    }

    let profile = resolve_profile(&args)?;

    if args.verbose {
        if profile.is_empty() {
            print_detail("Profile", "default");
        } else {
            print_detail("Profile", "site profile loaded");
        }
        eprintln!();
    }

    let html = if args.input == "-" {
        if args.verbose {
            print_step(2, TOTAL_STEPS, "Reading from stdin");
        }
        fetch_stdin().context("Failed to read from stdin")?
    } else if let Some(url) = args.input_url() {
        if args.verbose {
            print_step(
                2,
                TOTAL_STEPS,
                &format!("Fetching from {}", url.as_str().bright_white().underline()),
            );
        }

        let mut allowed_domains = args.allow_domains.clone();
        allowed_domains.extend(profile.allowed_domains.iter().cloned());

        let config = FetchConfig {
            timeout: args.timeout,
            user_agent: args.user_agent.clone().unwrap_or_else(|| FetchConfig::default().user_agent),
            allowed_domains,
        };

        fetch_url(url.as_str(), &config).await.context("Failed to fetch URL")?
    } else {
        if args.verbose {
            print_step(2, TOTAL_STEPS, &format!("Reading from file {}", args.input.bright_white()));
        }
        fetch_file(&args.input).with_context(|| format!("Failed to read file: {}", args.input))?
    };

    if args.verbose {
        print_detail("Size", &echo::format_size(html.len()));
        eprintln!();
        print_step(3, TOTAL_STEPS, "Extracting main content");
    }

    let mut config = profile.extract_config();
    if args.embed_title {
        config.title_mode = TitleMode::Embedded;
    }

    let result = Extractor::with_config(config)
        .extract(&html)
        .context("Failed to extract content")?;

    if args.verbose {
        print_extraction_details(&result);
        if result.title.is_empty() {
            print_warning("No title heading found");
        }
    }

    let output = match args.format {
        OutputFormat::Json if args.pretty => result.to_json_pretty()?,
        OutputFormat::Json => result.to_json()?,
        OutputFormat::Html => result.content_html,
    };

    if args.verbose {
        print_step(4, TOTAL_STEPS, "Writing output");
        print_detail("Format", &format!("{:?}", args.format));
        eprintln!();
    }

    match args.output {
        Some(path) => {
            fs::write(&path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => {
            println!("{}", output);
        }
    }

    Ok(())
}
