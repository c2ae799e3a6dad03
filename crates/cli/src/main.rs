use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use llmstxt_core::{
    ExtractionOutcome, ExtractionRequest, FetchConfig, Orchestrator, RetryPolicy, SessionConfig, bundle_digests,
    convert_link_text, digest_batch, fetch_file, fetch_stdin, parse_url_list,
};
use owo_colors::OwoColorize;

mod echo;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Generate llms.txt-style Markdown from websites
#[derive(Parser, Debug)]
#[command(name = "llmstxt")]
#[command(author = "Stormlight Labs")]
#[command(version = VERSION)]
#[command(about = "Generate llms.txt-style Markdown from websites", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract a site's navigation tree into an llms.txt Markdown document
    Nav(NavArgs),
    /// Convert free-form text containing links into a Markdown link list
    Links(LinksArgs),
    /// Convert a list of page URLs into bounded Markdown digests
    Pages(PagesArgs),
}

#[derive(Args, Debug)]
struct NavArgs {
    /// Homepage URL to extract navigation from
    #[arg(value_name = "URL")]
    url: String,

    /// CSS selector for the root navigation container(s)
    #[arg(short = 's', long, value_name = "SELECTOR")]
    root_selector: String,

    /// CSS selector narrowing which elements count as clickable
    #[arg(long, value_name = "SELECTOR")]
    context_selector: Option<String>,

    /// Age-gate element to click before extraction (best effort)
    #[arg(long, value_name = "SELECTOR")]
    age_gate_selector: Option<String>,

    /// Cookie-banner element to click before extraction (best effort)
    #[arg(long, value_name = "SELECTOR")]
    cookie_selector: Option<String>,

    /// Chromedriver executable
    #[arg(long, default_value = "chromedriver", value_name = "PATH")]
    chromedriver: String,

    /// Fixed chromedriver port (default: a free local port)
    #[arg(long, value_name = "PORT")]
    webdriver_port: Option<u16>,

    /// Run the browser with a visible window
    #[arg(long)]
    no_headless: bool,

    /// Page-load timeout in seconds
    #[arg(long, default_value = "90", value_name = "SECS")]
    page_timeout: u64,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct LinksArgs {
    /// Text file containing links, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PagesArgs {
    /// File with one URL per line (bare or Markdown-linked), or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Directory the digests are written into
    #[arg(long, default_value = ".", value_name = "DIR")]
    out_dir: PathBuf,

    /// Write one download artifact instead of individual files: a lone
    /// digest keeps its filename, several become a zip archive
    #[arg(long)]
    bundle: bool,

    /// HTTP timeout per page in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_filter = if verbose { "llmstxt=debug,llmstxt_core=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        fetch_stdin().context("Failed to read from stdin")
    } else {
        fetch_file(input).with_context(|| format!("Failed to read file: {}", input))
    }
}

fn write_output(output: Option<&PathBuf>, content: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            echo::print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => print!("{}", content),
    }
    Ok(())
}

async fn run_nav(args: NavArgs, verbose: bool) -> anyhow::Result<()> {
    let session = SessionConfig {
        chromedriver: args.chromedriver,
        port: args.webdriver_port,
        headless: !args.no_headless,
        page_load_timeout: Duration::from_secs(args.page_timeout),
        ..Default::default()
    };
    let orchestrator = Orchestrator::with_config(session, FetchConfig::default(), RetryPolicy::default());

    let request = ExtractionRequest {
        entry_url: args.url.clone(),
        root_selector: args.root_selector,
        age_gate_selector: args.age_gate_selector,
        cookie_selector: args.cookie_selector,
        context_selector: args.context_selector,
    };

    if verbose {
        echo::print_step(1, 2, &format!("Extracting navigation from {}", args.url.bright_white().underline()));
    }

    match orchestrator.extract(&request).await.context("Extraction failed")? {
        ExtractionOutcome::Document(doc) => {
            if verbose {
                echo::print_step(2, 2, "Writing output");
            }
            write_output(args.output.as_ref(), &doc)?;
        }
        ExtractionOutcome::NothingFound => {
            echo::print_warning("No navigation structure found. Try different selectors.");
        }
    }

    Ok(())
}

fn run_links(args: LinksArgs) -> anyhow::Result<()> {
    let input = read_input(&args.input)?;
    let converted = convert_link_text(&input);

    if converted.is_empty() {
        echo::print_warning("No valid links found.");
        return Ok(());
    }

    write_output(args.output.as_ref(), &format!("{}\n", converted))
}

async fn run_pages(args: PagesArgs, verbose: bool) -> anyhow::Result<()> {
    let input = read_input(&args.input)?;
    let urls = parse_url_list(&input);

    if urls.is_empty() {
        echo::print_warning("No URLs provided.");
        return Ok(());
    }

    if verbose {
        echo::print_info(&format!("Digesting {} page(s)", urls.len()));
    }

    let config = FetchConfig { timeout: args.timeout, ..Default::default() };
    let digests = digest_batch(&urls, &config).await;

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Failed to create output directory: {}", args.out_dir.display()))?;

    if args.bundle {
        match bundle_digests(&digests).context("Failed to bundle digests")? {
            Some(llmstxt_core::Bundle::Single { filename, content }) => {
                let path = args.out_dir.join(&filename);
                fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
                echo::print_success(&format!("Wrote {}", path.display().bright_white()));
            }
            Some(llmstxt_core::Bundle::Archive { filename, bytes }) => {
                let path = args.out_dir.join(&filename);
                let size = bytes.len();
                fs::write(&path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
                echo::print_success(&format!(
                    "Wrote {} ({})",
                    path.display().bright_white(),
                    echo::format_size(size)
                ));
            }
            None => echo::print_warning("Nothing to bundle."),
        }
        return Ok(());
    }

    for digest in &digests {
        let path = args.out_dir.join(&digest.filename);
        fs::write(&path, &digest.content).with_context(|| format!("Failed to write {}", path.display()))?;
        echo::print_success(&format!("Wrote {}", path.display().bright_white()));
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);
    if cli.verbose {
        echo::print_banner();
    }

    match cli.command {
        Command::Nav(args) => run_nav(args, cli.verbose).await,
        Command::Links(args) => run_links(args),
        Command::Pages(args) => run_pages(args, cli.verbose).await,
    }
}
