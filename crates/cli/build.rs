use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("llmstxt")
        .version("0.3.0")
        .author("Stormlight Labs")
        .about("Generate llms.txt-style Markdown from websites")
        .subcommand(
            clap::Command::new("nav")
                .about("Extract a site's navigation tree into an llms.txt Markdown document")
                .arg(clap::arg!(<URL> "Homepage URL to extract navigation from"))
                .arg(clap::arg!(-s --root_selector <SELECTOR> "CSS selector for the root navigation container(s)"))
                .arg(clap::arg!(--context_selector <SELECTOR> "CSS selector narrowing which elements count as clickable"))
                .arg(clap::arg!(--age_gate_selector <SELECTOR> "Age-gate element to click before extraction"))
                .arg(clap::arg!(--cookie_selector <SELECTOR> "Cookie-banner element to click before extraction"))
                .arg(clap::arg!(--chromedriver <PATH> "Chromedriver executable").default_value("chromedriver"))
                .arg(clap::arg!(--webdriver_port <PORT> "Fixed chromedriver port"))
                .arg(clap::arg!(--no_headless "Run the browser with a visible window"))
                .arg(clap::arg!(--page_timeout <SECS> "Page-load timeout in seconds").default_value("90"))
                .arg(clap::arg!(-o --output <FILE> "Output file (default: stdout)")),
        )
        .subcommand(
            clap::Command::new("links")
                .about("Convert free-form text containing links into a Markdown link list")
                .arg(clap::arg!(<INPUT> "Text file containing links, or '-' for stdin"))
                .arg(clap::arg!(-o --output <FILE> "Output file (default: stdout)")),
        )
        .subcommand(
            clap::Command::new("pages")
                .about("Convert a list of page URLs into bounded Markdown digests")
                .arg(clap::arg!(<INPUT> "File with one URL per line, or '-' for stdin"))
                .arg(clap::arg!(--out_dir <DIR> "Directory the digests are written into").default_value("."))
                .arg(clap::arg!(--bundle "Write one download artifact instead of individual files"))
                .arg(clap::arg!(--timeout <SECS> "HTTP timeout per page in seconds").default_value("30")),
        )
        .arg(clap::arg!(-v --verbose "Enable debug logging"));

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "llmstxt", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "llmstxt", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "llmstxt", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "llmstxt", &completions_dir).unwrap();

    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}
