//! lsf2lsx CLI - Command-line interface for LSF to LSX conversion
//!
//! The input may be given positionally so the binary can serve as a git
//! `textconv` driver: `git config diff.lsf.textconv lsf2lsx`.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "lsf2lsx", version)]
#[command(about = "Convert BG3 LSF binary resources to canonical LSX XML", long_about = None)]
struct Cli {
    /// Source LSF file
    #[arg(value_name = "INPUT", required_unless_present = "input_flag", conflicts_with = "input_flag")]
    input: Option<PathBuf>,

    /// Source LSF file (alternative to the positional argument)
    #[arg(short = 'i', long = "input", value_name = "PATH")]
    input_flag: Option<PathBuf>,

    /// Destination LSX file; writes to stdout when omitted
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace); overrides `RUST_LOG`
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn source(&self) -> Option<&PathBuf> {
        self.input.as_ref().or(self.input_flag.as_ref())
    }

    /// Level directive forced by `-v`, if any.
    fn verbosity_directive(&self) -> Option<&'static str> {
        match self.verbose {
            0 => None,
            1 => Some("debug"),
            _ => Some("trace"),
        }
    }

    /// `-v` wins over `RUST_LOG`; with neither, only warnings are shown.
    fn log_filter(&self, rust_log: Option<&str>) -> EnvFilter {
        if let Some(directive) = self.verbosity_directive() {
            return EnvFilter::new(directive);
        }
        rust_log
            .and_then(|directives| EnvFilter::try_new(directives).ok())
            .unwrap_or_else(|| EnvFilter::new("warn"))
    }
}

/// Run the lsf2lsx CLI
///
/// # Errors
/// Returns an error if conversion or writing the output fails.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout may carry the document
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(cli.log_filter(rust_log.as_deref()))
        .init();

    let source = cli
        .source()
        .ok_or_else(|| anyhow::anyhow!("No input file given"))?;

    match &cli.output {
        Some(dest) => {
            crate::converter::convert_lsf_to_lsx_with_progress(source, dest, &|p| {
                tracing::debug!("[{}/{}] {}: {}", p.current, p.total, p.phase.as_str(), p.message);
            })
            .map_err(|e| anyhow::anyhow!("Failed to convert {}: {e}", source.display()))?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            crate::converter::convert_lsf_to_writer(source, &mut out)
                .map_err(|e| anyhow::anyhow!("Failed to convert {}: {e}", source.display()))?;
        }
    }

    Ok(())
}
