use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;

use zirka::params::{self, Params};
use zirka::pipeline::encode_file;

#[derive(Parser)]
#[command(name = "zirka", about = "Long-range fixed-block content deduplicator")]
struct Cli {
    /// File to deduplicate
    input: PathBuf,

    /// Block size W in bytes (the deduplication granularity)
    #[arg(short = 'w', long = "block-size", default_value_t = params::DEFAULT_BLOCK_SIZE)]
    block_size: u64,

    /// Worker thread count (default: all available cores)
    #[arg(short = 'j', long = "threads")]
    threads: Option<usize>,

    /// Suppress progress output on stderr
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,

    /// Output path (default: INPUT.zirka)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("zirka: {err:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if cli.block_size == 0 {
        anyhow::bail!("block size must be nonzero");
    }

    let output = cli.output.clone().unwrap_or_else(|| {
        let mut name = cli.input.clone().into_os_string();
        name.push(".zirka");
        PathBuf::from(name)
    });

    params::configure_thread_pool(cli.threads);
    let params = Params::new(cli.block_size, cli.quiet);

    let report = encode_file(&cli.input, &output, &params)
        .with_context(|| format!("encoding {}", cli.input.display()))?;

    if !cli.quiet {
        let saved = report.input_len.saturating_sub(report.output_len);
        eprintln!(
            "zirka: {} -> {} ({} duplicate blocks, {} bytes saved)",
            cli.input.display(),
            output.display(),
            report.duplicate_blocks,
            saved
        );
    }

    Ok(())
}
