use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;

use zirka::params::{self, Params};
use zirka::pipeline::restore_file;

#[derive(Parser)]
#[command(name = "unzirka", about = "Restore a stream encoded by zirka")]
struct Cli {
    /// Encoded file to restore
    input: PathBuf,

    /// Block size W the stream was encoded with (not recorded in the stream itself)
    #[arg(short = 'w', long = "block-size", default_value_t = params::DEFAULT_BLOCK_SIZE)]
    block_size: u64,

    /// Worker thread count (unused by Stage R, which is sequential; accepted for symmetry with zirka)
    #[arg(short = 'j', long = "threads")]
    threads: Option<usize>,

    /// Suppress progress output on stderr
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,

    /// Output path (default: INPUT with a trailing .zirka suffix stripped, or INPUT.out)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("unzirka: {err:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if cli.block_size == 0 {
        anyhow::bail!("block size must be nonzero");
    }

    let output = cli.output.clone().unwrap_or_else(|| {
        match cli.input.to_str().and_then(|s| s.strip_suffix(".zirka")) {
            Some(stripped) => PathBuf::from(stripped),
            None => {
                let mut name = cli.input.clone().into_os_string();
                name.push(".out");
                PathBuf::from(name)
            }
        }
    });

    params::configure_thread_pool(cli.threads);
    let params = Params::new(cli.block_size, cli.quiet);

    let len = restore_file(&cli.input, &output, &params)
        .with_context(|| format!("restoring {}", cli.input.display()))?;

    if !cli.quiet {
        eprintln!("unzirka: {} -> {} ({len} bytes)", cli.input.display(), output.display());
    }

    Ok(())
}
