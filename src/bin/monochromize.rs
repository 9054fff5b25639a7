extern crate bmp_monochromizer;

use std::path::PathBuf;

use anyhow::{Context, Result};
use bmp_monochromizer::{Compat, Config};
use clap::Parser;

/// Converts a 24-bit BMP image into an 8-bit grayscale BMP image
#[derive(Parser)]
struct Cli {
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
    /// Input 24-bit bitmap (default: assets/input.bmp)
    input: Option<PathBuf>,
    /// Output 8-bit bitmap (default: assets/output.bmp)
    output: Option<PathBuf>,
    #[clap(long, default_value_t=false)]
    /// Reproduce the original tool's row layout byte for byte
    legacy: bool,
    #[clap(long, default_value_t=false)]
    /// Convert even if the headers do not describe an uncompressed 24-bit image
    lenient: bool,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let defaults = Config::default();
    let input = args.input.unwrap_or(defaults.input_path);
    let output = args.output.unwrap_or(defaults.output_path);
    let compat = if args.legacy { Compat::Legacy } else { Compat::Standard };
    let config = Config::new(&input, &output)
        .with_compat(compat)
        .with_lenient(args.lenient);
    log::debug!("palette of {} entries, {} bpp output, {:?} layout",
        config.palette_size, config.output_bit_count, config.compat);

    bmp_monochromizer::run(&config)
        .with_context(|| format!("cannot monochromize {}", input.display()))?;

    println!("Output 8-bit monochromized BMP file path: {}", output.display());
    Ok(())
}
