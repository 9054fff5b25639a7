use std::path::{Path, PathBuf};

use crate::bmp::palette::PALETTE_SIZE;
use crate::bmp::scanline;
use crate::error::{MonochromizeError, Result};

pub const ASSETS_DIRECTORY: &str = "assets";
pub const INPUT_FILE_NAME: &str = "input.bmp";
pub const OUTPUT_FILE_NAME: &str = "output.bmp";
pub const OUTPUT_BIT_COUNT: u16 = 8;

/// Selects between a self-consistent output and a byte-exact copy of what
/// the original monochromizer tool produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Compat {
    /// Input rows use the padded 24-bit stride and every output row is
    /// padded to a multiple of 4 bytes.
    #[default]
    Standard,
    /// Input rows are read back to back without padding, and each output row
    /// gets the padding a 24-bit row of the same width would need.
    Legacy,
}

impl Compat {
    pub fn input_row_stride(self, width: usize) -> usize {
        match self {
            Compat::Standard => { scanline::input_row_stride(width) },
            Compat::Legacy => { width * scanline::INPUT_BYTES_PER_PIXEL },
        }
    }

    /// Zero bytes written after each output row.
    pub fn output_row_padding(self, width: usize) -> usize {
        match self {
            Compat::Standard => { scanline::output_padding(width) },
            Compat::Legacy => { scanline::input_padding(width) },
        }
    }

    /// Bytes per row as counted by the output file size field.
    pub fn file_size_row_bytes(self, width: usize) -> usize {
        match self {
            Compat::Standard => { width + scanline::output_padding(width) },
            Compat::Legacy => { width + scanline::legacy_file_size_padding(width) },
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub palette_size: usize,
    pub output_bit_count: u16,
    pub compat: Compat,
    /// Skip header validation and convert whatever the headers describe.
    pub lenient: bool,
}

impl Config {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(input_path: P, output_path: Q) -> Self {
        Config{
            input_path: input_path.as_ref().to_path_buf(),
            output_path: output_path.as_ref().to_path_buf(),
            palette_size: PALETTE_SIZE,
            output_bit_count: OUTPUT_BIT_COUNT,
            compat: Compat::default(),
            lenient: false,
        }
    }

    /// `assets/input.bmp` and `assets/output.bmp` under `base`.
    pub fn in_assets_of(base: &Path) -> Self {
        let assets = base.join(ASSETS_DIRECTORY);
        Config::new(assets.join(INPUT_FILE_NAME), assets.join(OUTPUT_FILE_NAME))
    }

    pub fn with_compat(mut self, compat: Compat) -> Self {
        self.compat = compat;
        self
    }

    pub fn with_lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    /// The output is always a 256-color, 8 bits per pixel image.
    pub fn validate(&self) -> Result<()> {
        if self.palette_size != PALETTE_SIZE {
            return Err(MonochromizeError::InvalidConfig(
                format!("palette size {} (must be {})", self.palette_size, PALETTE_SIZE)));
        }
        if self.output_bit_count != OUTPUT_BIT_COUNT {
            return Err(MonochromizeError::InvalidConfig(
                format!("output bit count {} (must be {})", self.output_bit_count, OUTPUT_BIT_COUNT)));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Config::in_assets_of(&cwd)
    }
}
