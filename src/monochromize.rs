use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};

use crate::bmp::header::{Headers, HEADERS_SIZE, INFO_HEADER_SIZE};
use crate::bmp::palette::{self, PALETTE_ENTRY_SIZE};
use crate::bmp::scanline::{ScanlineConverter, INPUT_BYTES_PER_PIXEL};
use crate::config::{Compat, Config};
use crate::error::{MonochromizeError, Result};

/// What a finished conversion produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Report {
    pub width: usize,
    pub height: i32,
    pub rows: usize,
    /// Total bytes written to the output stream.
    pub bytes_written: u64,
    /// File size recorded in the output file header.
    pub header_file_size: u32,
}

/// Converts one 24-bit bitmap read from `R`.
///
/// Constructing it reads (and unless the configuration is lenient,
/// validates) the source headers, so nothing needs to be written before
/// the input is known to be usable.
pub struct Monochromizer<'a, R> {
    input: R,
    config: &'a Config,
    source: Headers,
    width: usize,
}

impl<'a, R: Read + Seek> Monochromizer<'a, R> {
    pub fn new(mut input: R, config: &'a Config) -> Result<Self> {
        config.validate()?;
        input.seek(SeekFrom::Start(0))?;
        let source = Headers::read(&mut input)?;
        log::debug!("source: {}x{}{}, {} bpp, pixel data at {}, file size {}",
            source.info.width, source.info.height,
            if source.info.is_top_down() { " top-down" } else { "" },
            source.info.bit_count, source.file.pixel_data_offset, source.file.file_size);

        if config.lenient {
            if let Err(e) = source.validate() {
                log::warn!("ignoring header problem: {}", e);
            }
        } else {
            source.validate()?;
        }
        let width = source.width()?;
        Ok(Self{ input, config, source, width })
    }

    fn palette_bytes(&self) -> usize {
        self.config.palette_size * PALETTE_ENTRY_SIZE
    }

    /// Source headers rewritten for an 8-bit paletted image.
    pub fn output_headers(&self) -> Result<Headers> {
        let rows = self.source.info.row_count() as u64;
        let pixel_data_offset = (HEADERS_SIZE + self.palette_bytes()) as u64;
        let row_bytes = self.config.compat.file_size_row_bytes(self.width) as u64;
        let file_size = rows.checked_mul(row_bytes)
            .and_then(|n| n.checked_add(pixel_data_offset))
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| MonochromizeError::InvalidHeader(
                format!("{}x{} output does not fit in a bitmap", self.width, rows)))?;

        let mut out = self.source;
        out.file.pixel_data_offset = pixel_data_offset as u32;
        out.file.file_size = file_size;
        out.info.bit_count = self.config.output_bit_count;
        // only the first 40 bytes of a larger info header are copied
        if self.config.compat == Compat::Standard {
            out.info.header_size = INFO_HEADER_SIZE as u32;
        }
        Ok(out)
    }

    /// Fails with `TruncatedInput` for the first incomplete row when the
    /// input is too short to hold every row.
    fn check_length(&mut self, rows: usize, stride: u64, expected: usize, data_offset: u64) -> Result<()> {
        if rows == 0 || expected == 0 {
            return Ok(());
        }
        let len = self.input.seek(SeekFrom::End(0))?;
        let last_row = rows as u64 - 1;
        let needed = last_row.checked_mul(stride)
            .and_then(|n| n.checked_add(data_offset))
            .and_then(|n| n.checked_add(expected as u64));
        if matches!(needed, Some(needed) if len >= needed) {
            return Ok(());
        }

        let available = len.saturating_sub(data_offset);
        let mut row = (available / stride).min(last_row);
        let mut actual = (available - row * stride).min(expected as u64);
        if actual == expected as u64 {
            // row complete, the next one starts past the end
            row += 1;
            actual = 0;
        }
        Err(MonochromizeError::TruncatedInput{ row: row as usize, expected, actual: actual as usize })
    }

    /// Writes headers, palette and every row to `output`.
    pub fn write_to<W: Write>(&mut self, output: &mut W) -> Result<Report> {
        let rows = self.source.info.row_count();
        let stride = self.config.compat.input_row_stride(self.width) as u64;
        let padding = self.config.compat.output_row_padding(self.width);
        let expected = self.width * INPUT_BYTES_PER_PIXEL;
        let data_offset = u64::from(self.source.file.pixel_data_offset);
        log::debug!("{} rows, input stride {}, output padding {}", rows, stride, padding);
        self.check_length(rows, stride, expected, data_offset)?;

        let headers = self.output_headers()?;
        headers.write(output)?;
        palette::write_palette(output, &palette::grayscale_palette())?;
        let mut bytes_written = (HEADERS_SIZE + self.palette_bytes()) as u64;

        let mut converter = ScanlineConverter::new(self.width, padding);
        for row in 0..rows {
            self.input.seek(SeekFrom::Start(data_offset + row as u64 * stride))?;
            let actual = read_fully(&mut self.input, converter.input_mut())?;
            if actual < expected {
                return Err(MonochromizeError::TruncatedInput{ row, expected, actual });
            }
            let line = converter.convert();
            output.write_all(line)?;
            bytes_written += line.len() as u64;
            log::trace!("row {} done", row);
        }

        Ok(Report{
            width: self.width,
            height: self.source.info.height,
            rows,
            bytes_written,
            header_file_size: headers.file.file_size,
        })
    }
}

/// Reads until `buf` is full or the input ends; returns the byte count.
fn read_fully<R: Read>(rdr: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match rdr.read(&mut buf[filled..]) {
            Ok(0) => { break },
            Ok(n) => { filled += n },
            Err(e) if e.kind() == io::ErrorKind::Interrupted => { },
            Err(e) => { return Err(e) },
        }
    }
    Ok(filled)
}

/// Converts `input` into `output` in one go.
pub fn transcode<R: Read + Seek, W: Write>(input: R, output: &mut W, config: &Config) -> Result<Report> {
    Monochromizer::new(input, config)?.write_to(output)
}

/// Converts `config.input_path` into `config.output_path`.
///
/// The output file is created only after the input headers were read. If the
/// conversion fails after that, the partially written file is removed.
pub fn run(config: &Config) -> Result<Report> {
    let input = File::open(&config.input_path)
        .map_err(|source| MonochromizeError::InputOpen{ path: config.input_path.clone(), source })?;
    let mut monochromizer = Monochromizer::new(BufReader::new(input), config)?;

    let output = File::create(&config.output_path)
        .map_err(|source| MonochromizeError::OutputCreate{ path: config.output_path.clone(), source })?;
    let mut writer = BufWriter::new(output);

    let result = monochromizer.write_to(&mut writer)
        .and_then(|report| {
            writer.flush()?;
            Ok(report)
        });
    drop(writer);

    if result.is_err() {
        if let Err(e) = std::fs::remove_file(&config.output_path) {
            log::warn!("could not remove partial output {}: {}", config.output_path.display(), e);
        }
    }
    let report = result?;
    log::info!("wrote {} rows, {} bytes to {}", report.rows, report.bytes_written, config.output_path.display());
    Ok(report)
}
