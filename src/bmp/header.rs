use std::io::{self, Read, Write};

use num_enum::TryFromPrimitive;
use packed_struct::prelude::*;
use packed_struct::PackingError;

use crate::error::{MonochromizeError, Result};

pub const FILE_HEADER_SIZE: usize = 14;
pub const INFO_HEADER_SIZE: usize = 40;
pub const HEADERS_SIZE: usize = FILE_HEADER_SIZE + INFO_HEADER_SIZE;

/// "BM" as stored little-endian in the first two bytes.
pub const BMP_SIGNATURE: u16 = 0x4d42;

#[derive(PackedStruct, Clone, Copy, Debug, PartialEq, Eq)]
#[packed_struct(endian="lsb")]
pub struct FileHeader {
    pub signature: u16,
    pub file_size: u32,
    pub reserved1: u16,
    pub reserved2: u16,
    pub pixel_data_offset: u32,
}

#[derive(PackedStruct, Clone, Copy, Debug, PartialEq, Eq)]
#[packed_struct(endian="lsb")]
pub struct InfoHeader {
    pub header_size: u32,
    pub width: i32,
    pub height: i32, // negative: rows stored top to bottom
    pub planes: u16,
    pub bit_count: u16,
    pub compression: u32,
    pub image_size: u32,
    pub x_pels_per_meter: i32,
    pub y_pels_per_meter: i32,
    pub colors_used: u32,
    pub colors_important: u32,
}

#[derive(TryFromPrimitive, Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum Compression {
    Rgb = 0,
    Rle8 = 1,
    Rle4 = 2,
    Bitfields = 3,
    Jpeg = 4,
    Png = 5,
    AlphaBitfields = 6,
}

fn read_record<R: Read, const N: usize>(rdr: &mut R, what: &str) -> Result<[u8; N]> {
    let mut buf = [ 0u8; N ];
    rdr.read_exact(&mut buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => MonochromizeError::InvalidHeader(format!("file too short for {}", what)),
        _ => MonochromizeError::Io(e),
    })?;
    Ok(buf)
}

fn packing_error(what: &str, e: PackingError) -> MonochromizeError {
    MonochromizeError::InvalidHeader(format!("{}: {:?}", what, e))
}

impl FileHeader {
    pub fn parse(data: &[u8]) -> Result<Self> {
        FileHeader::unpack_from_slice(data).map_err(|e| packing_error("file header", e))
    }

    pub fn read<R: Read>(rdr: &mut R) -> Result<Self> {
        let buf = read_record::<_, FILE_HEADER_SIZE>(rdr, "file header")?;
        FileHeader::parse(&buf)
    }

    pub fn to_bytes(&self) -> Result<[u8; FILE_HEADER_SIZE]> {
        self.pack().map_err(|e| packing_error("file header", e))
    }

    pub fn write<W: Write>(&self, wtr: &mut W) -> Result<()> {
        wtr.write_all(&self.to_bytes()?)?;
        Ok(())
    }
}

impl InfoHeader {
    pub fn parse(data: &[u8]) -> Result<Self> {
        InfoHeader::unpack_from_slice(data).map_err(|e| packing_error("info header", e))
    }

    pub fn read<R: Read>(rdr: &mut R) -> Result<Self> {
        let buf = read_record::<_, INFO_HEADER_SIZE>(rdr, "info header")?;
        InfoHeader::parse(&buf)
    }

    pub fn to_bytes(&self) -> Result<[u8; INFO_HEADER_SIZE]> {
        self.pack().map_err(|e| packing_error("info header", e))
    }

    pub fn write<W: Write>(&self, wtr: &mut W) -> Result<()> {
        wtr.write_all(&self.to_bytes()?)?;
        Ok(())
    }

    pub fn row_count(&self) -> usize {
        self.height.unsigned_abs() as usize
    }

    pub fn is_top_down(&self) -> bool {
        self.height < 0
    }
}

/// The file header and info header of one bitmap, in file order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Headers {
    pub file: FileHeader,
    pub info: InfoHeader,
}

impl Headers {
    pub fn read<R: Read>(rdr: &mut R) -> Result<Self> {
        let file = FileHeader::read(rdr)?;
        let info = InfoHeader::read(rdr)?;
        Ok(Headers{ file, info })
    }

    pub fn write<W: Write>(&self, wtr: &mut W) -> Result<()> {
        self.file.write(wtr)?;
        self.info.write(wtr)
    }

    /// Width in pixels. A negative width cannot be streamed, so it is rejected
    /// even when the rest of the validation is skipped.
    pub fn width(&self) -> Result<usize> {
        usize::try_from(self.info.width)
            .map_err(|_| MonochromizeError::InvalidHeader(format!("negative width {}", self.info.width)))
    }

    /// Checks that the headers describe an uncompressed 24-bit bitmap.
    pub fn validate(&self) -> Result<()> {
        if self.file.signature != BMP_SIGNATURE {
            let sig = self.file.signature.to_le_bytes();
            return Err(MonochromizeError::InvalidHeader(
                format!("bad signature {:02x} {:02x}", sig[0], sig[1])));
        }
        if (self.info.header_size as usize) < INFO_HEADER_SIZE {
            return Err(MonochromizeError::InvalidHeader(
                format!("info header size {} is smaller than {}", self.info.header_size, INFO_HEADER_SIZE)));
        }
        if self.info.bit_count != 24 {
            return Err(MonochromizeError::UnsupportedBitDepth(self.info.bit_count));
        }
        match Compression::try_from(self.info.compression) {
            Ok(Compression::Rgb) => { },
            Ok(other) => {
                log::debug!("rejecting compression {:?}", other);
                return Err(MonochromizeError::UnsupportedCompression(self.info.compression));
            },
            Err(_) => {
                return Err(MonochromizeError::UnsupportedCompression(self.info.compression));
            }
        }
        if self.info.width <= 0 {
            return Err(MonochromizeError::InvalidHeader(format!("width {} is not positive", self.info.width)));
        }
        if self.info.height == 0 {
            return Err(MonochromizeError::InvalidHeader("height is zero".to_string()));
        }
        if (self.file.pixel_data_offset as usize) < HEADERS_SIZE {
            return Err(MonochromizeError::InvalidHeader(
                format!("pixel data offset {} overlaps the headers", self.file.pixel_data_offset)));
        }
        Ok(())
    }
}
