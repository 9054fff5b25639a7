use std::io::Write;

use byteorder::WriteBytesExt;

use crate::error::Result;

pub const PALETTE_SIZE: usize = 256;
pub const PALETTE_ENTRY_SIZE: usize = 4;

/// One color table entry, stored blue, green, red, reserved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PaletteEntry {
    pub blue: u8,
    pub green: u8,
    pub red: u8,
    pub reserved: u8,
}

impl PaletteEntry {
    pub fn gray(level: u8) -> Self {
        PaletteEntry{ blue: level, green: level, red: level, reserved: 0 }
    }

    pub fn write<W: Write>(&self, wtr: &mut W) -> Result<()> {
        wtr.write_u8(self.blue)?;
        wtr.write_u8(self.green)?;
        wtr.write_u8(self.red)?;
        wtr.write_u8(self.reserved)?;
        Ok(())
    }
}

/// Linear gray ramp: entry `i` has all three channels set to `i`.
pub fn grayscale_palette() -> [PaletteEntry; PALETTE_SIZE] {
    std::array::from_fn(|i| PaletteEntry::gray(i as u8))
}

pub fn write_palette<W: Write>(wtr: &mut W, palette: &[PaletteEntry]) -> Result<()> {
    for entry in palette {
        entry.write(wtr)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_is_monotonic_gray() {
        let palette = grayscale_palette();
        assert_eq!(palette.len(), 256);
        for (i, entry) in palette.iter().enumerate() {
            assert_eq!(entry.red as usize, i);
            assert_eq!(entry.green as usize, i);
            assert_eq!(entry.blue as usize, i);
            assert_eq!(entry.reserved, 0);
        }
    }

    #[test]
    fn written_palette_is_1024_bytes() {
        let palette = grayscale_palette();
        let mut out = Vec::new();
        write_palette(&mut out, &palette).unwrap();
        assert_eq!(out.len(), PALETTE_SIZE * PALETTE_ENTRY_SIZE);
        assert_eq!(&out[0..4], &[ 0, 0, 0, 0 ]);
        assert_eq!(&out[4..8], &[ 1, 1, 1, 0 ]);
        assert_eq!(&out[1020..1024], &[ 255, 255, 255, 0 ]);
    }
}
