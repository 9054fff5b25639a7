//! On-disk pieces of a Windows bitmap: the two headers, the color table and
//! the pixel rows.

pub mod header;
pub mod palette;
pub mod scanline;
