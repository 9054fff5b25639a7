//! Row geometry and the per-pixel luminance reduction.

pub const INPUT_BYTES_PER_PIXEL: usize = 3;

const RED_WEIGHT: f64 = 0.3;
const GREEN_WEIGHT: f64 = 0.59;
const BLUE_WEIGHT: f64 = 0.11;

/// Zero bytes needed to bring a row of `row_bytes` up to a multiple of 4.
pub fn row_padding(row_bytes: usize) -> usize {
    (4 - row_bytes % 4) % 4
}

pub fn input_padding(width: usize) -> usize {
    row_padding(width * INPUT_BYTES_PER_PIXEL)
}

pub fn output_padding(width: usize) -> usize {
    row_padding(width)
}

pub fn input_row_stride(width: usize) -> usize {
    width * INPUT_BYTES_PER_PIXEL + input_padding(width)
}

/// Per-row padding counted by the original tool's file size field.
pub fn legacy_file_size_padding(width: usize) -> usize {
    (INPUT_BYTES_PER_PIXEL * width) % 4
}

/// Weighted luminance, truncated towards zero.
pub fn luminance(red: u8, green: u8, blue: u8) -> u8 {
    let value = RED_WEIGHT * red as f64 + GREEN_WEIGHT * green as f64 + BLUE_WEIGHT * blue as f64;
    value as u8
}

/// Converts 24-bit rows into 8-bit luminance rows, reusing its buffers.
pub struct ScanlineConverter {
    input: Vec<u8>,
    output: Vec<u8>,
}

impl ScanlineConverter {
    /// `padding` zero bytes follow the luminance bytes of every output row.
    pub fn new(width: usize, padding: usize) -> Self {
        ScanlineConverter{
            input: vec![ 0u8; width * INPUT_BYTES_PER_PIXEL ],
            output: vec![ 0u8; width + padding ],
        }
    }

    /// Buffer the next input row is read into.
    pub fn input_mut(&mut self) -> &mut [u8] {
        &mut self.input
    }

    /// Reduces the buffered input row. The returned row includes padding.
    pub fn convert(&mut self) -> &[u8] {
        for (luma, bgr) in self.output.iter_mut().zip(self.input.chunks_exact(INPUT_BYTES_PER_PIXEL)) {
            *luma = luminance(bgr[2], bgr[1], bgr[0]);
        }
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_keeps_rows_aligned() {
        for width in 0..=16 {
            let pad_in = input_padding(width);
            let pad_out = output_padding(width);
            assert!(pad_in <= 3 && pad_out <= 3);
            assert_eq!((width * 3 + pad_in) % 4, 0, "input width {}", width);
            assert_eq!((width + pad_out) % 4, 0, "output width {}", width);
        }
    }

    #[test]
    fn strides() {
        assert_eq!(input_row_stride(1), 4);
        assert_eq!(input_row_stride(2), 8);
        assert_eq!(input_row_stride(3), 12);
        assert_eq!(input_row_stride(5), 16);
        assert_eq!(legacy_file_size_padding(2), 2);
        assert_eq!(legacy_file_size_padding(3), 1);
    }

    #[test]
    fn primaries() {
        assert_eq!(luminance(255, 0, 0), 76);
        assert_eq!(luminance(0, 255, 0), 150);
        assert_eq!(luminance(0, 0, 255), 28);
        assert_eq!(luminance(0, 0, 0), 0);
    }

    #[test]
    fn extremes_stay_in_range() {
        // 0.3 * 255 + 0.59 * 255 + 0.11 * 255 evaluates to exactly 255.0
        assert_eq!(luminance(255, 255, 255), 255);
        assert_eq!(luminance(255, 255, 0), 226);
        assert_eq!(luminance(0, 255, 255), 178);
    }

    #[test]
    fn truncates_instead_of_rounding() {
        // 0.9999999999999999
        assert_eq!(luminance(1, 1, 1), 0);
        // 127.99999999999999
        assert_eq!(luminance(128, 128, 128), 127);
        // 124.3, 90.5, 159.5
        assert_eq!(luminance(10, 200, 30), 124);
        assert_eq!(luminance(50, 100, 150), 90);
        assert_eq!(luminance(200, 150, 100), 159);
        assert_eq!(luminance(100, 100, 100), 100);
    }

    #[test]
    fn converter_reads_bgr_triples() {
        let mut conv = ScanlineConverter::new(3, output_padding(3));
        // blue, green, red
        conv.input_mut().copy_from_slice(&[ 0, 0, 255, 0, 255, 0, 255, 0, 0 ]);
        assert_eq!(conv.convert(), &[ 76, 150, 28, 0 ]);
    }

    #[test]
    fn converter_padding_stays_zero() {
        let mut conv = ScanlineConverter::new(1, 3);
        conv.input_mut().copy_from_slice(&[ 255, 255, 255 ]);
        assert_eq!(conv.convert(), &[ 255, 0, 0, 0 ]);
        conv.input_mut().copy_from_slice(&[ 30, 200, 10 ]);
        assert_eq!(conv.convert(), &[ 124, 0, 0, 0 ]);
    }
}
