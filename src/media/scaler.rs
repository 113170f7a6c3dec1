//! Thumbnail scaling and JPEG encoding
//!
//! Converts decoded video frames to downscaled RGB24 with `swscale`, then
//! encodes them as baseline JPEG.

use bytes::Bytes;
use ffmpeg_next as ffmpeg;
use ffmpeg_next::format::Pixel;
use ffmpeg_next::software::scaling;
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;

use crate::error::{FfmpegError, Result, ScoreError};

/// Scaler from one source geometry to one RGB24 target size
pub struct FrameScaler {
    context: scaling::Context,
    source: (Pixel, u32, u32),
    target: (u32, u32),
}

impl FrameScaler {
    pub fn new(frame: &ffmpeg::util::frame::Video, width: u32, height: u32) -> Result<Self> {
        let source = (frame.format(), frame.width(), frame.height());
        let context = scaling::Context::get(
            source.0,
            source.1,
            source.2,
            Pixel::RGB24,
            width,
            height,
            scaling::Flags::BILINEAR,
        )
        .map_err(|e| {
            ScoreError::Ffmpeg(FfmpegError::ScalerCreate(format!(
                "{:?} {}x{} -> rgb24 {}x{}: {}",
                source.0, source.1, source.2, width, height, e
            )))
        })?;

        Ok(Self {
            context,
            source,
            target: (width, height),
        })
    }

    /// Whether this scaler can be reused for `frame` at the given size
    pub fn fits(&self, frame: &ffmpeg::util::frame::Video, width: u32, height: u32) -> bool {
        self.source == (frame.format(), frame.width(), frame.height())
            && self.target == (width, height)
    }

    /// Scale `frame` and return tightly packed RGB24 rows.
    pub fn to_rgb(&mut self, frame: &ffmpeg::util::frame::Video) -> Result<Vec<u8>> {
        let mut rgb = ffmpeg::util::frame::Video::empty();
        self.context
            .run(frame, &mut rgb)
            .map_err(|e| ScoreError::Ffmpeg(FfmpegError::Scale(e.to_string())))?;

        let (width, height) = self.target;
        Ok(pack_rows(rgb.data(0), rgb.stride(0), width as usize * 3, height as usize))
    }
}

/// Copy `rows` rows of `row_bytes` out of a plane padded to `stride`.
fn pack_rows(plane: &[u8], stride: usize, row_bytes: usize, rows: usize) -> Vec<u8> {
    let mut packed = Vec::with_capacity(row_bytes * rows);
    for row in plane.chunks(stride).take(rows) {
        packed.extend_from_slice(&row[..row_bytes.min(row.len())]);
    }
    packed
}

/// Encode packed RGB24 pixels as JPEG
pub fn encode_jpeg(rgb: &[u8], width: u32, height: u32, quality: u8) -> Result<Bytes> {
    let expected = width as usize * height as usize * 3;
    if rgb.len() != expected {
        return Err(ScoreError::Image(format!(
            "expected {} bytes for {}x{} rgb24, got {}",
            expected,
            width,
            height,
            rgb.len()
        )));
    }

    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality)
        .encode(rgb, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| ScoreError::Image(e.to_string()))?;
    Ok(Bytes::from(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_rows_strips_padding() {
        // 2x2 RGB image with 8-byte stride (2 bytes of padding per row)
        let plane = [
            1, 2, 3, 4, 5, 6, 0, 0, //
            7, 8, 9, 10, 11, 12, 0, 0,
        ];
        assert_eq!(
            pack_rows(&plane, 8, 6, 2),
            vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]
        );
    }

    #[test]
    fn test_encode_jpeg() {
        let rgb = vec![128u8; 16 * 8 * 3];
        let jpeg = encode_jpeg(&rgb, 16, 8, 85).unwrap();
        // SOI marker
        assert_eq!(&jpeg[..2], &[0xff, 0xd8]);
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 8));
    }

    #[test]
    fn test_encode_jpeg_rejects_short_buffer() {
        assert!(matches!(
            encode_jpeg(&[0u8; 10], 16, 8, 85),
            Err(ScoreError::Image(_))
        ));
    }
}
