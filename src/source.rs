//! `PixelSource`: the single-method capability the encoder needs from
//! whatever is producing pixels. No restartability or known length is
//! required, so the encoder can sit on top of a slice, a raw byte buffer,
//! or an upstream image-decoding iterator with no adapter boilerplate at
//! the call site.

use crate::pixel::{Channels, Pixel};

/// Something that can hand out pixels one at a time, in scan-line order.
///
/// `next_pixel` returns `None` exactly once, at the end of the sequence,
/// and the source may be dropped afterward.
pub trait PixelSource {
    fn next_pixel(&mut self) -> Option<Pixel>;
}

/// Any plain iterator of pixels is a `PixelSource` for free — this is how
/// an upstream image-decoding iterator plugs straight into `encode`.
impl<I> PixelSource for I
where
    I: Iterator<Item = Pixel>,
{
    #[inline]
    fn next_pixel(&mut self) -> Option<Pixel> {
        self.next()
    }
}

/// A `PixelSource` over a raw interleaved RGB24 or RGBA32 byte buffer, as
/// produced by most image-decoding libraries.
pub struct RawBuffer<'a> {
    bytes: &'a [u8],
    channels: Channels,
    pos: usize,
}

impl<'a> RawBuffer<'a> {
    /// `bytes.len()` must be a multiple of `channels.count()`; any trailing
    /// partial pixel is silently ignored rather than treated as an error,
    /// matching the behavior of a plain chunked iterator.
    pub fn new(bytes: &'a [u8], channels: Channels) -> Self {
        RawBuffer {
            bytes,
            channels,
            pos: 0,
        }
    }
}

impl PixelSource for RawBuffer<'_> {
    fn next_pixel(&mut self) -> Option<Pixel> {
        let stride = self.channels.count();
        let chunk = self.bytes.get(self.pos..self.pos + stride)?;
        self.pos += stride;

        Some(match self.channels {
            Channels::Rgb => Pixel::new(chunk[0], chunk[1], chunk[2], 255),
            Channels::Rgba => Pixel::new(chunk[0], chunk[1], chunk[2], chunk[3]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_iterator_is_a_pixel_source() {
        let pixels = [Pixel::new(1, 2, 3, 4), Pixel::new(5, 6, 7, 8)];
        let mut source = pixels.iter().copied();
        assert_eq!(source.next_pixel(), Some(pixels[0]));
        assert_eq!(source.next_pixel(), Some(pixels[1]));
        assert_eq!(source.next_pixel(), None);
    }

    #[test]
    fn raw_buffer_rgb() {
        let bytes = [1, 2, 3, 4, 5, 6];
        let mut source = RawBuffer::new(&bytes, Channels::Rgb);
        assert_eq!(source.next_pixel(), Some(Pixel::new(1, 2, 3, 255)));
        assert_eq!(source.next_pixel(), Some(Pixel::new(4, 5, 6, 255)));
        assert_eq!(source.next_pixel(), None);
    }

    #[test]
    fn raw_buffer_rgba() {
        let bytes = [1, 2, 3, 4, 5, 6, 7, 8];
        let mut source = RawBuffer::new(&bytes, Channels::Rgba);
        assert_eq!(source.next_pixel(), Some(Pixel::new(1, 2, 3, 4)));
        assert_eq!(source.next_pixel(), Some(Pixel::new(5, 6, 7, 8)));
        assert_eq!(source.next_pixel(), None);
    }

    #[test]
    fn raw_buffer_ignores_trailing_partial_pixel() {
        let bytes = [1, 2, 3, 4, 9];
        let mut source = RawBuffer::new(&bytes, Channels::Rgba);
        assert_eq!(source.next_pixel(), Some(Pixel::new(1, 2, 3, 4)));
        assert_eq!(source.next_pixel(), None);
    }
}
