//! Encoder and decoder for the QOI ("Quite OK Image") lossless image
//! format.
//!
//! # Data Format
//!
//! A QOI file has a 14-byte header, followed by any number of data
//! "chunks" and an 8-byte end marker.
//!
//! ```text
//! magic: [u8; 4]   // "qoif"
//! width: u32       // big-endian
//! height: u32      // big-endian
//! channels: u8     // 3 = RGB, 4 = RGBA
//! colorspace: u8   // 0 = sRGB with linear alpha, 1 = all channels linear
//! ```
//!
//! Images are encoded top to bottom, left to right. The decoder and
//! encoder both start with `{r: 0, g: 0, b: 0, a: 255}` as the previous
//! pixel value. A running 64-entry table of recently seen pixels, keyed
//! by `(r*3 + g*5 + b*7 + a*11) mod 64`, lets the encoder refer back to a
//! pixel it has already emitted instead of repeating it.
//!
//! See [`encode::encode`] and [`decode::decode`] for the two entry
//! points, and [`source::PixelSource`] for how to feed the encoder from a
//! slice, a raw byte buffer, or an arbitrary pixel iterator.

mod bitops;
mod colortable;
pub mod decode;
pub mod encode;
mod error;
pub mod header;
pub mod pixel;
pub mod source;

pub use decode::{decode, decode_file, decode_strict, Decoder};
pub use encode::{encode, encode_file};
pub use error::Error;
pub use header::Header;
pub use pixel::{Channels, Colorspace, Pixel};
pub use source::{PixelSource, RawBuffer};

#[cfg(test)]
mod fuzz_tests {
    use super::*;

    /// A tiny deterministic xorshift PRNG, so the fuzz property in
    /// spec.md §8 ("random pixel sequences ... MUST reproduce the input
    /// exactly") is reproducible without pulling in a test-only
    /// dependency the rest of this domain doesn't use.
    struct Xorshift32(u32);

    impl Xorshift32 {
        fn next_u32(&mut self) -> u32 {
            let mut x = self.0;
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            self.0 = x;
            x
        }

        fn next_u8(&mut self) -> u8 {
            (self.next_u32() & 0xff) as u8
        }
    }

    fn random_pixels(seed: u32, len: usize) -> Vec<Pixel> {
        let mut rng = Xorshift32(seed | 1);
        (0..len)
            .map(|_| Pixel::new(rng.next_u8(), rng.next_u8(), rng.next_u8(), rng.next_u8()))
            .collect()
    }

    fn roundtrip_is_exact(pixels: Vec<Pixel>) {
        let width = pixels.len().max(1) as u32;
        let header = Header::new(width, 1, Channels::Rgba, Colorspace::Srgb);

        let mut bytes = Vec::new();
        encode(&header, pixels.clone().into_iter(), &mut bytes).unwrap();

        let (decoded_header, decoder) = decode(&bytes[..]).unwrap();
        let decoded: Vec<Pixel> = decoder.collect::<Result<_, _>>().unwrap();

        assert_eq!(decoded_header, header);
        assert_eq!(decoded, pixels);
    }

    #[test]
    fn fuzz_empty_sequence() {
        roundtrip_is_exact(Vec::new());
    }

    #[test]
    fn fuzz_random_sequences_roundtrip() {
        for (seed, len) in [
            (1u32, 0usize),
            (2, 1),
            (3, 17),
            (4, 63),
            (5, 64),
            (6, 500),
            (7, 4096),
            (8, 10_000),
        ] {
            roundtrip_is_exact(random_pixels(seed, len));
        }
    }

    #[test]
    fn fuzz_low_entropy_sequences_roundtrip() {
        // Pixels drawn from a tiny palette exercise OP_INDEX/OP_RUN heavily.
        let palette = [
            Pixel::new(0, 0, 0, 255),
            Pixel::new(255, 255, 255, 255),
            Pixel::new(10, 20, 30, 255),
            Pixel::new(10, 20, 30, 0),
        ];

        let mut rng = Xorshift32(42);
        let pixels: Vec<Pixel> = (0..5000)
            .map(|_| palette[(rng.next_u32() as usize) % palette.len()])
            .collect();

        roundtrip_is_exact(pixels);
    }

    #[test]
    fn fuzz_encode_is_byte_identical_for_identical_runs() {
        let pixels = random_pixels(99, 1000);

        let header = Header::new(1000, 1, Channels::Rgba, Colorspace::Srgb);

        let mut first = Vec::new();
        encode(&header, pixels.clone().into_iter(), &mut first).unwrap();

        let mut second = Vec::new();
        encode(&header, pixels.into_iter(), &mut second).unwrap();

        assert_eq!(first, second);
    }
}
