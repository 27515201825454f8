//! Errors surfaced by the core codec.

/// Errors the encoder or decoder can report.
///
/// The encoder only ever surfaces [`Error::Io`] — its chunk selector is
/// total over all inputs. The decoder additionally fails fast on the
/// first structural violation of the wire format.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid QOI magic bytes, expected \"qoif\"")]
    InvalidMagic,

    #[error("invalid colorspace byte {0}, expected 0 (sRGB) or 1 (linear)")]
    InvalidColorspace(u8),

    #[error("invalid channel count {0}, expected 3 (RGB) or 4 (RGBA)")]
    InvalidChannels(u8),

    #[error("malformed QOI stream: {0}")]
    InvalidFormat(&'static str),

    #[error("decoded pixel count {actual} does not match header's width*height {expected}")]
    PixelCountMismatch { expected: u64, actual: u64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
