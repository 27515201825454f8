//! The `Pixel` value type and the small header enums (`Channels`,
//! `Colorspace`) that travel alongside it.

use core::fmt;

/// A single RGBA pixel. All channel arithmetic used by the codec wraps at
/// the byte boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Pixel { r, g, b, a }
    }

    /// The decoder's and encoder's initial `prev_pixel`: opaque black.
    #[inline]
    pub const fn initial() -> Self {
        Pixel::new(0, 0, 0, 255)
    }

    #[inline]
    pub const fn to_rgba_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[inline]
    pub const fn to_rgb_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Index into the 64-entry color table: `(r*3 + g*5 + b*7 + a*11) mod 64`.
    #[inline]
    pub fn hash(self) -> u8 {
        self.r
            .wrapping_mul(3)
            .wrapping_add(self.g.wrapping_mul(5))
            .wrapping_add(self.b.wrapping_mul(7))
            .wrapping_add(self.a.wrapping_mul(11))
            & 0x3f
    }
}

impl fmt::Display for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r:{} g:{} b:{} a:{}", self.r, self.g, self.b, self.a)
    }
}

/// Number of channels declared in the header. The decoded pixel stream is
/// always RGBA internally regardless of this value; it only affects how
/// many bytes a caller should expect when re-packing raw pixel buffers.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channels {
    Rgb = 3,
    Rgba = 4,
}

impl Channels {
    #[inline]
    pub const fn count(self) -> usize {
        self as u8 as usize
    }
}

impl TryFrom<u8> for Channels {
    type Error = crate::error::Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            3 => Ok(Channels::Rgb),
            4 => Ok(Channels::Rgba),
            other => Err(crate::error::Error::InvalidChannels(other)),
        }
    }
}

impl fmt::Display for Channels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Channels::Rgb => "RGB",
            Channels::Rgba => "RGBA",
        })
    }
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Colorspace {
    Srgb = 0,
    Linear = 1,
}

impl TryFrom<u8> for Colorspace {
    type Error = crate::error::Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Colorspace::Srgb),
            1 => Ok(Colorspace::Linear),
            other => Err(crate::error::Error::InvalidColorspace(other)),
        }
    }
}

impl fmt::Display for Colorspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Colorspace::Srgb => "sRGB",
            Colorspace::Linear => "linear",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_matches_formula() {
        let p = Pixel::new(10, 0, 0, 255);
        let expected = (10u32 * 3 + 0 * 5 + 0 * 7 + 255 * 11) % 64;
        assert_eq!(p.hash() as u32, expected);
    }

    #[test]
    fn channels_roundtrip() {
        assert_eq!(Channels::try_from(3).unwrap(), Channels::Rgb);
        assert_eq!(Channels::try_from(4).unwrap(), Channels::Rgba);
        assert!(Channels::try_from(1).is_err());
        assert!(Channels::try_from(5).is_err());
    }

    #[test]
    fn colorspace_roundtrip() {
        assert_eq!(Colorspace::try_from(0).unwrap(), Colorspace::Srgb);
        assert_eq!(Colorspace::try_from(1).unwrap(), Colorspace::Linear);
        assert!(Colorspace::try_from(2).is_err());
    }
}
