//! The decoder: a streaming, pull-based pixel iterator over a QOI byte
//! stream. No whole-image buffering is required — [`Decoder`] holds only
//! the running predictor state plus at most one pending pixel and one
//! pending lookahead byte.

use std::io::{ErrorKind, Read};

use crate::bitops::sub_bias;
use crate::colortable::ColorTable;
use crate::error::Error;
use crate::header::Header;
use crate::pixel::Pixel;

const OP_RGB: u8 = 0xfe;
const OP_RGBA: u8 = 0xff;
const OP_INDEX: u8 = 0x00;
const OP_DIFF: u8 = 0x40;
const OP_LUMA: u8 = 0x80;
const OP_RUN: u8 = 0xc0;
const TAG_MASK: u8 = 0xc0;

/// The decoder's internal state, made explicit rather than scattered
/// across lookahead locals.
#[derive(Debug, Clone, Copy)]
enum DecoderState {
    /// Ready to read a fresh chunk tag byte from the underlying reader.
    Running,
    /// Currently inside an `OP_RUN`; holds the number of repeats of
    /// `prev` still owed to the caller (the first repeat was already
    /// returned when this state was entered).
    InsideRun(u8),
    /// The previous call disambiguated a legitimate `OP_INDEX(0)` from
    /// the end marker: it already read the *next* chunk's first byte to
    /// do so, and must process it on the following call instead of
    /// reading a new one.
    PendingFirstByte(u8),
    Finished,
    Failed,
}

fn eof_to_format(e: std::io::Error) -> Error {
    if e.kind() == ErrorKind::UnexpectedEof {
        Error::InvalidFormat("unexpected end of stream mid-chunk")
    } else {
        Error::Io(e)
    }
}

/// A lazy, finite sequence of decoded pixels over a QOI byte stream
/// (post-header). Obtained from [`decode`].
pub struct Decoder<R> {
    reader: R,
    prev: Pixel,
    table: ColorTable,
    state: DecoderState,
}

impl<R: Read> Decoder<R> {
    fn new(reader: R) -> Self {
        Decoder {
            reader,
            prev: Pixel::initial(),
            table: ColorTable::new(),
            state: DecoderState::Running,
        }
    }

    fn read_byte(&mut self) -> Result<u8, Error> {
        let mut buf = [0u8; 1];
        self.reader.read_exact(&mut buf).map_err(eof_to_format)?;
        Ok(buf[0])
    }

    /// Produces the next pixel, or `None` once the end marker has been
    /// consumed. Returns `Err` on the first structural violation; the
    /// decoder must not be polled again afterward (it will keep
    /// returning the same error).
    pub fn next_pixel(&mut self) -> Result<Option<Pixel>, Error> {
        let result = self.next_pixel_inner();
        if result.is_err() {
            self.state = DecoderState::Failed;
        }
        result
    }

    fn next_pixel_inner(&mut self) -> Result<Option<Pixel>, Error> {
        match self.state {
            DecoderState::Finished => Ok(None),
            DecoderState::Failed => Err(Error::InvalidFormat(
                "decoder already failed; stream position is no longer valid",
            )),
            DecoderState::InsideRun(remaining) => {
                self.state = if remaining > 1 {
                    DecoderState::InsideRun(remaining - 1)
                } else {
                    DecoderState::Running
                };
                Ok(Some(self.prev))
            }
            DecoderState::PendingFirstByte(b) => {
                self.state = DecoderState::Running;
                self.decode_chunk(b).map(Some)
            }
            DecoderState::Running => {
                let b = self.read_byte()?;
                if b == 0x00 {
                    self.handle_index_zero()
                } else {
                    self.decode_chunk(b).map(Some)
                }
            }
        }
    }

    /// Handles the one byte (`0x00`) that is ambiguous between a
    /// legitimate `OP_INDEX(0)` chunk and the first byte of the 8-byte
    /// end marker, using exactly one byte of lookahead.
    fn handle_index_zero(&mut self) -> Result<Option<Pixel>, Error> {
        let pending = self.table.get(0);
        let b2 = self.read_byte()?;

        if b2 != 0x00 {
            self.prev = pending;
            self.table.match_put(pending);
            self.state = DecoderState::PendingFirstByte(b2);
            return Ok(Some(pending));
        }

        let mut rest = [0u8; 6];
        self.reader.read_exact(&mut rest).map_err(eof_to_format)?;

        if rest != [0, 0, 0, 0, 0, 1] {
            return Err(Error::InvalidFormat(
                "expected end marker after two leading zero bytes",
            ));
        }

        self.state = DecoderState::Finished;
        Ok(None)
    }

    /// Decodes the chunk whose tag byte is `b` (`b != 0x00`; that case is
    /// handled by [`Self::handle_index_zero`]), producing exactly one
    /// pixel and updating running state as needed for any further
    /// pixels the chunk owes (runs).
    fn decode_chunk(&mut self, b: u8) -> Result<Pixel, Error> {
        let produced = match b {
            OP_RGB => {
                let mut buf = [0u8; 3];
                self.reader.read_exact(&mut buf).map_err(eof_to_format)?;
                let p = Pixel::new(buf[0], buf[1], buf[2], self.prev.a);
                self.finish_predicted_pixel(p);
                p
            }
            OP_RGBA => {
                let mut buf = [0u8; 4];
                self.reader.read_exact(&mut buf).map_err(eof_to_format)?;
                let p = Pixel::new(buf[0], buf[1], buf[2], buf[3]);
                self.finish_predicted_pixel(p);
                p
            }
            _ => match b & TAG_MASK {
                OP_INDEX => {
                    let idx = b & 0x3f;
                    let p = self.table.get(idx);
                    self.prev = p;
                    p
                }
                OP_DIFF => {
                    let dr = sub_bias((b >> 4) & 0x03, 2);
                    let dg = sub_bias((b >> 2) & 0x03, 2);
                    let db = sub_bias(b & 0x03, 2);
                    let p = Pixel::new(
                        self.prev.r.wrapping_add(dr as u8),
                        self.prev.g.wrapping_add(dg as u8),
                        self.prev.b.wrapping_add(db as u8),
                        self.prev.a,
                    );
                    self.finish_predicted_pixel(p);
                    p
                }
                OP_LUMA => {
                    let b2 = self.read_byte()?;
                    let dg = sub_bias(b & 0x3f, 32);
                    let dr = dg.wrapping_add(sub_bias((b2 >> 4) & 0x0f, 8));
                    let db = dg.wrapping_add(sub_bias(b2 & 0x0f, 8));
                    let p = Pixel::new(
                        self.prev.r.wrapping_add(dr as u8),
                        self.prev.g.wrapping_add(dg as u8),
                        self.prev.b.wrapping_add(db as u8),
                        self.prev.a,
                    );
                    self.finish_predicted_pixel(p);
                    p
                }
                OP_RUN => {
                    let len = (b & 0x3f) + 1;
                    if len > 1 {
                        self.state = DecoderState::InsideRun(len - 1);
                    }
                    self.prev
                }
                _ => unreachable!("TAG_MASK covers all four 2-bit tags"),
            },
        };

        Ok(produced)
    }

    #[inline]
    fn finish_predicted_pixel(&mut self, p: Pixel) {
        self.prev = p;
        self.table.match_put(p);
    }
}

impl<R: Read> Iterator for Decoder<R> {
    type Item = Result<Pixel, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_pixel() {
            Ok(Some(p)) => Some(Ok(p)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

/// Reads the header, then returns it alongside a lazy [`Decoder`] over
/// the rest of `source`.
pub fn decode<R: Read>(mut source: R) -> Result<(Header, Decoder<R>), Error> {
    let header = Header::read_from(&mut source)?;
    Ok((header, Decoder::new(source)))
}

/// Like [`decode`], but additionally verifies that the number of pixels
/// yielded equals `header.width * header.height` once the stream ends,
/// surfacing [`Error::PixelCountMismatch`] otherwise. Kept separate from
/// `decode` so the base decoder never needs a known pixel count to
/// operate (see SPEC_FULL.md Open Question (a)).
pub fn decode_strict<R: Read>(source: R) -> Result<(Header, Vec<Pixel>), Error> {
    let (header, decoder) = decode(source)?;

    let mut pixels = Vec::new();
    for pixel in decoder {
        pixels.push(pixel?);
    }

    let expected = header.pixel_count();
    let actual = pixels.len() as u64;
    if expected != actual {
        return Err(Error::PixelCountMismatch { expected, actual });
    }

    Ok((header, pixels))
}

/// Convenience wrapper: decode a file at `path` fully into memory.
pub fn decode_file(path: impl AsRef<std::path::Path>) -> Result<(Header, Vec<Pixel>), Error> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    let (header, decoder) = decode(reader)?;
    let pixels = decoder.collect::<Result<Vec<_>, _>>()?;
    Ok((header, pixels))
}
