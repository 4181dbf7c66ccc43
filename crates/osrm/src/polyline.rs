//! Decoder for the polyline format OSRM returns its route geometry in:
//! coordinates at 1e-5 precision, delta-encoded, each delta zig-zagged and
//! split into 5-bit chunks shifted into the printable ASCII range.
//! See <https://developers.google.com/maps/documentation/utilities/polylinealgorithm>

use std::error;
use std::fmt;

use model::PathPoint;

const PRECISION: f64 = 1e-5;

/// Lowest byte of the encoding alphabet (`?` + 63 offset lands at `?`..`~`).
const ALPHABET_MIN: u8 = 63;
const ALPHABET_MAX: u8 = 126;

/// Bit set on every chunk except the last one of a value.
const CONTINUATION_BIT: i64 = 0x20;

#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// The input ended in the middle of a coordinate.
    UnexpectedEnd,
    /// A byte outside the encoding alphabet.
    InvalidByte { position: usize, byte: u8 },
    /// The geometry decoded to zero points.
    EmptyGeometry,
}

impl error::Error for DecodeError {}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DecodeError::UnexpectedEnd => {
                write!(f, "Polyline ended in the middle of a coordinate.")
            }
            DecodeError::InvalidByte { position, byte } => write!(
                f,
                "Invalid polyline byte 0x{:02x} at position {}.",
                byte, position
            ),
            DecodeError::EmptyGeometry => {
                write!(f, "Polyline decoded to an empty geometry.")
            }
        }
    }
}

/// Decodes an encoded polyline into (latitude, longitude) points.
/// An empty input yields an empty point list; callers that require geometry
/// should treat that as [`DecodeError::EmptyGeometry`].
pub fn decode(encoded: &str) -> Result<Vec<PathPoint>, DecodeError> {
    let mut bytes = encoded.bytes().enumerate().peekable();
    let mut points = Vec::new();
    let mut latitude: i64 = 0;
    let mut longitude: i64 = 0;

    while bytes.peek().is_some() {
        latitude += next_delta(&mut bytes)?;
        longitude += next_delta(&mut bytes)?;
        points.push(PathPoint::new(
            latitude as f64 * PRECISION,
            longitude as f64 * PRECISION,
        ));
    }

    Ok(points)
}

/// Reads one zig-zag encoded delta from the byte stream.
fn next_delta<I>(bytes: &mut I) -> Result<i64, DecodeError>
where
    I: Iterator<Item = (usize, u8)>,
{
    let mut value: i64 = 0;
    let mut shift = 0u32;

    loop {
        let (position, byte) = bytes.next().ok_or(DecodeError::UnexpectedEnd)?;
        if !(ALPHABET_MIN..=ALPHABET_MAX).contains(&byte) {
            return Err(DecodeError::InvalidByte { position, byte });
        }
        let chunk = (byte - ALPHABET_MIN) as i64;
        // 64 bits hold any coordinate delta; more chunks than that means the
        // input is corrupt rather than just large.
        if shift > 58 {
            return Err(DecodeError::InvalidByte { position, byte });
        }
        value |= (chunk & (CONTINUATION_BIT - 1)) << shift;
        if chunk & CONTINUATION_BIT == 0 {
            break;
        }
        shift += 5;
    }

    // undo zig-zag: even values are positive, odd values negative
    if value & 1 == 1 {
        Ok(!(value >> 1))
    } else {
        Ok(value >> 1)
    }
}
