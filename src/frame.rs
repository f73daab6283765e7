// https://redis.io/docs/reference/protocol-spec

use std::fmt;
use std::io::Cursor;
use std::string::FromUtf8Error;

use bytes::{Buf, Bytes};
use thiserror::Error as ThisError;

static CRLF: &[u8; 2] = b"\r\n";

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("not enough data is available to parse an entire frame")]
    Incomplete,
    #[error("invalid frame data type: {0}")]
    InvalidDataType(u8),
    #[error("protocol error; {0}")]
    Malformed(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Frame {
    Simple(String),
    Error(String),
    Integer(i64),
    Bulk(Bytes),
    Null,
    Array(Vec<Frame>),
}

impl Frame {
    /// Parses a single frame out of `src`, leaving the cursor just past it.
    /// `Error::Incomplete` means the buffer does not yet hold a full frame.
    pub fn parse(src: &mut Cursor<&[u8]>) -> Result<Self, Error> {
        // The first byte of an RESP payload identifies its type; the rest of
        // the frame is CRLF-delimited except for bulk payloads, which are
        // length-prefixed and binary safe.
        match get_byte(src)? {
            b'+' => {
                let line = get_line(src)?.to_vec();
                Ok(Frame::Simple(String::from_utf8(line)?))
            }
            b'-' => {
                let line = get_line(src)?.to_vec();
                Ok(Frame::Error(String::from_utf8(line)?))
            }
            b':' => {
                let number = parse_decimal(get_line(src)?)?;
                Ok(Frame::Integer(number))
            }
            // $<length>\r\n<data>\r\n
            b'$' => {
                let length = parse_decimal(get_line(src)?)?;
                if length == -1 {
                    return Ok(Frame::Null);
                }
                let length = usize::try_from(length)
                    .map_err(|_| Error::Malformed(format!("invalid bulk length: {}", length)))?;

                // The payload may contain CRLF, so it is taken by length
                // rather than by scanning for a terminator.
                if src.remaining() < length + CRLF.len() {
                    return Err(Error::Incomplete);
                }
                let start = src.position() as usize;
                let data = Bytes::copy_from_slice(&src.get_ref()[start..start + length]);
                src.advance(length);
                expect_crlf(src)?;

                Ok(Frame::Bulk(data))
            }
            // *<number-of-elements>\r\n<element-1>...<element-n>
            b'*' => {
                let length = parse_decimal(get_line(src)?)?;
                if length == -1 {
                    return Ok(Frame::Null);
                }
                let length = usize::try_from(length)
                    .map_err(|_| Error::Malformed(format!("invalid array length: {}", length)))?;

                let mut frames = Vec::with_capacity(length);
                for _ in 0..length {
                    frames.push(Self::parse(src)?);
                }

                Ok(Frame::Array(frames))
            }
            byte => Err(Error::InvalidDataType(byte)),
        }
    }

    /// Builds a multi-bulk reply out of plain byte strings.
    pub fn bulk_array<I>(values: I) -> Frame
    where
        I: IntoIterator<Item = Bytes>,
    {
        Frame::Array(values.into_iter().map(Frame::Bulk).collect())
    }

    pub fn serialize(&self) -> Vec<u8> {
        match self {
            Frame::Simple(s) => {
                let mut bytes = Vec::with_capacity(1 + s.len() + CRLF.len());
                bytes.push(b'+');
                bytes.extend_from_slice(s.as_bytes());
                bytes.extend_from_slice(CRLF);
                bytes
            }
            Frame::Error(s) => {
                let mut bytes = Vec::with_capacity(1 + s.len() + CRLF.len());
                bytes.push(b'-');
                bytes.extend_from_slice(s.as_bytes());
                bytes.extend_from_slice(CRLF);
                bytes
            }
            Frame::Integer(i) => {
                let repr = i.to_string();
                let mut bytes = Vec::with_capacity(1 + repr.len() + CRLF.len());
                bytes.push(b':');
                bytes.extend_from_slice(repr.as_bytes());
                bytes.extend_from_slice(CRLF);
                bytes
            }
            Frame::Bulk(data) => {
                let length = data.len().to_string();
                let mut bytes =
                    Vec::with_capacity(1 + length.len() + CRLF.len() + data.len() + CRLF.len());
                bytes.push(b'$');
                bytes.extend_from_slice(length.as_bytes());
                bytes.extend_from_slice(CRLF);
                bytes.extend_from_slice(data);
                bytes.extend_from_slice(CRLF);
                bytes
            }
            Frame::Null => b"$-1\r\n".to_vec(),
            Frame::Array(frames) => {
                let length = frames.len().to_string();
                let mut bytes = Vec::with_capacity(1 + length.len() + CRLF.len());
                bytes.push(b'*');
                bytes.extend_from_slice(length.as_bytes());
                bytes.extend_from_slice(CRLF);
                for frame in frames {
                    bytes.extend(frame.serialize());
                }
                bytes
            }
        }
    }
}

impl From<Frame> for Vec<u8> {
    fn from(frame: Frame) -> Self {
        frame.serialize()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frame::Simple(s) => write!(f, "+{}", s),
            Frame::Error(s) => write!(f, "-{}", s),
            Frame::Integer(i) => write!(f, ":{}", i),
            Frame::Bulk(bytes) => write!(f, "${}", String::from_utf8_lossy(bytes)),
            Frame::Null => write!(f, "$-1"),
            Frame::Array(frames) => {
                write!(f, "*{}", frames.len())?;
                for frame in frames {
                    write!(f, " {}", frame)?;
                }
                Ok(())
            }
        }
    }
}

fn get_byte(src: &mut Cursor<&[u8]>) -> Result<u8, Error> {
    if !src.has_remaining() {
        return Err(Error::Incomplete);
    }
    Ok(src.get_u8())
}

/// Returns the bytes up to the next CRLF and advances the cursor past it.
fn get_line<'a>(src: &mut Cursor<&'a [u8]>) -> Result<&'a [u8], Error> {
    let start = src.position() as usize;
    let end = src.get_ref().len();

    let terminator = src.get_ref()[start..end]
        .windows(CRLF.len())
        .position(|window| window == CRLF)
        .map(|index| start + index)
        .ok_or(Error::Incomplete)?;

    src.set_position((terminator + CRLF.len()) as u64);

    Ok(&src.get_ref()[start..terminator])
}

fn expect_crlf(src: &mut Cursor<&[u8]>) -> Result<(), Error> {
    if src.remaining() < CRLF.len() {
        return Err(Error::Incomplete);
    }
    let start = src.position() as usize;
    if &src.get_ref()[start..start + CRLF.len()] != CRLF {
        return Err(Error::Malformed("expected CRLF after bulk payload".into()));
    }
    src.advance(CRLF.len());
    Ok(())
}

fn parse_decimal(line: &[u8]) -> Result<i64, Error> {
    let repr = std::str::from_utf8(line)
        .map_err(|_| Error::Malformed("invalid frame format".into()))?;
    repr.parse::<i64>()
        .map_err(|_| Error::Malformed(format!("invalid decimal: {:?}", repr)))
}

impl From<FromUtf8Error> for Error {
    fn from(_src: FromUtf8Error) -> Error {
        Error::Malformed("invalid frame format".into())
    }
}
