use std::io::Cursor;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::frame::{self, Frame};
use crate::Result;

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// How long a closing connection may spend flushing buffered replies.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

pub struct Connection {
    pub id: u64,
    stream: BufWriter<TcpStream>,
    // Data is read from the socket into the read buffer. When a frame is
    // parsed, the corresponding bytes are removed from the buffer.
    buffer: BytesMut,
}

impl Connection {
    pub fn new(stream: TcpStream) -> Connection {
        Connection {
            id: NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed),
            stream: BufWriter::new(stream),
            buffer: BytesMut::with_capacity(4096),
        }
    }

    /// Reads a single frame, waiting for more data as long as the buffer
    /// holds only a prefix of one. Returns `None` when the peer closed the
    /// connection cleanly between frames.
    pub async fn read_frame(&mut self) -> Result<Option<Frame>> {
        loop {
            if let Some(frame) = self.parse_frame()? {
                return Ok(Some(frame));
            }

            if 0 == self.stream.read_buf(&mut self.buffer).await? {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                return Err("connection reset by peer".into());
            }
        }
    }

    fn parse_frame(&mut self) -> Result<Option<Frame>> {
        let mut cursor = Cursor::new(&self.buffer[..]);

        match Frame::parse(&mut cursor) {
            Ok(frame) => {
                let position = cursor.position() as usize;
                self.buffer.advance(position);
                Ok(Some(frame))
            }
            Err(frame::Error::Incomplete) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        let bytes = frame.serialize();
        self.stream.write_all(&bytes).await?;
        self.stream.flush().await?;
        Ok(())
    }

    /// Flushes whatever is still buffered and shuts the write half down,
    /// bounded by the drain window so shutdown cannot hang on a stuck peer.
    pub async fn shutdown(&mut self) {
        let _ = timeout(DRAIN_TIMEOUT, self.stream.shutdown()).await;
    }
}
