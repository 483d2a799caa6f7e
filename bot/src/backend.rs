//! Framed connection to the backend proxy.
//!
//! The proxy owns WebSocket concerns and message boundary detection; what
//! arrives here is a plain TCP stream of length-prefixed frames, each frame
//! one complete game message. Outbound command frames use the same framing.

use anyhow::{bail, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

/// Upper bound on a single frame. Anything larger is a corrupt length
/// prefix, not a real message.
const MAX_FRAME_LEN: usize = 1024 * 1024;

/// Connects to the proxy and splits the stream into framed halves.
pub async fn connect(addr: &str) -> Result<(FrameReader, FrameWriter)> {
    let stream = TcpStream::connect(addr).await?;
    log::info!("Connected to backend proxy at {}", addr);
    let (read_half, write_half) = stream.into_split();
    Ok((
        FrameReader { reader: read_half },
        FrameWriter { writer: write_half },
    ))
}

/// Reads u32le-length-prefixed frames.
pub struct FrameReader {
    reader: OwnedReadHalf,
}

impl FrameReader {
    /// Reads the next complete frame.
    ///
    /// # Returns
    /// `Ok(None)` on a clean end of stream, the frame payload otherwise.
    pub async fn next_frame(&mut self) -> Result<Option<Vec<u8>>> {
        let mut len_bytes = [0u8; 4];
        match self.reader.read_exact(&mut len_bytes).await {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        }

        let len = u32::from_le_bytes(len_bytes) as usize;
        if len > MAX_FRAME_LEN {
            bail!("frame length {} exceeds cap of {}", len, MAX_FRAME_LEN);
        }

        let mut payload = vec![0u8; len];
        self.reader.read_exact(&mut payload).await?;
        Ok(Some(payload))
    }
}

/// Writes u32le-length-prefixed frames.
pub struct FrameWriter {
    writer: OwnedWriteHalf,
}

impl FrameWriter {
    pub async fn send(&mut self, payload: &[u8]) -> Result<()> {
        self.writer
            .write_all(&(payload.len() as u32).to_le_bytes())
            .await?;
        self.writer.write_all(payload).await?;
        Ok(())
    }
}
