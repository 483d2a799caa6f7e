use thiserror::Error;

/// Errors produced while decoding a message buffer.
///
/// Unrecognized message tags are *not* an error; they decode to
/// [`Message::Unknown`](crate::Message::Unknown) so newer server builds do
/// not break the client.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DecodeError {
    /// A read ran past the end of the buffer.
    #[error("read of {wanted} bytes at offset {offset} overruns buffer ({remaining} left)")]
    OutOfBounds {
        offset: usize,
        wanted: usize,
        remaining: usize,
    },

    /// A message payload failed to decode. Carries the message tag and the
    /// byte offset at which decoding stopped; the whole message is rejected,
    /// there is no partial result.
    #[error("malformed message (tag {tag}) at offset {offset}")]
    MalformedMessage {
        tag: u8,
        offset: usize,
        #[source]
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    /// Byte offset at which the error occurred.
    pub fn offset(&self) -> usize {
        match self {
            DecodeError::OutOfBounds { offset, .. } => *offset,
            DecodeError::MalformedMessage { offset, .. } => *offset,
        }
    }
}
