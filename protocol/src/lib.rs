mod commands;
mod cursor;
mod decoder;
mod error;
mod message;

pub use commands::{encode_command, encode_handshake, encode_move, Command};
pub use cursor::ByteCursor;
pub use decoder::decode;
pub use error::DecodeError;
pub use message::{tags, Consumption, Entity, LeaderBoardEntry, Message};
