//! Outbound command frames toward the game server.
//!
//! Everything the player can do goes out as one of these small buffers:
//! single-byte commands, the 21-byte move frame, and two opaque init frames
//! sent once after connecting.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Single-byte player commands
pub enum Command {
    /// Press the play button. Does not carry the nickname.
    Play,
    Spectate,
    Split,
    // 18 and 19 look like they clear the last action; the stock client maps
    // them to the q key and an onblur handler.
    Quit,
    Clear,
    EjectMass,
}

impl Command {
    fn code(self) -> u8 {
        match self {
            Command::Play => 0,
            Command::Spectate => 1,
            Command::Split => 17,
            Command::Quit => 18,
            Command::Clear => 19,
            Command::EjectMass => 21,
        }
    }
}

/// Encodes a single-byte command frame.
pub fn encode_command(command: Command) -> Vec<u8> {
    vec![command.code()]
}

/// Encodes the two init frames sent right after connecting.
///
/// The token values are opaque; they are what the stock client sends before
/// it will be given a player.
pub fn encode_handshake() -> [Vec<u8>; 2] {
    let mut first = vec![254u8];
    first.extend_from_slice(&4u32.to_le_bytes());

    let mut second = vec![255u8];
    second.extend_from_slice(&673_720_360u32.to_le_bytes());

    [first, second]
}

/// Encodes a move-toward command.
///
/// # Arguments
/// * `x`, `y` - Absolute board coordinates the player keeps moving toward
///
/// # Returns
/// A 21-byte frame: tag 16, two f64 coordinates, and a trailing u32 zero.
pub fn encode_move(x: f64, y: f64) -> Vec<u8> {
    let mut frame = Vec::with_capacity(21);
    frame.push(16u8);
    frame.extend_from_slice(&x.to_le_bytes());
    frame.extend_from_slice(&y.to_le_bytes());
    frame.extend_from_slice(&0u32.to_le_bytes());
    frame
}
