use serde::{Deserialize, Serialize};

/// Message type tags as sent by the agar.io backend.
pub mod tags {
    pub const UPDATES: u8 = 16;
    pub const SCREEN_POSITION: u8 = 17;
    pub const RESET: u8 = 20;
    pub const USER_ID: u8 = 32;
    pub const LEADER_BOARD: u8 = 49;
    // Not sure what this one carries yet, possibly ids.
    pub const UNCLASSIFIED: u8 = 50;
    pub const BOARD_SIZE: u8 = 64;
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
/// Represents a visible game object: a player cell, food pellet or virus
///
/// # Fields
/// - `id`: Entity identifier, never 0 in decoded output
/// - `x`, `y`: Current position
/// - `size`: Radius of the entity
/// - `color`: Hex color string including the leading `#`
/// - `is_virus`, `is_agitated`: Flag-byte attributes
/// - `name`: Display name, may be empty
pub struct Entity {
    pub id: u32,
    pub x: i16,
    pub y: i16,
    pub size: i16,
    pub color: String,
    pub is_virus: bool,
    pub is_agitated: bool,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
/// Records that one entity absorbed another. The "consumer" reading of the
/// first field is the best interpretation available, not a certainty.
pub struct Consumption {
    pub consumer_id: u32,
    pub consumed_id: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LeaderBoardEntry {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", content = "data")]
/// One decoded message from the backend stream
///
/// Each variant corresponds to one tag in [`tags`]; tags the decoder does
/// not recognize come back as [`Message::Unknown`] with the payload bytes
/// untouched.
pub enum Message {
    Updates {
        consumptions: Vec<Consumption>,
        entities: Vec<Entity>,
        destructions: Vec<u32>,
    },
    ScreenPosition {
        x: f32,
        y: f32,
        z: f32,
    },
    Reset,
    UserId {
        id: u32,
    },
    LeaderBoard {
        entries: Vec<LeaderBoardEntry>,
    },
    Unclassified {
        values: Vec<f32>,
    },
    BoardSize {
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
    },
    Unknown {
        tag: u8,
        data: Vec<u8>,
    },
}

impl Message {
    /// The wire tag this message was (or would be) carried under.
    pub fn tag(&self) -> u8 {
        match self {
            Message::Updates { .. } => tags::UPDATES,
            Message::ScreenPosition { .. } => tags::SCREEN_POSITION,
            Message::Reset => tags::RESET,
            Message::UserId { .. } => tags::USER_ID,
            Message::LeaderBoard { .. } => tags::LEADER_BOARD,
            Message::Unclassified { .. } => tags::UNCLASSIFIED,
            Message::BoardSize { .. } => tags::BOARD_SIZE,
            Message::Unknown { tag, .. } => *tag,
        }
    }
}
