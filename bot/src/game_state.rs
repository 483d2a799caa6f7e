use protocol::{Entity, Message};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
/// The rectangular playable area. `min_x`/`min_y` have only ever been
/// observed as the origin.
pub struct Board {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

#[derive(Debug, Default)]
/// Accumulated view of the game, built from the decoded message stream
///
/// # Fields
/// - `user_id`: Our own entity id, once the server has assigned one
/// - `board`: Board bounds, once announced
/// - `entities`: Every entity currently known, keyed by id
pub struct GameState {
    user_id: Option<u32>,
    board: Option<Board>,
    entities: HashMap<u32, Entity>,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_id(&self) -> Option<u32> {
        self.user_id
    }

    pub fn board(&self) -> Option<Board> {
        self.board
    }

    pub fn entities(&self) -> &HashMap<u32, Entity> {
        &self.entities
    }

    /// The entity we are playing, if we have an id and it is still alive.
    pub fn user_entity(&self) -> Option<&Entity> {
        self.entities.get(&self.user_id?)
    }

    /// Applies one decoded message to the state.
    ///
    /// Updates are applied in consume, upsert, destroy order. The order
    /// matters: an id can be consumed and redefined in the same message, and
    /// the redefinition must win. Variants the state does not track are
    /// ignored here.
    pub fn apply(&mut self, message: &Message) {
        match message {
            Message::UserId { id } => {
                self.user_id = Some(*id);
            }
            Message::Updates {
                consumptions,
                entities,
                destructions,
            } => {
                for consumption in consumptions {
                    self.entities.remove(&consumption.consumed_id);
                }
                for entity in entities {
                    self.entities.insert(entity.id, entity.clone());
                }
                for id in destructions {
                    self.entities.remove(id);
                }
            }
            Message::BoardSize {
                min_x,
                min_y,
                max_x,
                max_y,
            } => {
                self.board = Some(Board {
                    min_x: *min_x,
                    min_y: *min_y,
                    max_x: *max_x,
                    max_y: *max_y,
                });
            }
            _ => {}
        }
    }
}
