use crate::agent::{self, Action};
use crate::backend::{self, FrameWriter};
use crate::game_state::GameState;
use anyhow::Result;
use protocol::{decode, Command, Message};
use std::time::Duration;
use tokio::sync::mpsc;

const DEFAULT_STEP_INTERVAL_MS: u64 = 50;

#[derive(Debug)]
/// The automated player: owns the game state and the run loop
///
/// # Examples
/// ```rust,no_run
/// # use bot::Bot;
/// # async fn run() -> anyhow::Result<()> {
/// Bot::new("127.0.0.1:2025").step_interval_ms(50).run().await
/// # }
/// ```
pub struct Bot {
    addr: String,
    step_interval: Duration,
    state: GameState,
}

impl Bot {
    pub fn new<S: Into<String>>(addr: S) -> Bot {
        Bot {
            addr: addr.into(),
            step_interval: Duration::from_millis(DEFAULT_STEP_INTERVAL_MS),
            state: GameState::new(),
        }
    }

    /// Sets how often the agent takes an in-game action
    ///
    /// # Arguments
    /// * `ms` - Step interval in milliseconds
    ///
    /// # Returns
    /// Mutable Self for method chaining
    pub fn step_interval_ms(&mut self, ms: u64) -> &mut Self {
        self.step_interval = Duration::from_millis(ms);
        self
    }

    /// Connects to the backend proxy and plays until the connection ends.
    pub async fn run(&mut self) -> Result<()> {
        let (mut frames, mut commands) = backend::connect(&self.addr).await?;

        for frame in protocol::encode_handshake() {
            commands.send(&frame).await?;
        }

        // Reader task feeds complete frames through a channel so the select
        // loop below never tears down a half-finished read.
        let (tx, mut rx) = mpsc::channel::<Vec<u8>>(64);
        tokio::spawn(async move {
            loop {
                match frames.next_frame().await {
                    Ok(Some(frame)) => {
                        if tx.send(frame).await.is_err() {
                            break;
                        }
                    }
                    Ok(None) => {
                        log::info!("Backend closed the connection");
                        break;
                    }
                    Err(e) => {
                        log::error!("Failed to read from backend: {}", e);
                        break;
                    }
                }
            }
        });

        let mut ticker = tokio::time::interval(self.step_interval);
        loop {
            tokio::select! {
                frame = rx.recv() => {
                    match frame {
                        Some(buf) => self.handle_frame(&buf),
                        None => return Ok(()),
                    }
                }
                _ = ticker.tick() => {
                    if let Some(action) = agent::step(&self.state) {
                        self.perform(action, &mut commands).await?;
                    }
                }
            }
        }
    }

    /// Decodes one framed buffer and folds it into the game state.
    ///
    /// Unknown tags are expected from newer server builds and only logged;
    /// a malformed frame is dropped on its own, the stream keeps going.
    fn handle_frame(&mut self, buf: &[u8]) {
        match decode(buf) {
            Ok(Message::Unknown { tag, data }) => {
                log::debug!("Unknown message tag {} with {} payload bytes", tag, data.len());
            }
            Ok(message) => {
                if let Ok(json) = serde_json::to_string(&message) {
                    log::trace!("Received {}", json);
                }
                if let Message::UserId { id } = &message {
                    log::info!("Playing as entity {}", id);
                }
                self.state.apply(&message);
            }
            Err(e) => {
                log::warn!("Dropping malformed frame: {}", e);
            }
        }
    }

    async fn perform(&self, action: Action, commands: &mut FrameWriter) -> Result<()> {
        match action {
            Action::Play => {
                log::debug!("No live entity, pressing play");
                commands
                    .send(&protocol::encode_command(Command::Play))
                    .await
            }
            Action::MoveTo { x, y } => commands.send(&protocol::encode_move(x, y)).await,
        }
    }
}
