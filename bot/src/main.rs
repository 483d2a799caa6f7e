mod agent;
mod backend;
mod bot;
mod game_state;

use bot::Bot;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:2025".to_string());

    Bot::new(addr).step_interval_ms(50).run().await
}
