use anyhow::Result;
use clap::Parser;
use term_snake::game::GameConfig;
use term_snake::session::GameSession;

/// Game rules are fixed at build time; the only interface is the
/// interactive screen.
#[derive(Parser)]
#[command(name = "term_snake")]
#[command(version, about = "Classic block-eating snake in the terminal")]
struct Cli {}

#[tokio::main]
async fn main() -> Result<()> {
    let _cli = Cli::parse();

    let mut session = GameSession::new(GameConfig::default());
    session.run().await
}
