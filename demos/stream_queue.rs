//! Stream queue walkthrough
//!
//! Run with: cargo run --example stream_queue
//!
//! Sets up two streams on an in-memory bracket and walks through the queue
//! operations a tournament organiser would issue during a bracket:
//!
//! - queueing sets, including one that is already queued elsewhere
//! - reordering with insert/swap
//! - handing a set over from one stream to another
//! - retiring finished sets with the cleanup pass
//! - saving the registry and restoring it

use std::sync::Arc;

use bracket_streams::bracket::{MatchInfo, MatchStatus, MemoryBracket};
use bracket_streams::registry::{
    EntryState, RegistryConfig, RegistrySnapshot, StreamerInfo, StreamerRegistry,
};
use bracket_streams::{MemberId, Streamer, StreamerLink};

fn print_info(info: &StreamerInfo) {
    println!(
        "<{}> by {} (room: {} / {})",
        info.link,
        info.owner,
        info.room_id.as_deref().unwrap_or("-"),
        info.room_code.as_deref().unwrap_or("-"),
    );
    for entry in &info.entries {
        match &entry.state {
            EntryState::WaitingForPlayers => println!("  #{}: waiting for players", entry.set),
            EntryState::Ready {
                player1,
                player2,
                status,
            } => {
                let marker = if Some(entry.set) == info.active_set { "*" } else { " " };
                println!(" {}#{}: {} vs {} ({:?})", marker, entry.set, player1, player2, status);
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bracket_streams=debug".parse()?)
                .add_directive("stream_queue=debug".parse()?),
        )
        .init();

    let bracket = Arc::new(MemoryBracket::new());
    bracket.insert(MatchInfo::new(252, "Alice", "Bob").with_status(MatchStatus::Ongoing));
    bracket.insert(MatchInfo::new(253, "Carol", "Dave"));
    bracket.insert(MatchInfo::new(254, "Erin", "Frank").with_status(MatchStatus::OnHold));

    let config = RegistryConfig::default().max_queue_len(16);
    let registry = StreamerRegistry::with_config(bracket.clone(), config);

    let main_stream = StreamerLink::new("firedragon");
    let side_stream = StreamerLink::new("el_laggron");

    registry
        .register(Streamer::new(main_stream.clone(), MemberId(1)))
        .await?;
    registry
        .register(Streamer::new(side_stream.clone(), MemberId(2)))
        .await?;
    registry
        .set_room(&main_stream, Some("5RF7G".into()), Some("260".into()))
        .await?;

    let errors = registry.add_matches(&main_stream, [254, 252, 253, 260]).await?;
    assert!(errors.is_empty());

    // 253 is already on the main stream
    let errors = registry.add_matches(&side_stream, [253, 255]).await?;
    for (set, error) in &errors {
        tracing::warn!(stream = %side_stream, set, %error, "Set rejected");
    }

    registry.insert_match(&main_stream, 260, Some(252)).await?;
    registry.swap_matches(&main_stream, 253, 254).await?;

    // Hand 253 over to the side stream
    registry.remove_matches(&main_stream, [253]).await?;
    registry.add_matches(&side_stream, [253]).await?;

    for info in registry.list().await {
        print_info(&info);
    }

    bracket.set_status(252, MatchStatus::Finished);
    let retired = registry.cleanup().await;
    tracing::info!(retired, "Cleanup pass done");

    let snapshot = registry.snapshot().await;
    let json = serde_json::to_string_pretty(&snapshot)?;
    println!("{}", json);

    let decoded: RegistrySnapshot = serde_json::from_str(&json)?;
    let restored = StreamerRegistry::restore(bracket, RegistryConfig::default(), decoded)?;
    for info in restored.list().await {
        print_info(&info);
    }

    let closed = restored.close(&side_stream).await?;
    tracing::info!(stream = %closed.link(), "Side stream closed");

    Ok(())
}
