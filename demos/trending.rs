//! Prints the trending rail twice; the second pass is served from cache.
//!
//! Run with `RUST_LOG=anigate=debug` to watch cache hits and retries.

use anigate::anilist::{AniList, format_airing_time};
use anigate::{ClientConfig, GatewayClient};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let anilist = AniList::new(GatewayClient::new(&ClientConfig::default())?);

    for pass in 1..=2 {
        println!("── pass {pass} ──");
        for media in anilist.trending().await? {
            let status = media.status.map_or("gray", |s| s.color());
            println!("{:>7}  {} [{status}]", media.id, media.display_title());
        }
    }

    if let Some(first) = anilist.trending().await?.first() {
        let details = anilist.details(first.id).await?;
        match details.next_airing_episode {
            Some(next) => println!(
                "next episode {} airs {}",
                next.episode,
                format_airing_time(next.airing_at)
            ),
            None => println!("no upcoming episode for {}", details.display_title()),
        }
    }

    println!("cached entries: {}", anilist.client().cached_entries());
    Ok(())
}
