//! Standalone Somnia server with the dev authenticator and a fixed
//! starter deck for every player. Pass a listen address as the first
//! argument; defaults to 127.0.0.1:9090.

use std::sync::Arc;

use somnia::Server;
use somnia_battle::{InventoryProvider, MatchConfig};
use somnia_cards::{Card, CardEffect, CardType, Rarity};
use somnia_protocol::PlayerId;
use somnia_session::DevAuthenticator;
use tracing_subscriber::EnvFilter;

/// Every player draws from the same fixed deck until a real account
/// store provides per-player inventories.
struct StarterDeck {
    cards: Vec<Card>,
}

impl StarterDeck {
    fn new() -> Self {
        fn card(
            id: &str,
            name: &str,
            description: &str,
            card_type: CardType,
            rarity: Rarity,
            effect: CardEffect,
            points: u32,
        ) -> Card {
            Card {
                id: id.into(),
                name: name.into(),
                description: description.into(),
                card_type,
                rarity,
                effect,
                points,
            }
        }

        let cards = vec![
            card(
                "pill-melatonin",
                "Melatonin",
                "A gentle dose. Restores a little sanity.",
                CardType::Pill,
                Rarity::Common,
                CardEffect::None,
                4,
            ),
            card(
                "pill-warm-milk",
                "Warm Milk",
                "Comfort in a cup.",
                CardType::Pill,
                Rarity::Common,
                CardEffect::None,
                3,
            ),
            card(
                "pill-lucidity",
                "Lucidity Tonic",
                "Sharpens the mind and briefly wakes the dreamer.",
                CardType::Pill,
                Rarity::Uncommon,
                CardEffect::Conscious,
                5,
            ),
            card(
                "pill-deep-breath",
                "Deep Breath",
                "Steady. Steady.",
                CardType::Pill,
                Rarity::Common,
                CardEffect::None,
                2,
            ),
            card(
                "dream-flying",
                "Flying Dream",
                "Weightless over the rooftops.",
                CardType::Dream,
                Rarity::Common,
                CardEffect::None,
                3,
            ),
            card(
                "dream-maze",
                "Endless Maze",
                "The corridors fold back on themselves.",
                CardType::Dream,
                Rarity::Uncommon,
                CardEffect::Paralyzed,
                4,
            ),
            card(
                "dream-familiar-house",
                "Familiar House",
                "The rooms are wrong in ways you can't name.",
                CardType::Dream,
                Rarity::Common,
                CardEffect::None,
                2,
            ),
            card(
                "nightmare-falling",
                "Falling",
                "The ground never arrives.",
                CardType::Nightmare,
                Rarity::Common,
                CardEffect::Scared,
                5,
            ),
            card(
                "nightmare-chase",
                "The Chase",
                "Your legs won't move fast enough.",
                CardType::Nightmare,
                Rarity::Uncommon,
                CardEffect::Scared,
                6,
            ),
            card(
                "nightmare-sleep-paralysis",
                "Sleep Paralysis",
                "Something is in the room and you cannot move.",
                CardType::Nightmare,
                Rarity::Rare,
                CardEffect::Paralyzed,
                7,
            ),
            card(
                "nightmare-teeth",
                "Falling Teeth",
                "One by one, into your cupped hands.",
                CardType::Nightmare,
                Rarity::Common,
                CardEffect::None,
                4,
            ),
            card(
                "dream-deja-vu",
                "Deja Vu",
                "You have played this card before.",
                CardType::Dream,
                Rarity::Rare,
                CardEffect::Sleepy,
                3,
            ),
        ];
        Self { cards }
    }
}

impl InventoryProvider for StarterDeck {
    fn inventory(&self, _player: PlayerId) -> Vec<Card> {
        self.cards.clone()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:9090".to_string());

    let server = Server::bind(
        &addr,
        MatchConfig::default(),
        DevAuthenticator,
        Arc::new(StarterDeck::new()),
    )
    .await?;
    tracing::info!(addr = %server.local_addr()?, "somnia server running");
    server.run().await?;
    Ok(())
}
