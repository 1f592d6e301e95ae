//! Demo catalog and demo account.

use anyhow::Result;
use chrono::{Duration, Utc};
use game::{Difficulty, Image, MemoryStore, UserId, UserProfile};
use storage::SeaOrmStore;
use uuid::Uuid;

pub const DEMO_EMAIL: &str = "demo@promptcraft.com";
pub const DEMO_NAME: &str = "Demo User";
/// Session token that signs requests in as the demo user.
pub const DEMO_TOKEN: &str = "promptcraft-demo-session";
pub const DEMO_USER_ID: UserId = Uuid::from_u128(0x5d3f_1c2a_8b4e_4f6a_9c7d_0e1f_2a3b_4c5d);

const CATALOG: &[(&str, &str, Difficulty, &str)] = &[
    (
        "/images/mountain-lake.jpg",
        "A serene mountain lake surrounded by pine trees with snow-capped peaks in the background under a clear blue sky",
        Difficulty::Easy,
        "nature",
    ),
    (
        "/images/cafe-interior.jpg",
        "A cozy cafe interior with wooden tables, hanging plants, and large windows letting in natural light",
        Difficulty::Easy,
        "interior",
    ),
    (
        "/images/beach-sunset.jpg",
        "A sandy beach at sunset with gentle waves and a palm tree silhouetted against an orange sky",
        Difficulty::Easy,
        "nature",
    ),
    (
        "/images/red-bicycle.jpg",
        "A red bicycle leaning against a brick wall next to a flower pot on a sunny street",
        Difficulty::Easy,
        "urban",
    ),
    (
        "/images/sleeping-cat.jpg",
        "A fluffy orange cat sleeping on a soft blanket beside a sunny window",
        Difficulty::Easy,
        "animals",
    ),
    (
        "/images/futuristic-city.jpg",
        "A futuristic cityscape at night with neon lights, flying vehicles, and tall skyscrapers",
        Difficulty::Medium,
        "sci-fi",
    ),
    (
        "/images/butterfly.jpg",
        "A close-up of a colorful butterfly resting on a purple flower with dew drops",
        Difficulty::Medium,
        "nature",
    ),
    (
        "/images/farmers-market.jpg",
        "A busy farmers market with wooden stalls full of fresh vegetables, fruit baskets, and striped awnings",
        Difficulty::Medium,
        "people",
    ),
    (
        "/images/lighthouse-storm.jpg",
        "A white lighthouse on a rocky cliff during a storm with crashing waves and dark clouds",
        Difficulty::Medium,
        "nature",
    ),
    (
        "/images/library-reading-room.jpg",
        "A grand library reading room with tall bookshelves, green desk lamps, and an arched glass ceiling",
        Difficulty::Medium,
        "interior",
    ),
    (
        "/images/ancient-temple.jpg",
        "An ancient stone temple partially covered in vines and moss, with sunlight streaming through broken walls",
        Difficulty::Hard,
        "architecture",
    ),
    (
        "/images/robot.jpg",
        "A sleek humanoid robot with glowing blue eyes standing in a minimalist white laboratory",
        Difficulty::Hard,
        "technology",
    ),
    (
        "/images/underwater-reef.jpg",
        "A vibrant coral reef teeming with tropical fish, sea turtles, and rays of light filtering through clear turquoise water",
        Difficulty::Hard,
        "nature",
    ),
    (
        "/images/steampunk-workshop.jpg",
        "A cluttered steampunk workshop with brass gears, copper pipes, glowing lanterns, and an unfinished clockwork automaton",
        Difficulty::Hard,
        "fantasy",
    ),
    (
        "/images/winter-village.jpg",
        "A snowy alpine village at dusk with warm lit windows, a small church steeple, and smoke rising from chimneys",
        Difficulty::Hard,
        "architecture",
    ),
    (
        "/images/abstract-art.jpg",
        "An abstract painting with swirls of vibrant colors including red, blue, and yellow creating a sense of movement and emotion",
        Difficulty::Challenge,
        "art",
    ),
    (
        "/images/food-plating.jpg",
        "An elegantly plated gourmet dish with microgreens, colorful sauces, and artistic presentation on a black ceramic plate",
        Difficulty::Challenge,
        "food",
    ),
    (
        "/images/surreal-desert.jpg",
        "A surreal desert landscape with melting clocks draped over dead branches beneath a pale lavender sky and long shadows",
        Difficulty::Challenge,
        "art",
    ),
    (
        "/images/night-market.jpg",
        "A crowded asian night market with paper lanterns, steaming food carts, reflective wet pavement, and people holding umbrellas",
        Difficulty::Challenge,
        "people",
    ),
    (
        "/images/macro-frost.jpg",
        "A macro photograph of delicate frost crystals forming geometric patterns on a dark green leaf at dawn",
        Difficulty::Challenge,
        "nature",
    ),
];

pub fn demo_images() -> Vec<Image> {
    CATALOG
        .iter()
        .map(|&(url, prompt, difficulty, category)| {
            Image::new(url, prompt, difficulty, Some(category.to_string()))
        })
        .collect()
}

pub fn demo_user() -> UserProfile {
    UserProfile {
        id: DEMO_USER_ID,
        display_name: Some(DEMO_NAME.to_string()),
        avatar_url: None,
    }
}

pub fn seed_memory(store: &MemoryStore) {
    for image in demo_images() {
        store.insert_image(image);
    }
    store.insert_user(demo_user());
    store.insert_token(DEMO_TOKEN, DEMO_USER_ID);
    log::info!("seeded {} demo images and {DEMO_NAME}", CATALOG.len());
}

pub async fn seed_database(store: &SeaOrmStore) -> Result<()> {
    for image in demo_images() {
        store.upsert_image(&image).await?;
    }
    store.upsert_user(&demo_user(), DEMO_EMAIL).await?;
    store
        .insert_session(DEMO_TOKEN, DEMO_USER_ID, Utc::now() + Duration::days(365))
        .await?;
    log::info!("seeded {} demo images and {DEMO_NAME}", CATALOG.len());
    Ok(())
}
