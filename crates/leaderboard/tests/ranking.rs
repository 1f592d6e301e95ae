use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use game::{
    Difficulty, IdentityProvider, Image, ImageId, MemoryStore, NewScore, ScoreLedger, UserId,
    UserProfile,
};
use leaderboard::{ANONYMOUS_NAME, DifficultyFilter, LeaderboardService};
use uuid::Uuid;

fn service(store: &MemoryStore) -> LeaderboardService {
    LeaderboardService::new(Arc::new(store.clone()), Arc::new(store.clone()))
}

fn image(store: &MemoryStore, url: &str, difficulty: Difficulty) -> ImageId {
    store.insert_image(Image::new(url, "a lighthouse on a cliff", difficulty, None))
}

fn player(store: &MemoryStore, name: &str) -> UserId {
    let id = Uuid::new_v4();
    store.insert_user(UserProfile {
        id,
        display_name: Some(name.to_string()),
        avatar_url: Some(format!("https://avatars.test/{name}.png")),
    });
    id
}

async fn play(store: &MemoryStore, user_id: UserId, image_id: ImageId, scores: &[u8]) {
    for &score in scores {
        store
            .append(NewScore {
                user_id,
                image_id,
                user_prompt: "a lighthouse by the sea".into(),
                score,
            })
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn averages_and_counts_per_player() {
    let store = MemoryStore::new();
    let easy = image(&store, "/images/easy.jpg", Difficulty::Easy);
    let ada = player(&store, "ada");
    play(&store, ada, easy, &[80, 90, 70]).await;

    let entries = service(&store).top(DifficultyFilter::All, 10).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].average_score, 80);
    assert_eq!(entries[0].games_played, 3);
    assert_eq!(entries[0].user.name, "ada");
    assert_eq!(entries[0].rank, 1);
}

#[tokio::test]
async fn entries_sort_descending_and_truncate() {
    let store = MemoryStore::new();
    let easy = image(&store, "/images/easy.jpg", Difficulty::Easy);
    let low = player(&store, "low");
    let high = player(&store, "high");
    let mid = player(&store, "mid");
    play(&store, low, easy, &[20, 30]).await;
    play(&store, high, easy, &[95]).await;
    play(&store, mid, easy, &[60, 70]).await;

    let service = service(&store);
    let all = service.top(DifficultyFilter::All, 10).await.unwrap();
    let names: Vec<&str> = all.iter().map(|e| e.user.name.as_str()).collect();
    assert_eq!(names, vec!["high", "mid", "low"]);
    assert!(all.windows(2).all(|w| w[0].average_score >= w[1].average_score));

    let top_two = service.top(DifficultyFilter::All, 2).await.unwrap();
    assert_eq!(top_two.len(), 2);
    assert_eq!(top_two[1].user.name, "mid");
}

#[tokio::test]
async fn difficulty_filter_uses_the_image_tier() {
    let store = MemoryStore::new();
    let easy = image(&store, "/images/easy.jpg", Difficulty::Easy);
    let hard = image(&store, "/images/hard.jpg", Difficulty::Hard);
    let ada = player(&store, "ada");
    let bob = player(&store, "bob");
    play(&store, ada, easy, &[100]).await;
    play(&store, ada, hard, &[10]).await;
    play(&store, bob, hard, &[50]).await;

    let hard_board = service(&store)
        .top(DifficultyFilter::Only(Difficulty::Hard), 10)
        .await
        .unwrap();
    let rows: Vec<(&str, u8)> = hard_board
        .iter()
        .map(|e| (e.user.name.as_str(), e.average_score))
        .collect();
    assert_eq!(rows, vec![("bob", 50), ("ada", 10)]);

    let challenge = service(&store)
        .top(DifficultyFilter::Only(Difficulty::Challenge), 10)
        .await
        .unwrap();
    assert!(challenge.is_empty());
}

#[tokio::test]
async fn missing_profiles_show_as_anonymous() {
    let store = MemoryStore::new();
    let easy = image(&store, "/images/easy.jpg", Difficulty::Easy);
    let ghost = player(&store, "ghost");
    play(&store, ghost, easy, &[40]).await;
    store.remove_user(ghost);

    let entries = service(&store).top(DifficultyFilter::All, 10).await.unwrap();
    assert_eq!(entries[0].user.id, ghost);
    assert_eq!(entries[0].user.name, ANONYMOUS_NAME);
    assert_eq!(entries[0].user.image, None);
}

#[tokio::test]
async fn player_stats_report_rank_and_best() {
    let store = MemoryStore::new();
    let easy = image(&store, "/images/easy.jpg", Difficulty::Easy);
    let ada = player(&store, "ada");
    let bob = player(&store, "bob");
    play(&store, ada, easy, &[80, 90, 70]).await;
    play(&store, bob, easy, &[95]).await;

    let service = service(&store);
    let stats = service.player_stats(ada).await.unwrap();
    assert_eq!(stats.games_played, 3);
    assert_eq!(stats.average_score, 80);
    assert_eq!(stats.best_score, 90);
    assert_eq!(stats.rank, Some(2));

    let newcomer = service.player_stats(Uuid::new_v4()).await.unwrap();
    assert_eq!(newcomer.games_played, 0);
    assert_eq!(newcomer.rank, None);
}

#[tokio::test]
async fn entries_serialize_in_camel_case() {
    let store = MemoryStore::new();
    let easy = image(&store, "/images/easy.jpg", Difficulty::Easy);
    let ada = player(&store, "ada");
    play(&store, ada, easy, &[66]).await;

    let entries = service(&store).top(DifficultyFilter::All, 1).await.unwrap();
    let json = serde_json::to_value(&entries[0]).unwrap();
    assert_eq!(json["averageScore"], 66);
    assert_eq!(json["gamesPlayed"], 1);
    assert_eq!(json["user"]["name"], "ada");
    assert_eq!(json["user"]["image"], "https://avatars.test/ada.png");
}

struct UnreachableIdentity;

#[async_trait]
impl IdentityProvider for UnreachableIdentity {
    async fn resolve_token(&self, _token: &str) -> Result<Option<UserId>> {
        Err(anyhow!("identity provider timed out"))
    }

    async fn find_user(&self, _id: UserId) -> Result<Option<UserProfile>> {
        Err(anyhow!("identity provider timed out"))
    }
}

#[tokio::test]
async fn identity_outage_shows_players_as_anonymous() {
    let store = MemoryStore::new();
    let easy = image(&store, "/images/easy.jpg", Difficulty::Easy);
    let ada = player(&store, "ada");
    play(&store, ada, easy, &[80, 90, 70]).await;

    let service = LeaderboardService::new(Arc::new(store.clone()), Arc::new(UnreachableIdentity));
    let entries = service.top(DifficultyFilter::All, 10).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].user.id, ada);
    assert_eq!(entries[0].user.name, ANONYMOUS_NAME);
    assert_eq!(entries[0].user.image, None);
    assert_eq!(entries[0].average_score, 80);
}
