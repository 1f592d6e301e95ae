use std::collections::HashSet;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use game::{
    Difficulty, GameError, Image, ImageSelection, MemoryStore, NewScore, RoundProgress,
    SaveOutcome, ScoreLedger, ScoreRecord, SessionManager, UserAggregate, UserId,
};
use uuid::Uuid;

const LAKE: &str = "A serene mountain lake surrounded by pine trees";

fn seeded_store(per_tier: usize) -> MemoryStore {
    let store = MemoryStore::new();
    for difficulty in Difficulty::ALL {
        for i in 0..per_tier {
            store.insert_image(Image::new(
                format!("/images/{difficulty}-{i}.jpg"),
                LAKE,
                difficulty,
                Some("nature".into()),
            ));
        }
    }
    store
}

fn manager(store: &MemoryStore) -> SessionManager {
    SessionManager::new(Arc::new(store.clone()), Arc::new(store.clone()))
}

struct BrokenLedger;

#[async_trait]
impl ScoreLedger for BrokenLedger {
    async fn append(&self, _score: NewScore) -> Result<ScoreRecord> {
        Err(anyhow!("connection reset"))
    }

    async fn group_by_user(&self, _difficulty: Option<Difficulty>) -> Result<Vec<UserAggregate>> {
        Ok(Vec::new())
    }

    async fn records_for_user(&self, _user_id: UserId) -> Result<Vec<ScoreRecord>> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn easy_session_has_five_rounds_of_two_minutes() {
    let store = seeded_store(7);
    let session = manager(&store)
        .create_session(Difficulty::Easy)
        .await
        .unwrap();
    assert_eq!(session.total_rounds, 5);
    assert_eq!(session.images.len(), 5);
    assert_eq!(session.time_limit, 120);
    assert_eq!(session.current_round, 0);
    assert!(session.scores.is_empty());
    assert!(session.images.iter().all(|i| i.difficulty == Difficulty::Easy));
}

#[tokio::test]
async fn random_selection_never_repeats_an_image() {
    let store = seeded_store(7);
    let manager = manager(&store).with_selection(ImageSelection::Random);
    for _ in 0..20 {
        let session = manager.create_session(Difficulty::Hard).await.unwrap();
        let ids: HashSet<Uuid> = session.images.iter().map(|i| i.id).collect();
        assert_eq!(ids.len(), session.total_rounds);
    }
}

#[tokio::test]
async fn ordered_selection_takes_lowest_ids() {
    let store = seeded_store(7);
    let manager = manager(&store).with_selection(ImageSelection::Ordered);
    let session = manager.create_session(Difficulty::Medium).await.unwrap();

    let mut expected: Vec<Uuid> = game::ImageCatalog::find_by_difficulty(&store, Difficulty::Medium)
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.id)
        .collect();
    expected.sort();
    expected.truncate(5);

    let got: Vec<Uuid> = session.images.iter().map(|i| i.id).collect();
    assert_eq!(got, expected);
}

#[tokio::test]
async fn short_catalog_shortens_the_game() {
    let store = seeded_store(2);
    let session = manager(&store)
        .create_session(Difficulty::Challenge)
        .await
        .unwrap();
    assert_eq!(session.total_rounds, 2);
    assert_eq!(session.time_limit, 30);
}

#[tokio::test]
async fn empty_tier_is_an_error() {
    let store = MemoryStore::new();
    let err = manager(&store)
        .create_session(Difficulty::Easy)
        .await
        .unwrap_err();
    assert!(matches!(err, GameError::NoImages(Difficulty::Easy)));
    assert!(err.is_not_found());
}

#[tokio::test]
async fn full_playthrough_records_every_round() {
    let store = seeded_store(5);
    let manager = manager(&store);
    let user = Uuid::new_v4();
    let mut session = manager.create_session(Difficulty::Easy).await.unwrap();

    let prompts = [
        LAKE,
        "mountain lake pine trees",
        "mountain lake pine trees",
        "a mountain lake",
        "xyz abc nothing relevant",
    ];
    for (round, prompt) in prompts.iter().enumerate() {
        assert_eq!(session.scores.len(), session.current_round);
        let image_id = session.current_image().unwrap().id;
        let scored = manager
            .submit_round(&mut session, image_id, prompt, Some(user))
            .await
            .unwrap();
        assert!(matches!(scored.saved, SaveOutcome::Saved(_)));
        assert_eq!(scored.result.ideal_prompt, LAKE);
        assert_eq!(session.scores.len(), session.current_round + 1);

        let progress = manager.advance_round(&mut session).unwrap();
        if round + 1 < prompts.len() {
            assert_eq!(progress, RoundProgress::Next { round: round + 1 });
        } else {
            assert_eq!(progress, RoundProgress::Finished);
        }
    }

    assert_eq!(session.current_round, 4);
    assert_eq!(session.scores, vec![100, 67, 67, 55, 0]);
    let result = session.finish().unwrap();
    assert_eq!(result.score, 58);
    assert_eq!(result.difficulty, Difficulty::Easy);

    let records = store.scores();
    assert_eq!(records.len(), 5);
    assert!(records.iter().all(|r| r.user_id == user));
    assert_eq!(records[1].user_prompt, "mountain lake pine trees");
}

#[tokio::test]
async fn anonymous_players_are_scored_but_not_recorded() {
    let store = seeded_store(5);
    let manager = manager(&store);
    let mut session = manager.create_session(Difficulty::Easy).await.unwrap();
    let image_id = session.current_image().unwrap().id;
    let scored = manager
        .submit_round(&mut session, image_id, "mountain lake pine trees", None)
        .await
        .unwrap();
    assert_eq!(scored.result.score, 67);
    assert_eq!(scored.saved, SaveOutcome::Anonymous);
    assert!(store.scores().is_empty());
}

#[tokio::test]
async fn rounds_cannot_be_submitted_twice_or_skipped() {
    let store = seeded_store(5);
    let manager = manager(&store);
    let mut session = manager.create_session(Difficulty::Easy).await.unwrap();
    let first = session.images[0].id;
    let second = session.images[1].id;

    let err = manager
        .submit_round(&mut session, second, "mountain lake pine trees", None)
        .await
        .unwrap_err();
    assert!(matches!(err, GameError::ImageMismatch(id) if id == second));

    manager
        .submit_round(&mut session, first, "mountain lake pine trees", None)
        .await
        .unwrap();
    let err = manager
        .submit_round(&mut session, first, "mountain lake pine trees", None)
        .await
        .unwrap_err();
    assert!(matches!(err, GameError::RoundAlreadySubmitted(0)));
    assert_eq!(session.scores.len(), 1);
}

#[tokio::test]
async fn vanished_image_aborts_without_a_record() {
    let store = seeded_store(5);
    let manager = manager(&store);
    let mut session = manager.create_session(Difficulty::Easy).await.unwrap();
    let image_id = session.current_image().unwrap().id;
    store.remove_image(image_id);

    let err = manager
        .submit_round(&mut session, image_id, "mountain lake pine trees", Some(Uuid::new_v4()))
        .await
        .unwrap_err();
    assert!(matches!(err, GameError::ImageNotFound(id) if id == image_id));
    assert!(session.scores.is_empty());
    assert!(store.scores().is_empty());
}

#[tokio::test]
async fn ledger_failure_still_returns_the_score() {
    let store = seeded_store(5);
    let manager = SessionManager::new(Arc::new(store.clone()), Arc::new(BrokenLedger));
    let mut session = manager.create_session(Difficulty::Easy).await.unwrap();
    let image_id = session.current_image().unwrap().id;

    let scored = manager
        .submit_round(&mut session, image_id, "mountain lake pine trees", Some(Uuid::new_v4()))
        .await
        .unwrap();
    assert_eq!(scored.result.score, 67);
    assert_eq!(scored.saved, SaveOutcome::Failed);
    assert_eq!(session.scores, vec![67]);
}
