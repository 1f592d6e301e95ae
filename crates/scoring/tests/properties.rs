use scoring::{FeedbackTier, MAX_MISSING_KEYWORDS, evaluate, missing_keywords, score};

const IDEALS: &[&str] = &[
    "A serene mountain lake surrounded by pine trees with snow-capped peaks in the background under a clear blue sky",
    "A cozy cafe interior with wooden tables, hanging plants, and large windows letting in natural light",
    "A futuristic cityscape at night with neon lights, flying vehicles, and tall skyscrapers",
    "An ancient stone temple partially covered in vines and moss, with sunlight streaming through broken walls",
];

const ATTEMPTS: &[&str] = &[
    "a lake with some trees",
    "neon city at night",
    "stone temple covered in moss",
    "wooden tables and plants in a cafe",
    "completely unrelated words here",
    "A",
];

fn reversed(text: &str) -> String {
    text.split_whitespace().rev().collect::<Vec<_>>().join(" ")
}

fn rotated(text: &str) -> String {
    let mut words: Vec<_> = text.split_whitespace().collect();
    words.rotate_left(1);
    words.join(" ")
}

#[test]
fn scores_stay_in_range() {
    for ideal in IDEALS {
        for attempt in ATTEMPTS {
            let s = score(attempt, ideal);
            assert!(s <= 100, "{attempt:?} vs {ideal:?} scored {s}");
        }
    }
}

#[test]
fn every_prompt_matches_itself() {
    for ideal in IDEALS {
        assert_eq!(score(ideal, ideal), 100);
    }
}

#[test]
fn word_order_is_ignored() {
    for ideal in IDEALS {
        for attempt in ATTEMPTS {
            let base = score(attempt, ideal);
            assert_eq!(score(&reversed(attempt), ideal), base);
            assert_eq!(score(attempt, &reversed(ideal)), base);
            assert_eq!(score(&rotated(attempt), &rotated(ideal)), base);
        }
    }
}

#[test]
fn missing_keywords_are_long_and_few() {
    for ideal in IDEALS {
        for attempt in ATTEMPTS {
            let missing = missing_keywords(attempt, ideal);
            assert!(missing.len() <= MAX_MISSING_KEYWORDS);
            assert!(missing.iter().all(|w| w.chars().count() > 3));
        }
    }
}

#[test]
fn lake_scenario() {
    let evaluation = evaluate(
        "mountain lake pine trees",
        "A serene mountain lake surrounded by pine trees",
    );
    assert_eq!(evaluation.score, 67);
    assert_eq!(FeedbackTier::for_score(evaluation.score), FeedbackTier::NiceStart);
}

#[test]
fn no_overlap_scenario() {
    let evaluation = evaluate("xyz abc", "red blue green");
    assert_eq!(evaluation.score, 0);
    assert_eq!(evaluation.missing_keywords, vec!["blue", "green"]);
    assert_eq!(
        evaluation.feedback,
        "Keep practicing! Your description missed key elements like: \"blue, green\". Remember to describe all visible objects, colors, and atmosphere."
    );
}
