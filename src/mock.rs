//! Mock conversation generation for demos and fixtures.
//!
//! Produces syntactically valid saved conversations with scores skewed
//! towards the high end, a sentiment that follows the score, and follow-up
//! turns only when the score calls for it.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const TRANSCRIPTIONS: &[&str] = &[
    "The checkout process was slow and confusing",
    "Great customer service, very helpful",
    "Product quality exceeded expectations",
    "Website navigation needs improvement",
    "Fast shipping and delivery",
    "Customer support response time was too long",
    "Mobile app crashes frequently",
    "Return process was complicated",
    "Product arrived damaged",
    "Great value for money",
    "Shipping took longer than expected",
    "Very happy with my purchase",
];

const FEEDBACK_POINTS: &[&[&str]] = &[
    &["Fast shipping", "Good packaging"],
    &["Slow checkout", "Confusing navigation"],
    &["Excellent quality", "Great value"],
    &["Poor customer service", "Long wait times"],
    &["Easy to use", "Intuitive design"],
    &["Product damaged", "Poor packaging"],
    &["Helpful support", "Quick response"],
    &["Website bugs", "Technical issues"],
    &["Return process", "Complicated refund"],
    &["Shipping delay", "Late delivery"],
];

const FOLLOW_UPS: &[&str] = &[
    "The checkout page kept freezing when I tried to pay",
    "The navigation menu was hard to find and confusing",
    "They responded within minutes and solved my issue",
    "The mobile app crashes every time I try to checkout",
    "The return process required too many steps",
    "The product description didn't match what I received",
    "The shipping was delayed by a week",
    "I had trouble setting up my account",
];

const AI_RESPONSES: &[&str] = &[
    "Thank you for that feedback. We really appreciate you taking the time to share your experience with us.",
    "I'm sorry to hear about that issue. Could you tell me more about what specifically was confusing?",
    "That's wonderful to hear! We're so glad you had a positive experience.",
    "I understand your frustration. Let me see if I can help clarify that for you.",
    "Thank you for bringing this to our attention. We'll make sure to address this issue.",
];

/// Score weights for 0..=10, favouring 7-10.
const SCORE_WEIGHTS: [u32; 11] = [2, 2, 3, 3, 4, 5, 6, 7, 8, 9, 10];

/// Turn count weights for 1..=5 when follow-up is required.
const TURN_WEIGHTS: [u32; 5] = [30, 35, 20, 10, 5];

/// Sentiment cycle for balanced corpora: 8 negative, 9 positive, 3 neutral.
const BALANCED_MIX: [&str; 20] = [
    "Negative", "Frustrated", "Negative", "Frustrated",
    "Disappointed", "Negative", "Frustrated", "Angry",
    "Positive", "Happy", "Satisfied", "Positive",
    "Happy", "Satisfied", "Positive",
    "Neutral", "Neutral", "Satisfied", "Neutral", "Positive",
];

const NEGATIVE_SENTIMENTS: &[&str] = &["Negative", "Frustrated", "Disappointed", "Angry"];
const POSITIVE_SENTIMENTS: &[&str] = &["Positive", "Happy", "Satisfied"];

/// Generates mock conversations.
pub struct MockGenerator {
    rng: StdRng,
    now: DateTime<Utc>,
}

impl MockGenerator {
    /// Create a generator; a seed makes the output reproducible.
    pub fn new(seed: Option<u64>, now: DateTime<Utc>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng, now }
    }

    /// Generate one raw conversation document.
    pub fn conversation(&mut self) -> Value {
        let saved_at = self.now
            - Duration::days(self.rng.gen_range(0..=30))
            - Duration::hours(self.rng.gen_range(0..24))
            - Duration::minutes(self.rng.gen_range(0..60));

        let score = self.weighted(&SCORE_WEIGHTS);
        let sentiment = self.pick(sentiments_for(score));
        let initial_transcription = self.pick(TRANSCRIPTIONS);
        let feedback_points = self.pick(FEEDBACK_POINTS);

        let requires_followup = score < 7 || (score < 9 && self.rng.gen_bool(0.4));
        let num_turns = if requires_followup {
            self.weighted(&TURN_WEIGHTS) + 1
        } else {
            0
        };

        let turns: Vec<Value> = (0..num_turns)
            .map(|_| json!({"user": self.pick(FOLLOW_UPS), "ai": self.pick(AI_RESPONSES)}))
            .collect();

        let (transcription, response) = match turns.last() {
            Some(last) => (last["user"].clone(), last["ai"].clone()),
            None => (json!(initial_transcription), json!(self.pick(AI_RESPONSES))),
        };
        let saved_at = saved_at.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string();

        json!({
            "score": score,
            "sentiment": sentiment,
            "initial_transcription": initial_transcription,
            "initial_feedback_points": feedback_points,
            "turns": turns,
            "final_analysis": {
                "transcription": transcription,
                "conversationalResponse": response,
                "requiresFollowUp": false,
                "conversationComplete": true,
                "score": score
            },
            "metadata": {
                "total_turns": num_turns,
                "completed_at": saved_at
            },
            "saved_at": saved_at
        })
    }

    /// Generate a conversation whose sentiment is fixed by its position in
    /// the balanced cycle, with a score drawn to match that sentiment.
    pub fn balanced_conversation(&mut self, index: usize) -> Value {
        let mut conversation = self.conversation();

        let sentiment = BALANCED_MIX[index % BALANCED_MIX.len()];
        let score = self.pick(balanced_scores_for(sentiment));

        conversation["sentiment"] = json!(sentiment);
        conversation["score"] = json!(score);
        conversation["final_analysis"]["score"] = json!(score);
        conversation
    }

    fn pick<T: Copy>(&mut self, items: &[T]) -> T {
        *items
            .choose(&mut self.rng)
            .expect("template banks are non-empty")
    }

    fn weighted(&mut self, weights: &[u32]) -> usize {
        WeightedIndex::new(weights)
            .expect("weights are positive")
            .sample(&mut self.rng)
    }
}

fn sentiments_for(score: usize) -> &'static [&'static str] {
    if score >= 9 {
        &["Positive", "Happy", "Satisfied"]
    } else if score >= 7 {
        &["Neutral", "Satisfied", "Positive"]
    } else {
        &["Negative", "Frustrated", "Disappointed"]
    }
}

fn balanced_scores_for(sentiment: &str) -> &'static [usize] {
    if NEGATIVE_SENTIMENTS.contains(&sentiment) {
        &[1, 2, 3, 4, 5, 6]
    } else if POSITIVE_SENTIMENTS.contains(&sentiment) {
        &[8, 9, 10]
    } else {
        &[6, 7, 8]
    }
}

/// File name for a generated conversation.
fn mock_filename(conversation: &Value, index: usize) -> String {
    let stamp: String = conversation["saved_at"]
        .as_str()
        .unwrap_or_default()
        .chars()
        .take_while(|c| *c != '.')
        .filter(|c| *c != ':' && *c != '-')
        .collect();
    format!("conversation_{}_{:03}.json", stamp, index)
}

/// Write `count` mock conversations into `dir`, creating it if needed.
///
/// With `balanced`, sentiments follow a fixed cycle that is 40% negative so
/// focus areas always have material.
pub fn generate_corpus(
    dir: &Path,
    count: usize,
    seed: Option<u64>,
    balanced: bool,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;

    let mut generator = MockGenerator::new(seed, Utc::now());
    let mut written = Vec::with_capacity(count);

    for index in 0..count {
        let conversation = if balanced {
            generator.balanced_conversation(index)
        } else {
            generator.conversation()
        };
        let path = dir.join(mock_filename(&conversation, index));

        let content = serde_json::to_string_pretty(&conversation)?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        debug!(
            "Generated {} (score: {}, sentiment: {}, turns: {})",
            path.display(),
            conversation["score"],
            conversation["sentiment"],
            conversation["turns"].as_array().map_or(0, Vec::len)
        );
        written.push(path);
    }

    info!("Generated {} mock conversations in {}", count, dir.display());
    Ok(written)
}
