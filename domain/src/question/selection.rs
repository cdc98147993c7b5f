//! Question pool selection.
//!
//! Picks the ordered question list of a session from a candidate pool.
//! Mixed sessions use a best-effort topic-diversity heuristic: when a draw
//! repeats the previous topic it is redrawn a bounded number of times, and the
//! last draw is accepted regardless. Consecutive repeats remain possible when
//! the retry budget runs out or the pool is dominated by one topic.

use super::entities::{Question, QuestionId, TopicFilter};
use crate::core::error::DomainError;
use rand::Rng;
use rand::seq::SliceRandom;

/// Redraws allowed per slot when the draw repeats the previous topic.
pub const MAX_TOPIC_RETRIES: usize = 5;

/// Select `count` question ids from `pool`.
///
/// For [`TopicFilter::Topic`] only questions of that topic are eligible and the
/// result is a uniform sample without replacement. For [`TopicFilter::Mixed`]
/// the whole pool is eligible and topic diversity is preferred.
pub fn select_questions<R: Rng + ?Sized>(
    pool: &[Question],
    count: usize,
    mode: &TopicFilter,
    rng: &mut R,
) -> Result<Vec<QuestionId>, DomainError> {
    let eligible: Vec<&Question> = match mode {
        TopicFilter::Mixed => pool.iter().collect(),
        TopicFilter::Topic(topic) => pool.iter().filter(|q| &q.topic == topic).collect(),
    };

    if eligible.len() < count {
        return Err(DomainError::InsufficientPool {
            available: eligible.len(),
            requested: count,
        });
    }

    let picked = match mode {
        TopicFilter::Mixed => select_mixed(eligible, count, rng),
        TopicFilter::Topic(_) => select_uniform(&eligible, count, rng),
    };

    Ok(picked.into_iter().map(|q| q.id).collect())
}

fn select_mixed<'a, R: Rng + ?Sized>(
    mut working: Vec<&'a Question>,
    count: usize,
    rng: &mut R,
) -> Vec<&'a Question> {
    let mut selected: Vec<&'a Question> = Vec::with_capacity(count);
    let mut last_topic: Option<&'a str> = None;

    for _ in 0..count {
        let mut idx = rng.gen_range(0..working.len());
        let mut attempts = 0;
        while last_topic == Some(working[idx].topic.as_str()) && attempts < MAX_TOPIC_RETRIES {
            idx = rng.gen_range(0..working.len());
            attempts += 1;
        }

        let question = working.swap_remove(idx);
        last_topic = Some(question.topic.as_str());
        selected.push(question);
    }

    selected
}

fn select_uniform<'a, R: Rng + ?Sized>(
    eligible: &[&'a Question],
    count: usize,
    rng: &mut R,
) -> Vec<&'a Question> {
    let mut picked: Vec<&'a Question> = eligible.choose_multiple(rng, count).copied().collect();
    // choose_multiple does not randomize order
    picked.shuffle(rng);
    picked
}

/// Topics of the given question ids, in order. Unknown ids are skipped.
pub fn topics_in_order(ids: &[QuestionId], pool: &[Question]) -> Vec<String> {
    ids.iter()
        .filter_map(|id| pool.iter().find(|q| q.id == *id))
        .map(|q| q.topic.clone())
        .collect()
}
