//! Template narration.
//!
//! Deterministic apart from the template draws: every call picks its own
//! templates from the supplied RNG and keeps no state between calls.

use crate::interview::narration::NarrationBundle;
use rand::Rng;
use rand::seq::SliceRandom;

const INTRO_TEMPLATES: [&str; 4] = [
    "Welcome to the technical interview. We'll cover {topics}.",
    "Hello, we'll go through a short technical interview on {topics}.",
    "Welcome. Today we'll discuss {topics}.",
    "Hi there. We'll run through a few technical questions on {topics}.",
];

const TRANSITION_GENERIC: [&str; 5] = [
    "Moving on to the next topic.",
    "Now, let's move to the next topic.",
    "Alright, onto the next question.",
    "Okay, next one.",
    "Let's continue.",
];

const TRANSITION_TOPIC: [&str; 4] = [
    "Moving on to {topic}.",
    "Now, let's move to {topic}.",
    "Alright, next topic: {topic}.",
    "Okay, switching to {topic}.",
];

const TRANSITION_FINAL: [&str; 4] = [
    "Now, let's cover the final question.",
    "Alright, onto our final question.",
    "Final question coming up.",
    "Okay, last question.",
];

const CLOSING_TEMPLATES: [&str; 4] = [
    "That wraps up our questions. Thank you for your time.",
    "That covers our questions. Thank you.",
    "That concludes the interview. Thanks for your time.",
    "That's everything. Thank you, your feedback will be generated now.",
];

/// Used in the intro when no topic is known.
pub const FALLBACK_TOPIC_PHRASE: &str = "a few core CS topics";

fn pick<'a, R: Rng + ?Sized>(templates: &[&'a str], rng: &mut R) -> &'a str {
    templates.choose(rng).copied().unwrap_or_default()
}

/// Human phrase naming the first three distinct topics, in order.
pub fn topic_phrase(topics: &[String]) -> String {
    let mut distinct: Vec<&str> = Vec::new();
    for topic in topics {
        if !distinct.contains(&topic.as_str()) {
            distinct.push(topic);
        }
    }

    match distinct.as_slice() {
        [] => FALLBACK_TOPIC_PHRASE.to_string(),
        [one] => one.to_string(),
        [a, b] => format!("{} and {}", a, b),
        [a, b, c, ..] => format!("{}, {}, and {}", a, b, c),
    }
}

pub fn build_intro<R: Rng + ?Sized>(topics: &[String], rng: &mut R) -> String {
    pick(&INTRO_TEMPLATES, rng).replace("{topics}", &topic_phrase(topics))
}

pub fn build_closing<R: Rng + ?Sized>(rng: &mut R) -> String {
    pick(&CLOSING_TEMPLATES, rng).to_string()
}

/// Transitions for a session of `count` questions whose topics are `topics`.
///
/// Always returns `count - 1` lines. The boundary before the last question
/// uses a final-question line; other boundaries name the upcoming topic when
/// it changes and fall back to a generic line otherwise.
pub fn build_transitions<R: Rng + ?Sized>(
    topics: &[String],
    count: usize,
    rng: &mut R,
) -> Vec<String> {
    (1..count)
        .map(|i| {
            if i == count - 1 {
                return pick(&TRANSITION_FINAL, rng).to_string();
            }
            match (topics.get(i - 1), topics.get(i)) {
                (Some(prev), Some(next)) if prev != next => {
                    pick(&TRANSITION_TOPIC, rng).replace("{topic}", next)
                }
                _ => pick(&TRANSITION_GENERIC, rng).to_string(),
            }
        })
        .collect()
}

/// Complete template narration for a session.
pub fn template_bundle<R: Rng + ?Sized>(topics: &[String], count: usize, rng: &mut R) -> NarrationBundle {
    NarrationBundle::new(
        build_intro(topics, rng),
        build_transitions(topics, count, rng),
        build_closing(rng),
    )
}
