//! Rubric verdict parsing.
//!
//! The rubric reply must carry the marker `SCORE:` followed by one of the
//! anchor values. Anything else scores 0.

/// Marker preceding the rubric value in a reply.
pub const RUBRIC_MARKER: &str = "SCORE:";

/// The only values a rubric reply may carry.
pub const RUBRIC_ANCHORS: [u8; 5] = [0, 25, 50, 75, 100];

/// Parse a rubric reply into a 0–100 sub-score.
///
/// Fail-closed: a missing marker, no digits after it, or a value that is not
/// an anchor all yield 0.0.
///
/// # Examples
///
/// ```
/// use interview_domain::grading::rubric::parse_rubric_score;
///
/// assert_eq!(parse_rubric_score("SCORE: 75"), 75.0);
/// assert_eq!(parse_rubric_score("SCORE: 60"), 0.0);
/// assert_eq!(parse_rubric_score("Looks fine"), 0.0);
/// ```
pub fn parse_rubric_score(response: &str) -> f64 {
    let upper = response.to_uppercase();
    let Some(pos) = upper.find(RUBRIC_MARKER) else {
        return 0.0;
    };

    let rest = &upper[pos + RUBRIC_MARKER.len()..];
    let digits: String = rest
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();

    match digits.parse::<u32>() {
        Ok(value) if RUBRIC_ANCHORS.iter().any(|a| *a as u32 == value) => value as f64,
        _ => 0.0,
    }
}
