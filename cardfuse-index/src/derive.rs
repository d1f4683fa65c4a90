//! Derived fields
//!
//! Pure, total mappings from raw per-source representations (integer
//! ratings, tier letters, play counts) to normalized values.
//! None of these can fail: malformed input maps to "no opinion" / unknown.

use crate::types::{Score, Tier};
use serde_json::Value;

/// Five-point rating → tier: 1→E … 5→A; 0 and anything else → no opinion
pub fn rating_to_tier(rating: i64) -> Option<Tier> {
    match rating {
        1 => Some(Tier::E),
        2 => Some(Tier::D),
        3 => Some(Tier::C),
        4 => Some(Tier::B),
        5 => Some(Tier::A),
        _ => None,
    }
}

/// Tier → five-point score: A→5 … E→1; `F` and unknown labels → 0
pub fn tier_to_score(label: &str) -> u8 {
    match Tier::parse(label) {
        Some(Tier::A) => 5,
        Some(Tier::B) => 4,
        Some(Tier::C) => 3,
        Some(Tier::D) => 2,
        Some(Tier::E) => 1,
        Some(Tier::F) | None => 0,
    }
}

/// The score an opinion carries for a tier label, `None` for "no opinion"
pub fn tier_rank(label: &str) -> Option<Score> {
    match tier_to_score(label) {
        0 => None,
        rank => Some(Score::Rank(rank)),
    }
}

/// Plays divided by times drafted
///
/// Unknown when either input is absent or `drafted` is not positive; never
/// infinite, never NaN.
pub fn draw_play_ratio(plays: Option<f64>, drafted: Option<f64>) -> Option<f64> {
    let (plays, drafted) = (plays?, drafted?);
    if !drafted.is_finite() || drafted <= 0.0 || !plays.is_finite() {
        return None;
    }
    Some(plays / drafted)
}

/// Parse a numeric cell; blank or malformed → unknown
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Read an integer rating from a JSON value that may be a number or a string
///
/// Whole floats (`5.0`) are accepted; fractional values truncate toward zero.
pub fn json_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

/// Read a real-valued rating from a JSON value that may be a number or a string
pub fn json_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rating_to_tier() {
        assert_eq!(rating_to_tier(5), Some(Tier::A));
        assert_eq!(rating_to_tier(1), Some(Tier::E));
        assert_eq!(rating_to_tier(0), None);
        assert_eq!(rating_to_tier(6), None);
        assert_eq!(rating_to_tier(-1), None);
    }

    #[test]
    fn test_tier_score_round_trip_for_rated_tiers() {
        for rating in 1..=5 {
            let tier = rating_to_tier(rating).unwrap();
            assert_eq!(i64::from(tier_to_score(tier.as_str())), rating);
        }
    }

    #[test]
    fn test_unknown_tier_is_no_opinion_not_lowest() {
        assert_eq!(tier_to_score(""), 0);
        assert_eq!(tier_to_score("S"), 0);
        assert_eq!(tier_to_score("F"), 0);
        assert_eq!(tier_rank(""), None);
        assert_eq!(tier_rank("E"), Some(Score::Rank(1)));
    }

    #[test]
    fn test_ratio_with_zero_drafted_is_unknown() {
        for plays in [0.0, 1.0, 250.0] {
            assert_eq!(draw_play_ratio(Some(plays), Some(0.0)), None);
        }
    }

    #[test]
    fn test_ratio_with_missing_input_is_unknown() {
        assert_eq!(draw_play_ratio(None, Some(10.0)), None);
        assert_eq!(draw_play_ratio(Some(3.0), None), None);
        assert_eq!(draw_play_ratio(Some(3.0), Some(-2.0)), None);
    }

    #[test]
    fn test_ratio_value() {
        assert_eq!(draw_play_ratio(Some(30.0), Some(40.0)), Some(0.75));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 12.5 "), Some(12.5));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("n/a"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn test_json_integer_accepts_numbers_and_strings() {
        assert_eq!(json_integer(&json!(4)), Some(4));
        assert_eq!(json_integer(&json!(4.0)), Some(4));
        assert_eq!(json_integer(&json!("3")), Some(3));
        assert_eq!(json_integer(&json!("x")), None);
        assert_eq!(json_integer(&json!(null)), None);
    }

    #[test]
    fn test_json_number() {
        assert_eq!(json_number(&json!(7)), Some(7.0));
        assert_eq!(json_number(&json!("8.5")), Some(8.5));
        assert_eq!(json_number(&json!("")), None);
    }
}
