/// Rating Utilities
///
/// Conversions between categorical ratings (Very High, High, Moderate, Low, Very Low)
/// and numeric scores (5.0, 4.0, 3.0, 2.0, 1.0), used to combine several
/// tier-driven judgements into one rating.
use serde::{Deserialize, Serialize};

/// Five-point categorical rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rating {
    #[serde(rename = "Very Low")]
    VeryLow,
    Low,
    Moderate,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl Rating {
    /// Numeric score
    ///
    /// # Rating Scale
    /// - Very High = 5.0
    /// - High = 4.0
    /// - Moderate = 3.0
    /// - Low = 2.0
    /// - Very Low = 1.0
    pub fn score(&self) -> f64 {
        match self {
            Rating::VeryHigh => 5.0,
            Rating::High => 4.0,
            Rating::Moderate => 3.0,
            Rating::Low => 2.0,
            Rating::VeryLow => 1.0,
        }
    }

    /// Convert a numeric score back to a rating
    ///
    /// Uses midpoint thresholds:
    /// - [4.5, 5.0] → Very High
    /// - [3.5, 4.5) → High
    /// - [2.5, 3.5) → Moderate
    /// - [1.5, 2.5) → Low
    /// - below 1.5 → Very Low
    pub fn from_score(score: f64) -> Option<Self> {
        if score.is_nan() {
            None
        } else if score >= 4.5 {
            Some(Rating::VeryHigh)
        } else if score >= 3.5 {
            Some(Rating::High)
        } else if score >= 2.5 {
            Some(Rating::Moderate)
        } else if score >= 1.5 {
            Some(Rating::Low)
        } else {
            Some(Rating::VeryLow)
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Rating::VeryHigh => "Very High",
            Rating::High => "High",
            Rating::Moderate => "Moderate",
            Rating::Low => "Low",
            Rating::VeryLow => "Very Low",
        }
    }
}

/// Mean of several ratings
///
/// # Returns
/// Tuple of (numeric_score, rating); `None` when the slice is empty
///
/// # Example
/// ```
/// use agroforestry_planner::utils::{mean_rating, Rating};
/// let (score, rating) = mean_rating(&[Rating::VeryHigh, Rating::High, Rating::High]).unwrap();
/// assert!((score - 4.333).abs() < 0.01);
/// assert_eq!(rating, Rating::High);
/// ```
pub fn mean_rating(ratings: &[Rating]) -> Option<(f64, Rating)> {
    if ratings.is_empty() {
        return None;
    }

    let mean = ratings.iter().map(Rating::score).sum::<f64>() / ratings.len() as f64;
    Rating::from_score(mean).map(|rating| (mean, rating))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_and_back() {
        for rating in [Rating::VeryLow, Rating::Low, Rating::Moderate, Rating::High, Rating::VeryHigh] {
            assert_eq!(Rating::from_score(rating.score()), Some(rating));
        }
        assert_eq!(Rating::from_score(f64::NAN), None);
    }

    #[test]
    fn test_from_score_thresholds() {
        assert_eq!(Rating::from_score(4.5), Some(Rating::VeryHigh));
        assert_eq!(Rating::from_score(4.3), Some(Rating::High));
        assert_eq!(Rating::from_score(3.5), Some(Rating::High));
        assert_eq!(Rating::from_score(2.5), Some(Rating::Moderate));
        assert_eq!(Rating::from_score(2.2), Some(Rating::Low));
        assert_eq!(Rating::from_score(1.2), Some(Rating::VeryLow));
    }

    #[test]
    fn test_mean_rating_boundary_cases() {
        let (score, rating) = mean_rating(&[Rating::VeryHigh, Rating::High, Rating::High, Rating::High]).unwrap();
        assert_eq!(score, 4.25);
        assert_eq!(rating, Rating::High);

        let (score, rating) = mean_rating(&[Rating::VeryHigh, Rating::High]).unwrap();
        assert_eq!(score, 4.5);
        assert_eq!(rating, Rating::VeryHigh);

        assert!(mean_rating(&[]).is_none());
    }

    #[test]
    fn test_serde_labels() {
        assert_eq!(serde_json::to_string(&Rating::VeryHigh).unwrap(), "\"Very High\"");
        assert_eq!(Rating::VeryHigh.display_name(), "Very High");
    }
}
