//! Investor risk profiling
//!
//! Scores the ten-question suitability questionnaire and maps the total
//! to one of the five portfolio profiles.

use serde::{Deserialize, Serialize};

/// Per-question weights, in questionnaire order.
pub const QUESTION_WEIGHTS: [u32; 10] = [1, 2, 3, 2, 3, 2, 3, 2, 2, 3];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskProfile {
    Conservador,
    Moderado,
    Balanceado,
    Arrojado,
    Agressivo,
}

impl RiskProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Conservador => "Conservador",
            Self::Moderado => "Moderado",
            Self::Balanceado => "Balanceado",
            Self::Arrojado => "Arrojado",
            Self::Agressivo => "Agressivo",
        }
    }
}

impl std::fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Questionnaire outcome: the profile plus the raw weighted score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub profile: RiskProfile,
    pub score: u32,
}

/// Score the questionnaire answers and derive the investor profile.
pub fn assess(answers: &[u32; 10]) -> RiskAssessment {
    let score: u32 = answers
        .iter()
        .zip(QUESTION_WEIGHTS.iter())
        .map(|(answer, weight)| answer * weight)
        .sum();

    let profile = match score {
        0..=12 => RiskProfile::Conservador,
        13..=29 => RiskProfile::Moderado,
        30..=49 => RiskProfile::Balanceado,
        50..=69 => RiskProfile::Arrojado,
        _ => RiskProfile::Agressivo,
    };

    tracing::debug!(score, profile = %profile, "risk profile assessed");
    RiskAssessment { profile, score }
}
