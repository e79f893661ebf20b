//! Enumerated choices offered during the guided chat.

use serde::{Deserialize, Serialize};

/// Budget tier the user is aiming for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Budget {
    Minimal,
    Moderate,
    Significant,
}

impl Budget {
    pub const ALL: [Self; 3] = [Self::Minimal, Self::Moderate, Self::Significant];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minimal => "Minimal",
            Self::Moderate => "Moderate",
            Self::Significant => "Significant",
        }
    }

    /// Price band shown next to the tier.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Minimal => "₹2k - ₹10k (Strict Essentials)",
            Self::Moderate => "₹10k - ₹40k (Meaningful Changes)",
            Self::Significant => "₹40k+ (Complete Refresh)",
        }
    }

    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::Minimal => "🌱",
            Self::Moderate => "🏡",
            Self::Significant => "✨",
        }
    }

    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.as_str() == raw.trim())
    }
}

impl std::fmt::Display for Budget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Atmosphere the user wants the room to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mood {
    #[serde(rename = "Calm & Minimal")]
    CalmMinimal,
    #[serde(rename = "Warm & Cozy")]
    WarmCozy,
    #[serde(rename = "Professional & Sharp")]
    ProfessionalSharp,
    #[serde(rename = "Vibrant & Desi")]
    VibrantDesi,
}

impl Mood {
    pub const ALL: [Self; 4] = [Self::CalmMinimal, Self::WarmCozy, Self::ProfessionalSharp, Self::VibrantDesi];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CalmMinimal => "Calm & Minimal",
            Self::WarmCozy => "Warm & Cozy",
            Self::ProfessionalSharp => "Professional & Sharp",
            Self::VibrantDesi => "Vibrant & Desi",
        }
    }

    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == raw.trim())
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
