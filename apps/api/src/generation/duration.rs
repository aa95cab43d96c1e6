//! The fixed set of target video lengths and the text-size
//! estimates derived from them.
//!
//! Resolution never fails: unknown names and unusable numbers fall back to the
//! 5-minute bucket.

use serde::{Deserialize, Serialize};

/// Narration pace used for every estimate.
pub const WORDS_PER_MINUTE: u32 = 130;
/// Characters of script per minute of narration.
pub const CHARS_PER_MINUTE: u32 = 750;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DurationBucket {
    #[serde(rename = "SECONDS_30")]
    Seconds30,
    #[serde(rename = "SECONDS_60")]
    Seconds60,
    #[serde(rename = "MINUTES_3")]
    Minutes3,
    #[serde(rename = "MINUTES_5")]
    Minutes5,
    #[serde(rename = "MINUTES_10")]
    Minutes10,
    #[serde(rename = "MINUTES_15")]
    Minutes15,
    #[serde(rename = "MINUTES_20")]
    Minutes20,
    #[serde(rename = "MINUTES_25")]
    Minutes25,
    #[serde(rename = "MINUTES_30")]
    Minutes30,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationCategory {
    Short,
    Medium,
    Long,
}

impl DurationCategory {
    pub fn label(&self) -> &'static str {
        match self {
            DurationCategory::Short => "curto",
            DurationCategory::Medium => "médio",
            DurationCategory::Long => "longo",
        }
    }
}

/// Requested duration as it arrives on the wire: a bucket name or a number of
/// seconds. Numeric strings are accepted as seconds. Any other JSON value
/// lands in `Other` and resolves to the default bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DurationInput {
    Seconds(i64),
    Fractional(f64),
    Name(String),
    Other(serde_json::Value),
}

impl DurationBucket {
    pub const DEFAULT: DurationBucket = DurationBucket::Minutes5;

    pub const ALL: [DurationBucket; 9] = [
        DurationBucket::Seconds30,
        DurationBucket::Seconds60,
        DurationBucket::Minutes3,
        DurationBucket::Minutes5,
        DurationBucket::Minutes10,
        DurationBucket::Minutes15,
        DurationBucket::Minutes20,
        DurationBucket::Minutes25,
        DurationBucket::Minutes30,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DurationBucket::Seconds30 => "SECONDS_30",
            DurationBucket::Seconds60 => "SECONDS_60",
            DurationBucket::Minutes3 => "MINUTES_3",
            DurationBucket::Minutes5 => "MINUTES_5",
            DurationBucket::Minutes10 => "MINUTES_10",
            DurationBucket::Minutes15 => "MINUTES_15",
            DurationBucket::Minutes20 => "MINUTES_20",
            DurationBucket::Minutes25 => "MINUTES_25",
            DurationBucket::Minutes30 => "MINUTES_30",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DurationBucket::Seconds30 => "30 segundos",
            DurationBucket::Seconds60 => "60 segundos",
            DurationBucket::Minutes3 => "3 minutos",
            DurationBucket::Minutes5 => "5 minutos",
            DurationBucket::Minutes10 => "10 minutos",
            DurationBucket::Minutes15 => "15 minutos",
            DurationBucket::Minutes20 => "20 minutos",
            DurationBucket::Minutes25 => "25 minutos",
            DurationBucket::Minutes30 => "30 minutos",
        }
    }

    pub fn seconds(&self) -> u32 {
        match self {
            DurationBucket::Seconds30 => 30,
            DurationBucket::Seconds60 => 60,
            DurationBucket::Minutes3 => 180,
            DurationBucket::Minutes5 => 300,
            DurationBucket::Minutes10 => 600,
            DurationBucket::Minutes15 => 900,
            DurationBucket::Minutes20 => 1200,
            DurationBucket::Minutes25 => 1500,
            DurationBucket::Minutes30 => 1800,
        }
    }

    pub fn category(&self) -> DurationCategory {
        match self.seconds() {
            0..=300 => DurationCategory::Short,
            301..=1200 => DurationCategory::Medium,
            _ => DurationCategory::Long,
        }
    }

    /// Whole minutes, rounded up.
    pub fn minutes(&self) -> u32 {
        self.seconds().div_ceil(60)
    }

    /// `(words, chars)` expected for a script of this length.
    pub fn estimate(&self) -> (u32, u32) {
        let minutes = self.minutes();
        (minutes * WORDS_PER_MINUTE, minutes * CHARS_PER_MINUTE)
    }

    /// Buckets of three minutes or less are already short-form content and
    /// never get a separate short variant.
    pub fn allows_short_variant(&self) -> bool {
        self.seconds() > 180
    }

    /// Character range requested for the primary script, with a display label.
    pub fn script_length_range(&self) -> &'static str {
        match self {
            DurationBucket::Seconds30 => "300-500",
            DurationBucket::Seconds60 => "500-800",
            DurationBucket::Minutes3 => "800-1.200",
            DurationBucket::Minutes5 => "1.800-2.200",
            DurationBucket::Minutes10 => "3.500-4.000",
            DurationBucket::Minutes15 => "3.500-4.000",
            DurationBucket::Minutes20 => "6.000-7.000",
            DurationBucket::Minutes25 => "8.000-9.000",
            DurationBucket::Minutes30 => "9.000-10.000",
        }
    }

    /// The length line appended to every composed prompt.
    pub fn length_instruction(&self) -> String {
        format!(
            "Tamanho do roteiro principal: {} caracteres ({}). \
             **IMPORTANTE**: esse valor vale apenas para o roteiro principal, \
             não para as demais seções.",
            self.script_length_range(),
            self.label()
        )
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = name.trim();
        Self::ALL
            .into_iter()
            .find(|b| b.name().eq_ignore_ascii_case(wanted))
    }

    /// Bucket with the smallest absolute distance to `seconds`. Ties go to the
    /// first declared bucket.
    pub fn closest(seconds: i64) -> Self {
        let mut best = Self::ALL[0];
        let mut best_diff = i64::MAX;
        for bucket in Self::ALL {
            let diff = (i64::from(bucket.seconds()) - seconds).abs();
            if diff < best_diff {
                best = bucket;
                best_diff = diff;
            }
        }
        best
    }

    pub fn resolve(input: Option<&DurationInput>) -> Self {
        match input {
            Some(DurationInput::Seconds(s)) if *s > 0 => Self::closest(*s),
            Some(DurationInput::Fractional(s)) if s.is_finite() && *s >= 0.5 => {
                Self::closest(s.round() as i64)
            }
            Some(DurationInput::Name(name)) => Self::from_name(name)
                .or_else(|| {
                    name.trim()
                        .parse::<i64>()
                        .ok()
                        .filter(|s| *s > 0)
                        .map(Self::closest)
                })
                .unwrap_or(Self::DEFAULT),
            _ => Self::DEFAULT,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Listing views
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct DurationOption {
    pub name: &'static str,
    pub label: &'static str,
    pub seconds: u32,
    pub minutes: u32,
    pub category: DurationCategory,
    pub estimated_words: u32,
    pub estimated_chars: u32,
}

impl From<DurationBucket> for DurationOption {
    fn from(bucket: DurationBucket) -> Self {
        let (estimated_words, estimated_chars) = bucket.estimate();
        DurationOption {
            name: bucket.name(),
            label: bucket.label(),
            seconds: bucket.seconds(),
            minutes: bucket.minutes(),
            category: bucket.category(),
            estimated_words,
            estimated_chars,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DurationGroup {
    pub category: DurationCategory,
    pub label: &'static str,
    pub options: Vec<DurationOption>,
}

pub fn duration_options() -> Vec<DurationOption> {
    DurationBucket::ALL.into_iter().map(DurationOption::from).collect()
}

/// Options grouped short → medium → long.
pub fn duration_options_by_category() -> Vec<DurationGroup> {
    [
        DurationCategory::Short,
        DurationCategory::Medium,
        DurationCategory::Long,
    ]
    .into_iter()
    .map(|category| DurationGroup {
        category,
        label: category.label(),
        options: DurationBucket::ALL
            .into_iter()
            .filter(|b| b.category() == category)
            .map(DurationOption::from)
            .collect(),
    })
    .collect()
}
