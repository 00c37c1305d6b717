use serde::{Deserialize, Serialize};

/// Harm categories the API filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HarmCategory {
    /// `HARM_CATEGORY_HARASSMENT`
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    /// `HARM_CATEGORY_HATE_SPEECH`
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    /// `HARM_CATEGORY_SEXUALLY_EXPLICIT`
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    /// `HARM_CATEGORY_DANGEROUS_CONTENT`
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
}

impl HarmCategory {
    /// Every category the client configures.
    pub const ALL: [HarmCategory; 4] = [
        HarmCategory::Harassment,
        HarmCategory::HateSpeech,
        HarmCategory::SexuallyExplicit,
        HarmCategory::DangerousContent,
    ];
}

/// Probability threshold at which content is blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    /// Block when probability is low or higher.
    BlockLowAndAbove,
    /// Block when probability is medium or higher.
    BlockMediumAndAbove,
    /// Block only high probability content.
    BlockOnlyHigh,
    /// Never block.
    BlockNone,
}

/// One category/threshold pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
    /// The category this setting applies to.
    pub category: HarmCategory,
    /// The threshold for the category.
    pub threshold: HarmBlockThreshold,
}

impl SafetySetting {
    /// Create a new safety setting.
    pub fn new(category: HarmCategory, threshold: HarmBlockThreshold) -> Self {
        Self {
            category,
            threshold,
        }
    }

    /// `BLOCK_NONE` for every category.
    pub fn block_none() -> Vec<SafetySetting> {
        HarmCategory::ALL
            .into_iter()
            .map(|category| SafetySetting::new(category, HarmBlockThreshold::BlockNone))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safety_setting_serialization() {
        let setting = SafetySetting::new(HarmCategory::HateSpeech, HarmBlockThreshold::BlockNone);
        let json = serde_json::to_value(setting).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "category": "HARM_CATEGORY_HATE_SPEECH",
                "threshold": "BLOCK_NONE"
            })
        );
    }

    #[test]
    fn test_block_none_covers_all_categories() {
        let settings = SafetySetting::block_none();
        assert_eq!(settings.len(), 4);
        assert!(
            settings
                .iter()
                .all(|s| s.threshold == HarmBlockThreshold::BlockNone)
        );
    }
}
