use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuyingGoal {
    FirstHome,
    NextHome,
    RightSizing,
    MovingToUs,
    JustBrowsing,
    #[default]
    None,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuyingTimeline {
    #[serde(rename = "3-months")]
    ThreeMonths,
    #[serde(rename = "3-6-months")]
    ThreeToSixMonths,
    #[serde(rename = "6-plus-months")]
    SixPlusMonths,
    #[default]
    #[serde(rename = "none")]
    None,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SellingGoal {
    SellHome,
    SellForLarger,
    SellForSmaller,
    #[default]
    None,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EducationalGoal {
    LearnNews,
    LearnTrends,
    #[default]
    None,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuyingGoals {
    pub goal: BuyingGoal,
    pub timeline: BuyingTimeline,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SellingGoals {
    pub goal: SellingGoal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationalGoals {
    pub goal: EducationalGoal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Goals {
    pub buying: BuyingGoals,
    pub selling: SellingGoals,
    pub educational: EducationalGoals,
    pub last_updated: DateTime<Utc>,
}

impl Default for Goals {
    fn default() -> Self {
        Self {
            buying: BuyingGoals::default(),
            selling: SellingGoals::default(),
            educational: EducationalGoals::default(),
            last_updated: Utc::now(),
        }
    }
}

/// Sections supplied in a goals update; absent sections are kept.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GoalsPatch {
    pub buying: Option<BuyingGoals>,
    pub selling: Option<SellingGoals>,
    pub educational: Option<EducationalGoals>,
}

impl Goals {
    pub fn apply(&mut self, patch: GoalsPatch, now: DateTime<Utc>) {
        if let Some(buying) = patch.buying { self.buying = buying; }
        if let Some(selling) = patch.selling { self.selling = selling; }
        if let Some(educational) = patch.educational { self.educational = educational; }
        self.last_updated = now;
    }
}
