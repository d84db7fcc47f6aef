//! Environmental impact events decomposed from a work description.

use serde::Serialize;

/// Unit an impact quantity is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactUnit {
    Acre,
    SquareFeet,
    LinearFeet,
}

impl ImpactUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Acre => "acre",
            Self::SquareFeet => "square_feet",
            Self::LinearFeet => "linear_feet",
        }
    }
}

/// Effect of the work on the impacted feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactCondition {
    Negative,
    /// Negative impact offset by purchasing mitigation bank credits.
    NegativeWithMitigationCredit,
    Positive,
    /// Quantity describes overall project size rather than a habitat.
    Neutral,
    Avoided,
    /// Both negative and positive cues appear in the same clause.
    ManualReviewRequired,
    Unknown,
}

impl ImpactCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Negative => "negative",
            Self::NegativeWithMitigationCredit => "negative_with_mitigation_credit",
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Avoided => "avoided",
            Self::ManualReviewRequired => "manual_review_required",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactDuration {
    Permanent,
    Temporary,
    Unknown,
}

impl ImpactDuration {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Permanent => "permanent",
            Self::Temporary => "temporary",
            Self::Unknown => "unknown",
        }
    }
}

/// One impact clause from a work-description sentence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactEvent {
    /// Leading numeral of the clause, if it parsed.
    pub quantity: Option<f64>,
    pub unit: ImpactUnit,
    /// Impacted feature, or "project size" when no habitat keyword appears.
    #[serde(rename = "type")]
    pub impact_type: String,
    pub condition: ImpactCondition,
    pub duration: ImpactDuration,
}

impl ImpactEvent {
    /// Type descriptor for clauses without a habitat keyword.
    pub const PROJECT_SIZE: &'static str = "project size";

    pub fn is_project_size(&self) -> bool {
        self.impact_type == Self::PROJECT_SIZE
    }
}
