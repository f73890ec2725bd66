use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Billing duration of a membership plan. Stored as lowercase text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub enum PlanDuration {
    Monthly,
    Quarterly,
    HalfYearly,
    Yearly,
}

impl PlanDuration {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanDuration::Monthly => "monthly",
            PlanDuration::Quarterly => "quarterly",
            PlanDuration::HalfYearly => "half-yearly",
            PlanDuration::Yearly => "yearly",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "monthly" => Some(PlanDuration::Monthly),
            "quarterly" => Some(PlanDuration::Quarterly),
            "half-yearly" | "halfyearly" => Some(PlanDuration::HalfYearly),
            "yearly" => Some(PlanDuration::Yearly),
            _ => None,
        }
    }

    pub fn months(&self) -> u32 {
        match self {
            PlanDuration::Monthly => 1,
            PlanDuration::Quarterly => 3,
            PlanDuration::HalfYearly => 6,
            PlanDuration::Yearly => 12,
        }
    }

    /// Label used on receipts and plan cards, e.g. "6 Months".
    pub fn display_label(&self) -> &'static str {
        match self {
            PlanDuration::Monthly => "1 Month",
            PlanDuration::Quarterly => "3 Months",
            PlanDuration::HalfYearly => "6 Months",
            PlanDuration::Yearly => "12 Months",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MembershipPlan {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub duration: PlanDuration,
    /// Whole rupees. Displayed with two decimal places.
    pub price: i64,
    pub perks: Vec<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMembershipPlanRequest {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub duration: String,
    pub price: i64,
    #[serde(default)]
    pub perks: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateMembershipPlanRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub price: Option<i64>,
    pub perks: Option<Vec<String>>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

/// Generate a URL-safe slug from a name
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Default membership plans to seed (name, slug, duration, price, perks)
pub fn default_membership_plans() -> Vec<(&'static str, &'static str, PlanDuration, i64, &'static [&'static str])> {
    vec![
        (
            "Basic",
            "basic",
            PlanDuration::Monthly,
            1499,
            &["Gym floor access", "Locker"],
        ),
        (
            "Pro",
            "pro",
            PlanDuration::Quarterly,
            3999,
            &["Gym floor access", "Locker", "Group classes"],
        ),
        (
            "Elite",
            "elite",
            PlanDuration::Yearly,
            12999,
            &["Gym floor access", "Locker", "Group classes", "Sauna", "Diet consultation"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Elite Plan"), "elite-plan");
        assert_eq!(slugify("  Multiple   Spaces  "), "multiple-spaces");
        assert_eq!(slugify("Special!@#$Characters"), "special-characters");
    }

    #[test]
    fn test_plan_duration() {
        assert_eq!(PlanDuration::HalfYearly.as_str(), "half-yearly");
        assert_eq!(PlanDuration::from_str("half-yearly"), Some(PlanDuration::HalfYearly));
        assert_eq!(PlanDuration::from_str("HALFYEARLY"), Some(PlanDuration::HalfYearly));
        assert_eq!(PlanDuration::from_str("yearly"), Some(PlanDuration::Yearly));
        assert_eq!(PlanDuration::from_str("weekly"), None);
        assert_eq!(PlanDuration::Quarterly.months(), 3);
    }
}
