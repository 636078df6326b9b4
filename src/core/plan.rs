use chrono::NaiveTime;
use serde::Serialize;

/// Rate tier of a time-of-day banded plan, in ascending order of price.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    #[display("night")]
    Night,

    #[display("cosy")]
    Cosy,

    #[display("day")]
    Day,

    #[display("peak")]
    Peak,
}

/// Local clock band, wraps past midnight when `end <= start`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TimeBand {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub tier: Tier,
}

impl TimeBand {
    /// # Panics
    ///
    /// On invalid clock times, only meant for the built-in catalog.
    #[must_use]
    pub fn hm(start: (u32, u32), end: (u32, u32), tier: Tier) -> Self {
        Self {
            start: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
            end: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
            tier,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PlanKind {
    /// Explicitly timestamped rates.
    Timestamped,

    /// Prices depend only on the local clock time, anything outside of the bands is [`Tier::Day`].
    TimeOfDayBanded { bands: Vec<TimeBand> },
}

#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum PlanId {
    #[display("agile_octopus")]
    AgileOctopus,

    #[display("octopus_go")]
    OctopusGo,

    #[display("cosy_octopus")]
    CosyOctopus,

    #[display("flexible_octopus")]
    FlexibleOctopus,
}

#[derive(Clone, Debug)]
pub struct Plan {
    pub id: PlanId,
    pub display_name: &'static str,
    pub kind: PlanKind,

    /// Whether the plan reports the rate applicable right now.
    pub reports_current_rate: bool,
}

/// Fixed catalog of the compared plans.
#[must_use]
pub fn catalog() -> Vec<Plan> {
    vec![
        Plan {
            id: PlanId::AgileOctopus,
            display_name: "Agile Octopus",
            kind: PlanKind::Timestamped,
            reports_current_rate: false,
        },
        Plan {
            id: PlanId::OctopusGo,
            display_name: "Octopus Go",
            kind: PlanKind::TimeOfDayBanded {
                bands: vec![TimeBand::hm((0, 30), (5, 30), Tier::Night)],
            },
            reports_current_rate: false,
        },
        Plan {
            id: PlanId::CosyOctopus,
            display_name: "Cosy Octopus",
            kind: PlanKind::TimeOfDayBanded {
                bands: vec![
                    TimeBand::hm((16, 0), (19, 0), Tier::Peak),
                    TimeBand::hm((4, 0), (7, 0), Tier::Cosy),
                    TimeBand::hm((13, 0), (16, 0), Tier::Cosy),
                    TimeBand::hm((22, 0), (0, 0), Tier::Cosy),
                ],
            },
            reports_current_rate: false,
        },
        Plan {
            id: PlanId::FlexibleOctopus,
            display_name: "Flexible Octopus",
            kind: PlanKind::Timestamped,
            reports_current_rate: true,
        },
    ]
}

/// Human-readable name of the account's current plan, guessed from its tariff code.
#[must_use]
pub fn identify_current_plan(tariff_code: &str) -> String {
    let tariff_code_upper = tariff_code.to_uppercase();
    [
        ("AGILE", "Agile Octopus"),
        ("GO", "Octopus Go"),
        ("COSY", "Cosy Octopus"),
        ("FLEX", "Flexible Octopus"),
    ]
    .into_iter()
    .find(|(needle, _)| tariff_code_upper.contains(needle))
    .map_or_else(|| format!("Other tariff: {tariff_code}"), |(_, name)| name.to_string())
}
