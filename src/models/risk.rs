//! Risk classification model.
//!
//! Every risk has a kind and a severity. Both map to fixed descriptions
//! through closed lookup tables.

use serde::{Deserialize, Serialize};

use super::Descriptor;

/// Category of a task risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskKind {
    Operational,
    Budget,
    Schedule,
    Technical,
    Resource,
}

impl RiskKind {
    /// All kinds, in reporting order.
    pub const ALL: [RiskKind; 5] = [
        RiskKind::Operational,
        RiskKind::Budget,
        RiskKind::Schedule,
        RiskKind::Technical,
        RiskKind::Resource,
    ];

    /// Name and description of this kind.
    pub fn descriptor(self) -> Descriptor {
        match self {
            RiskKind::Operational => Descriptor::new(
                "Operational",
                "Failures in processes, procedures or day-to-day operations",
            ),
            RiskKind::Budget => Descriptor::new(
                "Budget",
                "Costs exceeding the planned budget",
            ),
            RiskKind::Schedule => Descriptor::new(
                "Schedule",
                "Work taking longer than planned or milestones slipping",
            ),
            RiskKind::Technical => Descriptor::new(
                "Technical",
                "Unproven technology, complexity or integration problems",
            ),
            RiskKind::Resource => Descriptor::new(
                "Resource",
                "Insufficient people, skills or equipment for the work",
            ),
        }
    }
}

/// Impact level of a task risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskSeverity {
    Minor,
    Moderate,
    Major,
}

impl RiskSeverity {
    /// All severities, lowest first.
    pub const ALL: [RiskSeverity; 3] = [
        RiskSeverity::Minor,
        RiskSeverity::Moderate,
        RiskSeverity::Major,
    ];

    /// Contribution to the weighted risk score.
    #[inline]
    pub fn weight(self) -> u32 {
        match self {
            RiskSeverity::Minor => 1,
            RiskSeverity::Moderate => 2,
            RiskSeverity::Major => 3,
        }
    }

    /// Name and description of this severity.
    pub fn descriptor(self) -> Descriptor {
        match self {
            RiskSeverity::Minor => Descriptor::new("Minor", "Small impact, easily absorbed"),
            RiskSeverity::Moderate => {
                Descriptor::new("Moderate", "Noticeable impact requiring attention")
            }
            RiskSeverity::Major => {
                Descriptor::new("Major", "Serious impact threatening the project")
            }
        }
    }
}

/// A risk attached to a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RiskClassification {
    pub kind: RiskKind,
    pub severity: RiskSeverity,
}

impl RiskClassification {
    pub fn new(kind: RiskKind, severity: RiskSeverity) -> Self {
        Self { kind, severity }
    }
}
