//! Project scheduling domain models.
//!
//! Provides the input records consumed by the engine. Persistence lives
//! elsewhere; these types are plain data with builder helpers.
//!
//! # Domain Mappings
//!
//! | u-cpm | Software project | Construction | Events |
//! |-------|------------------|--------------|--------|
//! | Task | Ticket/Story | Work package | Booking step |
//! | Edge | Blocks/blocked-by | Finish-to-start | Prerequisite |
//! | Developer | Engineer | Crew | Vendor |
//! | Mood | Retro sentiment | Site morale | Staff survey |

mod developer;
mod mood;
mod risk;
mod status;
mod task;

use serde::Serialize;

pub use developer::{Developer, Skill};
pub use mood::Mood;
pub use risk::{RiskClassification, RiskKind, RiskSeverity};
pub use status::ProjectStatus;
pub use task::{Edge, Task, ThreePointEstimate};

/// Fixed name and description for an enumerated value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Descriptor {
    pub name: &'static str,
    pub description: &'static str,
}

impl Descriptor {
    pub(crate) const fn new(name: &'static str, description: &'static str) -> Self {
        Self { name, description }
    }
}
