//! Project status values.

use serde::{Deserialize, Serialize};

use super::Descriptor;

/// Point-in-time classification of a project.
///
/// Never terminal: a project classified `Failure` becomes `Success`
/// once every task is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    /// Time frame elapsed and all tasks complete.
    Success,
    /// Still within the time frame.
    InProgress,
    /// Time frame elapsed with incomplete tasks.
    Failure,
}

impl ProjectStatus {
    pub fn descriptor(self) -> Descriptor {
        match self {
            ProjectStatus::Success => Descriptor::new(
                "Success",
                "The time frame has passed and all tasks are complete",
            ),
            ProjectStatus::InProgress => Descriptor::new(
                "In progress",
                "The project is within its time frame and tasks remain",
            ),
            ProjectStatus::Failure => Descriptor::new(
                "Failure",
                "The time frame has passed with incomplete tasks; completing them still counts",
            ),
        }
    }
}
