//! Developer model.
//!
//! Developers are referenced from tasks by ID. They carry skills for
//! reporting; scheduling never depends on who does the work.

use serde::{Deserialize, Serialize};

/// A developer who may be assigned to tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Developer {
    /// Unique developer identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Skills with proficiency levels.
    pub skills: Vec<Skill>,
}

/// A skill with proficiency level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    /// Skill name (e.g., "rust", "sql", "ux").
    pub name: String,
    /// Proficiency level (0.0 to 1.0, where 1.0 = expert).
    pub level: f64,
}

impl Developer {
    /// Creates a developer with no skills.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            skills: Vec::new(),
        }
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a skill. The level is clamped to [0.0, 1.0].
    pub fn with_skill(mut self, name: impl Into<String>, level: f64) -> Self {
        self.skills.push(Skill {
            name: name.into(),
            level: level.clamp(0.0, 1.0),
        });
        self
    }

    /// Proficiency in a skill (0.0 if absent).
    pub fn skill_level(&self, name: &str) -> f64 {
        self.skills
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.level)
            .unwrap_or(0.0)
    }
}
