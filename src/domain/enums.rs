use serde::{Deserialize, Serialize};

/// Urgency tier of a focus task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

impl Default for Urgency {
    fn default() -> Self {
        Urgency::Medium
    }
}

impl Urgency {
    /// Sort weight: high urgency sorts first
    pub fn weight(&self) -> u8 {
        match self {
            Urgency::High => 0,
            Urgency::Medium => 1,
            Urgency::Low => 2,
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Urgency::Low => "LOW",
            Urgency::Medium => "MED",
            Urgency::High => "HIGH",
        }
    }

    /// Next tier in the input form cycle
    pub fn next(&self) -> Self {
        match self {
            Urgency::Low => Urgency::Medium,
            Urgency::Medium => Urgency::High,
            Urgency::High => Urgency::Low,
        }
    }
}

/// Task list ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    /// Pinned first, then high > medium > low
    Urgency,
    /// Pinned first, then insertion order
    Insertion,
}

impl SortMode {
    pub fn toggle(&self) -> Self {
        match self {
            SortMode::Urgency => SortMode::Insertion,
            SortMode::Insertion => SortMode::Urgency,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortMode::Urgency => "urgency",
            SortMode::Insertion => "insertion",
        }
    }
}

/// UI mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    AddingTask,
    AddingSubtask,
}
