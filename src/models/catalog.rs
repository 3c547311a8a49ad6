// src/models/catalog.rs

//! The fixed, ordered catalog of things captured for every athlete.

use serde::{Deserialize, Serialize};

/// How a tile is located on the athlete overview page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TileLocator {
    /// ForceDecks tile addressed by its `data-test-name` attribute
    ForceDecks { name: String },

    /// Tile addressed by `data-testid`, optionally disambiguated by heading
    TestId {
        test_id: String,
        #[serde(default)]
        title: Option<String>,
    },

    /// HumanTrak tile addressed by its heading text
    HumanTrak { title: String },
}

impl TileLocator {
    /// Short human-readable description for logs.
    pub fn describe(&self) -> String {
        match self {
            TileLocator::ForceDecks { name } => format!("forcedecks '{name}'"),
            TileLocator::TestId {
                test_id,
                title: Some(title),
            } => format!("{test_id} '{title}'"),
            TileLocator::TestId { test_id, title: None } => test_id.clone(),
            TileLocator::HumanTrak { title } => format!("humantrak '{title}'"),
        }
    }
}

/// A test whose detail modal is opened and captured section by section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalTest {
    /// Display label (e.g. "Countermovement Jump")
    pub label: String,

    /// Filename prefix for the captured sections
    pub prefix: String,

    /// Tile that opens the modal
    pub tile: TileLocator,
}

/// A tile captured once per metric-dropdown state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricTile {
    /// Display label (e.g. "Overhead Squat")
    pub label: String,

    /// Filename prefix for the captured states
    pub prefix: String,

    /// Tile locator
    pub tile: TileLocator,

    /// Capture the tile as rendered before any metric is picked
    #[serde(default = "default_include_base")]
    pub include_base: bool,

    /// Dropdown labels to capture, in order
    pub metrics: Vec<String>,
}

fn default_include_base() -> bool {
    true
}

impl MetricTile {
    /// The ordered capture targets of this tile.
    pub fn targets(&self) -> Vec<CaptureTarget> {
        let offset = usize::from(self.include_base);
        let mut targets = Vec::with_capacity(self.metrics.len() + offset);
        if self.include_base {
            targets.push(CaptureTarget::TileBase {
                prefix: self.prefix.clone(),
            });
        }
        targets.extend(
            self.metrics
                .iter()
                .enumerate()
                .map(|(i, label)| CaptureTarget::TileMetric {
                    prefix: self.prefix.clone(),
                    ordinal: i + 1 + offset,
                    label: label.clone(),
                }),
        );
        targets
    }
}

/// One addressable screenshot unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CaptureTarget {
    /// One accordion section of a test modal (0-based index)
    Section { prefix: String, index: usize },

    /// The whole modal, used when it has no accordion sections
    WholeModal { prefix: String },

    /// A metric tile before any dropdown selection
    TileBase { prefix: String },

    /// A metric tile after selecting `label`; `ordinal` is its 1-based file number
    TileMetric {
        prefix: String,
        ordinal: usize,
        label: String,
    },
}

impl CaptureTarget {
    /// Stable identifier, unique within one athlete.
    pub fn id(&self) -> String {
        match self {
            CaptureTarget::Section { prefix, index } => format!("{prefix}#section-{}", index + 1),
            CaptureTarget::WholeModal { prefix } => format!("{prefix}#modal"),
            CaptureTarget::TileBase { prefix } => format!("{prefix}#base"),
            CaptureTarget::TileMetric { prefix, label, .. } => format!("{prefix}#{label}"),
        }
    }

    /// Deterministic file name, so re-runs overwrite instead of accumulating.
    pub fn file_name(&self) -> String {
        let (prefix, ordinal) = match self {
            CaptureTarget::Section { prefix, index } => (prefix, index + 1),
            CaptureTarget::WholeModal { prefix } | CaptureTarget::TileBase { prefix } => {
                (prefix, 1)
            }
            CaptureTarget::TileMetric {
                prefix, ordinal, ..
            } => (prefix, *ordinal),
        };
        format!("{prefix}_{ordinal:03}.png")
    }

    pub fn prefix(&self) -> &str {
        match self {
            CaptureTarget::Section { prefix, .. }
            | CaptureTarget::WholeModal { prefix }
            | CaptureTarget::TileBase { prefix }
            | CaptureTarget::TileMetric { prefix, .. } => prefix,
        }
    }
}
