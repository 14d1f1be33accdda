//! Inspection settings, built once from command-line flags.

/// Which part of a container to inspect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ContainerSelection {
    /// Show the container itself with a manifest of its entries.
    #[default]
    Whole,
    /// Decode and show the entry at this position.
    Entry(usize),
}

impl ContainerSelection {
    /// Map a command-line index to a selection. `-1` (or any negative
    /// value) selects the whole container.
    pub fn from_index(index: i64) -> Self {
        usize::try_from(index).map_or(ContainerSelection::Whole, ContainerSelection::Entry)
    }
}

/// How the inspected artifact is printed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Two-column property table.
    #[default]
    Table,
    /// Pretty-printed DAG-JSON of the canonical bytes.
    DagJson,
}

/// Configuration threaded through the pipeline.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InspectConfig {
    pub container: ContainerSelection,
    pub format: OutputFormat,
}
