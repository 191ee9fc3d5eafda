//! Mapping strategies.

/// How values cross a joint of the pipeline.
///
/// Set independently at the data provider → rule joint and at the rule →
/// result handler joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MappingStrategy {
    /// Fan-out: every upstream value proceeds on its own.
    #[default]
    EachToEach,
    /// Fan-in: all upstream values are collected, in order, into one freshly
    /// built `Vec` which proceeds as a single value.
    AllToEach,
}
