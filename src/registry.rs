//! Ordered catalog of available experiments.

use std::time::Duration;

use crate::config::LabConfig;
use crate::experiment::{Constructor, Experiment, ExperimentKind};
use crate::experiments::{
    ColorHarmonics, GeometryLab, InteractiveParticles, MotionStudies, SoundVisualizer, TypographyLab,
};
use crate::input::InputField;

/// Number of experiments in the default registry.
pub const EXPERIMENT_COUNT: usize = 6;

/// One registry slot.
#[derive(Clone, Copy)]
pub struct ExperimentEntry {
    pub kind: ExperimentKind,
    pub constructor: Constructor,
}

impl ExperimentEntry {
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

/// Experiments in selection order. Index 0 is mounted on start and on reset.
#[derive(Clone)]
pub struct ExperimentRegistry {
    entries: Vec<ExperimentEntry>,
}

impl ExperimentRegistry {
    /// The standard six experiments.
    pub fn new() -> Self {
        let constructors: [Constructor; EXPERIMENT_COUNT] = [
            ColorHarmonics::mount,
            MotionStudies::mount,
            TypographyLab::mount,
            InteractiveParticles::mount,
            SoundVisualizer::mount,
            GeometryLab::mount,
        ];
        let entries = ExperimentKind::ALL
            .into_iter()
            .zip(constructors)
            .map(|(kind, constructor)| ExperimentEntry { kind, constructor })
            .collect();
        Self { entries }
    }

    /// A registry over exactly these entries, in this order.
    pub fn from_entries(entries: Vec<ExperimentEntry>) -> Self {
        Self { entries }
    }

    /// Append one more entry at the end.
    pub fn with_entry(mut self, entry: ExperimentEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ExperimentEntry> {
        self.entries.get(index)
    }

    /// Display names in order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(ExperimentEntry::name)
    }

    /// Build a fresh instance of the experiment at `index`, mounted at `now`.
    pub fn instantiate(
        &self,
        index: usize,
        config: &LabConfig,
        input: &InputField,
        now: Duration,
    ) -> Option<Box<dyn Experiment>> {
        self.get(index).map(|entry| (entry.constructor)(config, input, now))
    }
}

impl Default for ExperimentRegistry {
    fn default() -> Self {
        Self::new()
    }
}
