//! The six experiment variants.

pub mod color_harmonics;
pub mod geometry_lab;
pub mod motion_studies;
pub mod particles;
pub mod sound_visualizer;
pub mod typography_lab;

pub use color_harmonics::ColorHarmonics;
pub use geometry_lab::GeometryLab;
pub use motion_studies::MotionStudies;
pub use particles::{InteractiveParticles, Particle};
pub use sound_visualizer::SoundVisualizer;
pub use typography_lab::TypographyLab;
