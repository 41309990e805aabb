//! Pointer and click input shared between the host and the active experiment.
//!
//! The host writes into an [`InputField`]; the active experiment reads it the
//! next time it advances. Writes are flat overwrites, so the host may call
//! [`InputField::set_pointer`] as often as it likes. Several moves between two
//! advances coalesce into the last one.
//!
//! Experiments never look at the absolute click count. Each instance keeps an
//! [`InputCursor`] that turns the counter into rising edges, one per click,
//! counted from the moment the instance mounted.
//!
//! # Usage
//!
//! ```ignore
//! // From a winit event loop
//! fn window_event(&mut self, event: WindowEvent) {
//!     self.lab.input_mut().handle_event(&event);
//! }
//!
//! // Or directly
//! lab.input_mut().set_pointer(120.0, 80.0);
//! lab.input_mut().register_click();
//! ```

use glam::Vec2;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, WindowEvent};

/// Latest pointer position and click counter, in canvas-local pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputField {
    pointer: Vec2,
    click_count: u64,
    pointer_version: u64,
}

impl InputField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current pointer position relative to the canvas origin.
    #[inline]
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    /// Total clicks registered since mount or the last reset.
    #[inline]
    pub fn click_count(&self) -> u64 {
        self.click_count
    }

    /// Number of pointer moves seen so far. Bumped even if coordinates repeat.
    #[inline]
    pub fn pointer_version(&self) -> u64 {
        self.pointer_version
    }

    /// Overwrite the pointer position. Last write wins.
    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.pointer = Vec2::new(x, y);
        self.pointer_version = self.pointer_version.wrapping_add(1);
    }

    /// Count one click.
    pub fn register_click(&mut self) {
        self.click_count = self.click_count.saturating_add(1);
    }

    /// Zero the click counter. The pointer position is kept.
    pub fn reset(&mut self) {
        self.click_count = 0;
    }

    /// Apply a winit window event.
    ///
    /// Cursor moves update the pointer and left-button presses count as clicks.
    /// Returns `true` if the event changed the field.
    pub fn handle_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => self.handle_cursor_moved(*position),
            WindowEvent::MouseInput { state, button, .. } => self.handle_mouse_input(*state, *button),
            _ => false,
        }
    }

    /// Pointer half of [`InputField::handle_event`].
    pub fn handle_cursor_moved(&mut self, position: PhysicalPosition<f64>) -> bool {
        self.set_pointer(position.x as f32, position.y as f32);
        true
    }

    /// Button half of [`InputField::handle_event`]. Only left presses count.
    pub fn handle_mouse_input(&mut self, state: ElementState, button: MouseButton) -> bool {
        match (state, button) {
            (ElementState::Pressed, MouseButton::Left) => {
                self.register_click();
                true
            }
            _ => false,
        }
    }
}

/// What changed in an [`InputField`] since an experiment last looked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputDelta {
    /// New clicks since the last observation (one rising edge each).
    pub clicks: u64,
    /// Whether the pointer moved since the last observation.
    pub pointer_moved: bool,
}

/// Per-instance reader that turns the shared counters into edges.
#[derive(Debug, Clone, Copy)]
pub struct InputCursor {
    seen_clicks: u64,
    seen_pointer: u64,
}

impl InputCursor {
    /// Baseline at the field's current values, so earlier input never fires.
    pub fn new(field: &InputField) -> Self {
        Self {
            seen_clicks: field.click_count(),
            seen_pointer: field.pointer_version(),
        }
    }

    /// Compare against the field and remember what was seen.
    pub fn observe(&mut self, field: &InputField) -> InputDelta {
        // A reset drops the count below what we saw; rebase without firing.
        let clicks = field.click_count().saturating_sub(self.seen_clicks);
        self.seen_clicks = field.click_count();

        let pointer_moved = field.pointer_version() != self.seen_pointer;
        self.seen_pointer = field.pointer_version();

        InputDelta {
            clicks,
            pointer_moved,
        }
    }
}
