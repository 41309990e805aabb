//! Typography Lab: a word that stutters, then changes.
//!
//! Every 2500ms tick the display enters a glitch phase with a fresh 50/50
//! rainbow coin flip. 300ms later the next word is committed and the glitch
//! clears. Picking a word directly switches at once and pulses the glitch for
//! 200ms.

use std::time::Duration;

use rand::Rng;

use crate::config::LabConfig;
use crate::experiment::{Behavior, Command, Context, Experiment, ExperimentKind, Mounted};
use crate::input::InputField;
use crate::timer::TimerHandle;
use crate::visuals::{TypographyView, VisualState};

pub const WORDS: [&str; 8] = ["OPTRA", "DESIGN", "LAB", "CREATIVE", "FUTURE", "ART", "MAGIC", "WONDER"];

const CADENCE: Duration = Duration::from_millis(2500);
const COMMIT_DELAY: Duration = Duration::from_millis(300);
const PULSE: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypographyEvent {
    /// Second phase of a timed transition: advance the word, clear the glitch.
    Commit,
    /// End of a manual-selection glitch pulse.
    ClearPulse,
}

/// Where the word display is in its transition cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Steady,
    /// Glitching while a commit is pending.
    Glitching,
    /// Glitching after a manual pick.
    Pulse,
}

#[derive(Debug)]
pub struct TypographyLab {
    text_index: usize,
    rainbow: bool,
    phase: Phase,
    pulse: Option<TimerHandle>,
}

impl TypographyLab {
    pub fn new(_config: &LabConfig) -> Self {
        Self {
            text_index: 0,
            rainbow: false,
            phase: Phase::Steady,
            pulse: None,
        }
    }

    /// Registry constructor.
    pub fn mount(config: &LabConfig, input: &InputField, now: Duration) -> Box<dyn Experiment> {
        Box::new(Mounted::new(Self::new(config), input, now))
    }

    pub fn text_index(&self) -> usize {
        self.text_index
    }

    pub fn word(&self) -> &'static str {
        WORDS[self.text_index]
    }

    pub fn glitching(&self) -> bool {
        self.phase != Phase::Steady
    }

    pub fn rainbow(&self) -> bool {
        self.rainbow
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }
}

impl Behavior for TypographyLab {
    type Event = TypographyEvent;
    const KIND: ExperimentKind = ExperimentKind::TypographyLab;

    fn cadence(&self) -> Duration {
        CADENCE
    }

    fn on_tick(&mut self, cx: &mut Context<'_, TypographyEvent>) {
        self.phase = Phase::Glitching;
        self.rainbow = rand::thread_rng().gen_bool(0.5);
        cx.timers.schedule(cx.now, COMMIT_DELAY, TypographyEvent::Commit);
    }

    fn on_timer(&mut self, event: TypographyEvent, _cx: &mut Context<'_, TypographyEvent>) {
        match event {
            TypographyEvent::Commit => {
                self.text_index = (self.text_index + 1) % WORDS.len();
                self.phase = Phase::Steady;
                log::debug!("typography committed {}", WORDS[self.text_index]);
            }
            TypographyEvent::ClearPulse => {
                self.pulse = None;
                self.phase = Phase::Steady;
            }
        }
    }

    fn on_command(&mut self, command: Command, cx: &mut Context<'_, TypographyEvent>) -> bool {
        match command {
            Command::SelectText(index) if index < WORDS.len() => {
                self.text_index = index;
                self.phase = Phase::Pulse;
                if let Some(previous) = self.pulse.take() {
                    cx.timers.cancel(previous);
                }
                self.pulse = Some(cx.timers.schedule(cx.now, PULSE, TypographyEvent::ClearPulse));
                true
            }
            _ => false,
        }
    }

    fn view(&self, _now: Duration) -> VisualState {
        let glitching = self.glitching();
        VisualState::TypographyLab(TypographyView {
            word: self.word(),
            text_index: self.text_index,
            words: &WORDS,
            glitching,
            rainbow: self.rainbow,
            scale: if glitching { 1.25 } else { 1.0 },
            skew: if glitching { 12.0 } else { 0.0 },
        })
    }
}
