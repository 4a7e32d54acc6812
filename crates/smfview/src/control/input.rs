use ahash::{AHashMap, AHashSet};
use smallvec::SmallVec;
use strum::IntoEnumIterator;

use super::Control;

/// Debounce state of an edge-triggered control, as of the last sample.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum KeyState {
    #[default]
    Released,
    Pressed,
}

impl KeyState {
    /// Moves to the state matching `held`. Returns true only on Released -> Pressed.
    pub fn update(&mut self, held: bool) -> bool {
        let fired = held && *self == KeyState::Released;
        *self = if held { KeyState::Pressed } else { KeyState::Released };
        fired
    }
}

/// Controls active in one frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Continuous controls currently held down.
    pub held: SmallVec<[Control; 8]>,

    /// Edge-triggered controls pressed since the previous frame.
    pub pressed: SmallVec<[Control; 4]>,
}

/// Tracks which controls are held and turns presses into one-shot events.
#[derive(Debug, Default)]
pub struct ControlInput {
    held: AHashSet<Control>,
    states: AHashMap<Control, KeyState>,
}

impl ControlInput {
    pub fn set_held(&mut self, control: Control, held: bool) {
        if held {
            self.held.insert(control);
        } else {
            self.held.remove(&control);
        }
    }

    /// Drops all held controls, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    /// Polls the held set once per frame.
    pub fn sample(&mut self) -> FrameInput {
        let mut input = FrameInput::default();
        for control in Control::iter() {
            let held = self.held.contains(&control);
            if control.is_edge_triggered() {
                if self.states.entry(control).or_default().update(held) {
                    input.pressed.push(control);
                }
            } else if held {
                input.held.push(control);
            }
        }
        input
    }
}
