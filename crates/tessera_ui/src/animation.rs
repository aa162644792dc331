//! Style transition animations.
//!
//! When a widget's interaction state changes (default → hover → focus and
//! back) an [`Animation`] blends the two resolved styles over time instead
//! of snapping. Transitions are table-driven:
//!
//! ```text
//!   previous  →  current   transition   blends         direction
//!   default   →  hover     OnHover      default↔hover  forward
//!   hover     →  default   OffHover     default↔hover  backward
//!   hover     →  focus     OnFocus      hover↔focus    forward
//!   focus     →  hover     OffFocus     hover↔focus    backward
//!   default   →  focus     FocusFromDefault  default↔focus  forward
//!   focus     →  default   FocusToDefault    default↔focus  backward
//! ```
//!
//! A transition that hits a still-playing animation over the same pair of
//! states reverses it in place, so flicking the pointer across a button
//! never restarts the blend from an endpoint.

use crate::style::{AnimationRule, ElementType, PropertyMask, Style, StyleSheet, StyleState};
use std::collections::HashMap;
use tessera_core::Id;

/// Easing function type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Linear interpolation.
    Linear,
    /// Hermite smoothstep `3t² - 2t³`.
    #[default]
    Smoothstep,
    /// Exponential ease-out (sharp snap to target).
    ExponentialOut,
    /// Exponential ease-in (accelerating).
    ExponentialIn,
    /// Exponential ease-in-out.
    ExponentialInOut,
    /// Instant (no animation).
    Instant,
}

impl Easing {
    /// Applies the easing function to a t value (0-1).
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::Smoothstep => t * t * (3.0 - 2.0 * t),
            Self::ExponentialOut => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2.0_f32.powf(-10.0 * t)
                }
            }
            Self::ExponentialIn => {
                if t <= 0.0 {
                    0.0
                } else {
                    2.0_f32.powf(10.0 * (t - 1.0))
                }
            }
            Self::ExponentialInOut => {
                if t <= 0.0 {
                    0.0
                } else if t >= 1.0 {
                    1.0
                } else if t < 0.5 {
                    2.0_f32.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2.0_f32.powf(-20.0 * t + 10.0)) / 2.0
                }
            }
            Self::Instant => {
                if t > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    /// Looks an easing up by its stylesheet name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "linear" => Some(Self::Linear),
            "smoothstep" => Some(Self::Smoothstep),
            "exponential-out" => Some(Self::ExponentialOut),
            "exponential-in" => Some(Self::ExponentialIn),
            "exponential-in-out" => Some(Self::ExponentialInOut),
            "instant" => Some(Self::Instant),
            _ => None,
        }
    }
}

/// Which way the animation clock runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationDirection {
    /// Time grows towards `max` (start → end style).
    Forward,
    /// Time shrinks towards `0` (end → start style).
    Backward,
}

/// Interaction-state edge that triggers an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Pointer entered.
    OnHover,
    /// Pointer left.
    OffHover,
    /// Widget gained focus.
    OnFocus,
    /// Widget lost focus while still hovered.
    OffFocus,
    /// Widget gained focus without passing through hover.
    FocusFromDefault,
    /// Widget lost focus and the pointer is gone.
    FocusToDefault,
}

struct TransitionDesc {
    start: StyleState,
    end: StyleState,
    direction: AnimationDirection,
    rewind: bool,
}

/// Indexed by `Transition as usize`.
static TRANSITIONS: [TransitionDesc; 6] = [
    TransitionDesc {
        start: StyleState::Default,
        end: StyleState::Hover,
        direction: AnimationDirection::Forward,
        rewind: false,
    },
    TransitionDesc {
        start: StyleState::Default,
        end: StyleState::Hover,
        direction: AnimationDirection::Backward,
        rewind: true,
    },
    TransitionDesc {
        start: StyleState::Hover,
        end: StyleState::Focus,
        direction: AnimationDirection::Forward,
        rewind: false,
    },
    TransitionDesc {
        start: StyleState::Hover,
        end: StyleState::Focus,
        direction: AnimationDirection::Backward,
        rewind: true,
    },
    TransitionDesc {
        start: StyleState::Default,
        end: StyleState::Focus,
        direction: AnimationDirection::Forward,
        rewind: false,
    },
    TransitionDesc {
        start: StyleState::Default,
        end: StyleState::Focus,
        direction: AnimationDirection::Backward,
        rewind: true,
    },
];

impl Transition {
    /// Transition for a state change, if it animates.
    #[must_use]
    pub fn between(previous: StyleState, current: StyleState) -> Option<Self> {
        match (previous, current) {
            (StyleState::Default, StyleState::Hover) => Some(Self::OnHover),
            (StyleState::Hover, StyleState::Default) => Some(Self::OffHover),
            (StyleState::Hover, StyleState::Focus) => Some(Self::OnFocus),
            (StyleState::Focus, StyleState::Hover) => Some(Self::OffFocus),
            (StyleState::Default, StyleState::Focus) => Some(Self::FocusFromDefault),
            (StyleState::Focus, StyleState::Default) => Some(Self::FocusToDefault),
            _ => None,
        }
    }

    fn desc(self) -> &'static TransitionDesc {
        &TRANSITIONS[self as usize]
    }

    /// The `(start, end)` state pair blended by this transition.
    #[must_use]
    pub fn states(self) -> (StyleState, StyleState) {
        let desc = self.desc();
        (desc.start, desc.end)
    }

    /// Clock direction of this transition.
    #[must_use]
    pub fn direction(self) -> AnimationDirection {
        self.desc().direction
    }
}

/// A running blend between two style states of one widget.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    /// Element type whose styles are blended.
    pub element: ElementType,
    /// Clock direction.
    pub direction: AnimationDirection,
    /// State at `time == 0`.
    pub start: StyleState,
    /// State at `time == max`.
    pub end: StyleState,
    /// Current time in seconds.
    pub time: f32,
    /// Duration in seconds.
    pub max: f32,
    /// Remaining delay before the clock starts.
    pub delay: f32,
    /// Properties that blend; the rest snap to the target state.
    pub mask: PropertyMask,
    /// Easing applied to `time / max`.
    pub easing: Easing,
    /// False once the clock reached its bound.
    pub playing: bool,
    /// Last frame the clock advanced.
    pub last_frame: u64,
}

impl Animation {
    /// Starts `transition` for `element` with timing from `rule`.
    ///
    /// Backward transitions start at `max` so they play from the end state.
    #[must_use]
    pub fn new(transition: Transition, element: ElementType, rule: &AnimationRule, frame: u64) -> Self {
        let desc = transition.desc();
        Self {
            element,
            direction: desc.direction,
            start: desc.start,
            end: desc.end,
            time: if desc.rewind { rule.duration } else { 0.0 },
            max: rule.duration,
            delay: rule.delay,
            mask: rule.properties,
            easing: rule.easing,
            playing: true,
            last_frame: frame,
        }
    }

    /// Returns true if this animation blends `start` ↔ `end`.
    #[must_use]
    pub fn blends(&self, start: StyleState, end: StyleState) -> bool {
        self.start == start && self.end == end
    }

    /// Turns the clock around without touching `time`.
    pub fn reverse(&mut self, direction: AnimationDirection) {
        self.direction = direction;
        self.playing = true;
    }

    /// State the animation settles in.
    #[must_use]
    pub fn target(&self) -> StyleState {
        match self.direction {
            AnimationDirection::Forward => self.end,
            AnimationDirection::Backward => self.start,
        }
    }

    /// Normalized progress in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.max <= 0.0 {
            return match self.direction {
                AnimationDirection::Forward => 1.0,
                AnimationDirection::Backward => 0.0,
            };
        }
        (self.time / self.max).clamp(0.0, 1.0)
    }

    /// Advances the clock by `dt` seconds, at most once per `frame`.
    pub fn update(&mut self, dt: f32, frame: u64) {
        if !self.playing || self.last_frame == frame {
            return;
        }
        self.last_frame = frame;

        let mut dt = dt.max(0.0);
        if self.delay > 0.0 {
            let consumed = dt.min(self.delay);
            self.delay -= consumed;
            dt -= consumed;
            if dt <= 0.0 {
                return;
            }
        }

        match self.direction {
            AnimationDirection::Forward => {
                self.time = (self.time + dt).min(self.max);
                if self.time >= self.max {
                    self.playing = false;
                }
            }
            AnimationDirection::Backward => {
                self.time = (self.time - dt).max(0.0);
                if self.time <= 0.0 {
                    self.playing = false;
                }
            }
        }
    }

    /// Blends the resolved `start` and `end` styles at the current time.
    #[must_use]
    pub fn blend(&self, start: &Style, end: &Style) -> Style {
        let t = self.easing.apply(self.progress());
        let mut out = match self.direction {
            AnimationDirection::Forward => *end,
            AnimationDirection::Backward => *start,
        };
        for property in self.mask.iter() {
            let value = property.get(start).lerp(property.get(end), t);
            property.set(&mut out, value);
        }
        out
    }
}

#[derive(Debug, Clone, Copy)]
struct ControlState {
    state: StyleState,
    frame: u64,
}

/// Per-widget interaction states and their running animations.
#[derive(Debug, Default)]
pub struct Animator {
    animations: HashMap<Id, Animation>,
    states: HashMap<Id, ControlState>,
}

impl Animator {
    /// Creates an empty animator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances every animation once and forgets finished ones and widgets
    /// that were not drawn last frame.
    pub fn advance(&mut self, dt: f32, frame: u64) {
        for animation in self.animations.values_mut() {
            animation.update(dt, frame);
        }
        self.animations.retain(|_, animation| animation.playing);
        self.states
            .retain(|_, state| state.frame + 1 >= frame);
    }

    /// Records the interaction state of `id` for `frame`.
    ///
    /// On a state change this looks up the transition and animation rule and
    /// starts, or reverses, the widget's animation. Returns true if the state
    /// changed.
    pub fn record(
        &mut self,
        id: Id,
        element: ElementType,
        state: StyleState,
        frame: u64,
        sheet: &StyleSheet,
    ) -> bool {
        let previous = self
            .states
            .insert(id, ControlState { state, frame })
            .map_or(StyleState::Default, |prev| prev.state);
        if previous == state {
            return false;
        }
        self.get_animation(id, element, previous, state, frame, sheet);
        true
    }

    fn get_animation(
        &mut self,
        id: Id,
        element: ElementType,
        previous: StyleState,
        current: StyleState,
        frame: u64,
        sheet: &StyleSheet,
    ) {
        let Some(transition) = Transition::between(previous, current) else {
            return;
        };
        let (start, end) = transition.states();

        if let Some(animation) = self.animations.get_mut(&id) {
            if animation.playing && animation.blends(start, end) {
                animation.reverse(transition.direction());
                return;
            }
        }

        match sheet.animation(element) {
            Some(rule) => {
                self.animations
                    .insert(id, Animation::new(transition, element, &rule, frame));
            }
            None => {
                self.animations.remove(&id);
            }
        }
    }

    /// Running animation of `id`.
    #[must_use]
    pub fn get(&self, id: Id) -> Option<&Animation> {
        self.animations.get(&id).filter(|animation| animation.playing)
    }

    /// Last recorded interaction state of `id`.
    #[must_use]
    pub fn state(&self, id: Id) -> StyleState {
        self.states
            .get(&id)
            .map_or(StyleState::Default, |state| state.state)
    }

    /// Number of running animations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.animations.len()
    }

    /// Returns true if nothing is animating.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    /// Drops all state.
    pub fn clear(&mut self) {
        self.animations.clear();
        self.states.clear();
    }
}
