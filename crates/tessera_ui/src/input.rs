//! Input handling for UI.
//!
//! Hosts queue [`InputEvent`]s on the context at any time; they are drained
//! in `begin`, which folds them into the frame's [`InputState`]. Edge flags
//! (pressed/released this frame) are reset at the end of every frame.

#![allow(missing_docs)]

use crate::layout::{Rect, Vec2};

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button.
    Left,
    /// Right mouse button.
    Right,
    /// Middle mouse button (scroll wheel click).
    Middle,
}

/// Keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Escape key.
    Escape,
    /// Enter/Return key.
    Enter,
    /// Tab key.
    Tab,
    /// Backspace key.
    Backspace,
    /// Delete key.
    Delete,
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    /// Arrow left.
    Left,
    /// Arrow right.
    Right,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Space bar.
    Space,
    /// Shift key.
    Shift,
    /// Control key.
    Ctrl,
    /// Alt key.
    Alt,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Control key is held.
    pub ctrl: bool,
    /// Alt key is held.
    pub alt: bool,
    /// Super/Command key is held.
    pub super_key: bool,
}

/// Raw input from the host, in window pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    MouseMove { x: f32, y: f32 },
    MouseDown { button: MouseButton },
    MouseUp { button: MouseButton },
    Scroll { dx: f32, dy: f32 },
    KeyDown { key: Key },
    KeyUp { key: Key },
    Text(String),
    Modifiers(Modifiers),
}

/// Per-frame information supplied to `begin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameHints {
    /// Seconds since the previous frame.
    pub delta_time: f32,
    /// Area of the window the UI covers, in window pixels.
    pub viewport: Rect,
    /// Window pixels per UI unit.
    pub scale: f32,
}

impl Default for FrameHints {
    fn default() -> Self {
        Self {
            delta_time: 1.0 / 60.0,
            viewport: Rect::new(0.0, 0.0, 1280.0, 720.0),
            scale: 1.0,
        }
    }
}

impl FrameHints {
    /// Maps a window-pixel position into UI coordinates.
    #[must_use]
    pub fn to_ui(&self, x: f32, y: f32) -> Vec2 {
        let scale = if self.scale > 0.0 { self.scale } else { 1.0 };
        Vec2::new((x - self.viewport.x) / scale, (y - self.viewport.y) / scale)
    }
}

/// Input state for the current frame.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Current mouse position in UI coordinates.
    pub mouse: Vec2,
    /// Mouse position at the end of the last frame.
    pub prev_mouse: Vec2,
    /// Position of the most recent button press.
    pub press_pos: Vec2,
    /// Mouse buttons pressed this frame.
    buttons_pressed: u8,
    /// Mouse buttons released this frame.
    buttons_released: u8,
    /// Mouse buttons currently held.
    buttons_down: u8,
    /// Accumulated wheel delta this frame.
    pub scroll_delta: Vec2,
    /// Modifier keys state.
    pub modifiers: Modifiers,
    /// Keys pressed this frame.
    keys_pressed: Vec<Key>,
    /// Keys currently held.
    keys_down: Vec<Key>,
    /// Text input this frame.
    pub text_input: String,
    /// Time of the last left click (for double-click detection).
    last_click_time: Option<f32>,
    /// Position of last click.
    last_click_pos: Vec2,
    /// Double-click detected this frame.
    double_clicked: bool,
}

impl InputState {
    /// Double-click time threshold (seconds).
    const DOUBLE_CLICK_TIME: f32 = 0.3;
    /// Double-click position threshold (pixels).
    const DOUBLE_CLICK_DISTANCE: f32 = 5.0;

    /// Creates a new empty input state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears per-frame edges. Called at the end of every frame.
    pub fn end_frame(&mut self) {
        self.prev_mouse = self.mouse;
        self.buttons_pressed = 0;
        self.buttons_released = 0;
        self.scroll_delta = Vec2::ZERO;
        self.keys_pressed.clear();
        self.text_input.clear();
        self.double_clicked = false;
    }

    /// Folds one host event into the state.
    pub fn apply(&mut self, event: &InputEvent, hints: &FrameHints, time: f32) {
        match event {
            InputEvent::MouseMove { x, y } => self.mouse = hints.to_ui(*x, *y),
            InputEvent::MouseDown { button } => self.mouse_button_down(*button, time),
            InputEvent::MouseUp { button } => self.mouse_button_up(*button),
            InputEvent::Scroll { dx, dy } => self.scroll(*dx, *dy),
            InputEvent::KeyDown { key } => self.key_down(*key),
            InputEvent::KeyUp { key } => self.key_up(*key),
            InputEvent::Text(text) => self.text(text),
            InputEvent::Modifiers(modifiers) => self.modifiers = *modifiers,
        }
    }

    /// Records a mouse button press.
    pub fn mouse_button_down(&mut self, button: MouseButton, current_time: f32) {
        let mask = Self::button_mask(button);
        self.buttons_pressed |= mask;
        self.buttons_down |= mask;
        self.press_pos = self.mouse;

        if button == MouseButton::Left {
            let distance = (self.mouse - self.last_click_pos).length();
            if let Some(last) = self.last_click_time {
                if current_time - last < Self::DOUBLE_CLICK_TIME
                    && distance < Self::DOUBLE_CLICK_DISTANCE
                {
                    self.double_clicked = true;
                }
            }

            self.last_click_time = Some(current_time);
            self.last_click_pos = self.mouse;
        }
    }

    /// Records a mouse button release.
    pub fn mouse_button_up(&mut self, button: MouseButton) {
        let mask = Self::button_mask(button);
        self.buttons_released |= mask;
        self.buttons_down &= !mask;
    }

    /// Records scroll input.
    pub fn scroll(&mut self, dx: f32, dy: f32) {
        self.scroll_delta += Vec2::new(dx, dy);
    }

    /// Records a key press.
    pub fn key_down(&mut self, key: Key) {
        if !self.keys_down.contains(&key) {
            self.keys_pressed.push(key);
            self.keys_down.push(key);
        }
    }

    /// Records a key release.
    pub fn key_up(&mut self, key: Key) {
        self.keys_down.retain(|&k| k != key);
    }

    /// Records text input.
    pub fn text(&mut self, text: &str) {
        self.text_input.push_str(text);
    }

    /// Returns true if the mouse button was pressed this frame.
    #[must_use]
    pub fn mouse_pressed(&self, button: MouseButton) -> bool {
        (self.buttons_pressed & Self::button_mask(button)) != 0
    }

    /// Returns true if any mouse button was pressed this frame.
    #[must_use]
    pub fn any_pressed(&self) -> bool {
        self.buttons_pressed != 0
    }

    /// Returns true if the mouse button was released this frame.
    #[must_use]
    pub fn mouse_released(&self, button: MouseButton) -> bool {
        (self.buttons_released & Self::button_mask(button)) != 0
    }

    /// Returns true if any mouse button was released this frame.
    #[must_use]
    pub fn any_released(&self) -> bool {
        self.buttons_released != 0
    }

    /// Returns true if the mouse button is currently held.
    #[must_use]
    pub fn mouse_down(&self, button: MouseButton) -> bool {
        (self.buttons_down & Self::button_mask(button)) != 0
    }

    /// Returns true if any mouse button is held.
    #[must_use]
    pub fn any_down(&self) -> bool {
        self.buttons_down != 0
    }

    /// Returns true if a double-click occurred this frame.
    #[must_use]
    pub fn double_clicked(&self) -> bool {
        self.double_clicked
    }

    /// Returns true if the key was pressed this frame.
    #[must_use]
    pub fn key_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Returns true if the key is currently held.
    #[must_use]
    pub fn key_held(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    /// Returns the mouse movement since last frame.
    #[must_use]
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse - self.prev_mouse
    }

    /// Returns the bit mask for a button.
    const fn button_mask(button: MouseButton) -> u8 {
        match button {
            MouseButton::Left => 1,
            MouseButton::Right => 2,
            MouseButton::Middle => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouse_click() {
        let mut input = InputState::new();

        input.mouse_button_down(MouseButton::Left, 0.0);
        assert!(input.mouse_pressed(MouseButton::Left));
        assert!(input.mouse_down(MouseButton::Left));

        input.end_frame();
        assert!(!input.mouse_pressed(MouseButton::Left));
        assert!(input.mouse_down(MouseButton::Left));

        input.mouse_button_up(MouseButton::Left);
        assert!(input.mouse_released(MouseButton::Left));
        assert!(!input.mouse_down(MouseButton::Left));
    }

    #[test]
    fn test_double_click() {
        let mut input = InputState::new();

        input.mouse_button_down(MouseButton::Left, 0.0);
        assert!(!input.double_clicked());
        input.end_frame();
        input.mouse_button_down(MouseButton::Left, 0.1);

        assert!(input.double_clicked());
    }

    #[test]
    fn test_events_scaled_into_viewport() {
        let hints = FrameHints {
            delta_time: 0.016,
            viewport: Rect::new(100.0, 50.0, 800.0, 600.0),
            scale: 2.0,
        };
        let mut input = InputState::new();
        input.apply(&InputEvent::MouseMove { x: 300.0, y: 250.0 }, &hints, 0.0);
        assert_eq!(input.mouse, Vec2::new(100.0, 100.0));

        input.apply(&InputEvent::MouseDown { button: MouseButton::Left }, &hints, 0.0);
        assert_eq!(input.press_pos, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_scroll_accumulates_until_frame_end() {
        let mut input = InputState::new();
        input.scroll(0.0, 3.0);
        input.scroll(0.0, 2.0);
        assert_eq!(input.scroll_delta, Vec2::new(0.0, 5.0));
        input.end_frame();
        assert_eq!(input.scroll_delta, Vec2::ZERO);
    }
}
