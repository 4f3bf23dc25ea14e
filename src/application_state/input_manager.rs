//! # Input Manager
//!
//! This module handles input processing for the application, including:
//! - Keyboard input state tracking
//! - Mouse button and cursor position tracking
//! - Input event processing
//! - Input state management

use std::collections::HashMap;

use winit::{
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use super::input_state::{MouseInput, ProcessedInputState, RawInputState};

const KEY_CODES: [KeyCode; 16] = [
    KeyCode::Space,
    KeyCode::KeyG,
    KeyCode::KeyV,
    KeyCode::KeyT,
    KeyCode::KeyR,
    KeyCode::KeyN,
    KeyCode::KeyE,
    KeyCode::KeyS,
    KeyCode::KeyW,
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Tab,
    KeyCode::Escape,
    KeyCode::KeyB,
];

/// Manages the state of all input devices and processes input events.
///
/// This struct maintains the current state of keyboard and mouse inputs
/// and provides methods to process input events from the windowing system.
pub struct InputManager {
    /// Previous state of all tracked keyboard keys
    pub keyboard_inputs_old: HashMap<KeyCode, bool>,
    /// Current state of all tracked keyboard keys
    pub keyboard_inputs_new: HashMap<KeyCode, bool>,

    /// Current state of mouse inputs
    pub mouse_inputs: MouseInput,
}

impl InputManager {
    /// Creates a new InputManager with default state.
    pub fn new() -> Self {
        let mut keyboard_inputs_old = HashMap::new();
        let mut keyboard_inputs_new = HashMap::new();
        for key_code in KEY_CODES {
            keyboard_inputs_old.insert(key_code, false);
            keyboard_inputs_new.insert(key_code, false);
        }

        let mouse_buttons = [MouseButton::Left, MouseButton::Right, MouseButton::Middle];

        let mut mouse_button_inputs_old = HashMap::new();
        let mut mouse_button_inputs_new = HashMap::new();

        for button in mouse_buttons {
            mouse_button_inputs_old.insert(button, false);
            mouse_button_inputs_new.insert(button, false);
        }

        let mouse_inputs = MouseInput {
            mouse_button_inputs_old,
            mouse_button_inputs_new,
            cursor_position: None,
        };

        Self {
            keyboard_inputs_old,
            keyboard_inputs_new,
            mouse_inputs,
        }
    }

    /// Updates the old state with the current state to prepare for the next frame.
    pub fn move_old_states(&mut self) {
        for (key, new_state) in self.keyboard_inputs_new.iter() {
            if let Some(old_state) = self.keyboard_inputs_old.get_mut(key) {
                *old_state = *new_state;
            }
        }

        for (button, new_state) in self.mouse_inputs.mouse_button_inputs_new.iter() {
            if let Some(old_state) = self.mouse_inputs.mouse_button_inputs_old.get_mut(button) {
                *old_state = *new_state;
            }
        }
    }

    /// Processes a window event and updates internal input state.
    ///
    /// # Arguments
    /// * `event` - The window event to process
    pub fn intake_input(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state,
                        physical_key: PhysicalKey::Code(key),
                        ..
                    },
                ..
            } => {
                if let Some(key_state) = self.keyboard_inputs_new.get_mut(key) {
                    *key_state = *state == ElementState::Pressed;
                }
            }
            WindowEvent::MouseInput { button, state, .. } => {
                if let Some(button_state) =
                    self.mouse_inputs.mouse_button_inputs_new.get_mut(button)
                {
                    *button_state = *state == ElementState::Pressed;
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse_inputs.cursor_position = Some((position.x, position.y));
            }
            _ => {}
        }
    }

    /// Creates a processed input state from the current raw boolean states.
    pub fn create_processed_input_state(&mut self) -> ProcessedInputState {
        let mut keyboard_states = HashMap::new();
        let mut mouse_button_states = HashMap::new();

        for (key, &new_state) in self.keyboard_inputs_new.iter() {
            let old_state = self.keyboard_inputs_old.get(key).copied().unwrap_or(false);
            keyboard_states.insert(*key, RawInputState::from_raw_states(old_state, new_state));
        }

        for (button, &new_state) in self.mouse_inputs.mouse_button_inputs_new.iter() {
            let old_state = self
                .mouse_inputs
                .mouse_button_inputs_old
                .get(button)
                .copied()
                .unwrap_or(false);
            mouse_button_states.insert(*button, RawInputState::from_raw_states(old_state, new_state));
        }

        ProcessedInputState {
            keyboard_states,
            mouse_button_states,
            cursor_position: self.mouse_inputs.cursor_position,
        }
    }

    /// Returns the processed input state and rolls the states forward for
    /// the next frame.
    pub fn get_and_reset_processed_input(&mut self) -> Option<ProcessedInputState> {
        let processed_input = Some(self.create_processed_input_state());
        self.move_old_states();
        processed_input
    }

    /// Releases every key and button.
    ///
    /// Called when the window loses focus so nothing stays stuck down; the
    /// next processed state reports one `Released` transition per held input.
    /// The cursor position is kept since the cursor has not moved.
    pub fn reset_inputs(&mut self) {
        for state in self.keyboard_inputs_new.values_mut() {
            *state = false;
        }
        for state in self.mouse_inputs.mouse_button_inputs_new.values_mut() {
            *state = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_position_persists_across_frames() {
        let mut manager = InputManager::new();
        manager.mouse_inputs.cursor_position = Some((320.0, 240.0));

        let first = manager.get_and_reset_processed_input().unwrap();
        assert_eq!(first.get_cursor_position(), Some((320.0, 240.0)));

        let second = manager.get_and_reset_processed_input().unwrap();
        assert_eq!(second.get_cursor_position(), Some((320.0, 240.0)));
    }

    #[test]
    fn focus_loss_releases_held_keys() {
        let mut manager = InputManager::new();
        manager.keyboard_inputs_new.insert(KeyCode::Space, true);
        manager.move_old_states();

        manager.reset_inputs();
        let processed = manager.get_and_reset_processed_input().unwrap();
        assert_eq!(
            processed.get_key_state(KeyCode::Space),
            RawInputState::Released
        );

        let next = manager.get_and_reset_processed_input().unwrap();
        assert_eq!(
            next.get_key_state(KeyCode::Space),
            RawInputState::NotPressed
        );
    }
}
