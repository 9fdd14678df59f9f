use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Keys the game modes react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Escape,
    Other,
}

/// Pointer buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
    Other,
}

/// Discrete input delivered to a mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    /// Press at window pixel coordinates, origin top-left
    PointerDown { button: PointerButton, x: f32, y: f32 },
}

/// Turns winit window events into [`InputEvent`]s
///
/// winit reports mouse buttons without a position, so the adapter keeps the
/// last cursor position it has seen.
#[derive(Debug, Clone, Default)]
pub struct InputAdapter {
    cursor: Option<(f32, f32)>,
}

impl InputAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known cursor position in physical pixels
    pub fn cursor(&self) -> Option<(f32, f32)> {
        self.cursor
    }

    /// Feed one window event; returns the press it represents, if any
    pub fn process_event(&mut self, event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                match event.physical_key {
                    PhysicalKey::Code(keycode) => Some(InputEvent::KeyDown(Self::map_key(keycode))),
                    PhysicalKey::Unidentified(_) => Some(InputEvent::KeyDown(Key::Other)),
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button,
                ..
            } => {
                let (x, y) = self.cursor?;
                Some(InputEvent::PointerDown {
                    button: Self::map_button(*button),
                    x,
                    y,
                })
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Some((position.x as f32, position.y as f32));
                None
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                None
            }
            _ => None,
        }
    }

    pub fn map_key(keycode: KeyCode) -> Key {
        match keycode {
            KeyCode::ArrowLeft => Key::Left,
            KeyCode::ArrowRight => Key::Right,
            KeyCode::Escape => Key::Escape,
            _ => Key::Other,
        }
    }

    pub fn map_button(button: MouseButton) -> PointerButton {
        match button {
            MouseButton::Left => PointerButton::Primary,
            MouseButton::Right => PointerButton::Secondary,
            _ => PointerButton::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::event::DeviceId;

    // KeyEvent has private fields, so keyboard events can't be built here;
    // key mapping is covered through map_key instead.

    #[test]
    fn test_arrow_keys_map_to_camera_keys() {
        assert_eq!(InputAdapter::map_key(KeyCode::ArrowLeft), Key::Left);
        assert_eq!(InputAdapter::map_key(KeyCode::ArrowRight), Key::Right);
        assert_eq!(InputAdapter::map_key(KeyCode::Escape), Key::Escape);
        assert_eq!(InputAdapter::map_key(KeyCode::KeyA), Key::Other);
    }

    #[test]
    fn test_mouse_buttons() {
        assert_eq!(InputAdapter::map_button(MouseButton::Left), PointerButton::Primary);
        assert_eq!(InputAdapter::map_button(MouseButton::Right), PointerButton::Secondary);
        assert_eq!(InputAdapter::map_button(MouseButton::Middle), PointerButton::Other);
    }

    #[test]
    fn test_click_uses_last_cursor_position() {
        let mut adapter = InputAdapter::new();
        let device_id = unsafe { DeviceId::dummy() };

        let press = WindowEvent::MouseInput {
            device_id,
            state: ElementState::Pressed,
            button: MouseButton::Left,
        };
        assert_eq!(adapter.process_event(&press), None);

        let moved = WindowEvent::CursorMoved {
            device_id,
            position: winit::dpi::PhysicalPosition::new(120.0, 45.5),
        };
        assert_eq!(adapter.process_event(&moved), None);
        assert_eq!(adapter.cursor(), Some((120.0, 45.5)));

        assert_eq!(
            adapter.process_event(&press),
            Some(InputEvent::PointerDown {
                button: PointerButton::Primary,
                x: 120.0,
                y: 45.5
            })
        );
    }

    #[test]
    fn test_release_is_ignored() {
        let mut adapter = InputAdapter::new();
        let device_id = unsafe { DeviceId::dummy() };
        adapter.process_event(&WindowEvent::CursorMoved {
            device_id,
            position: winit::dpi::PhysicalPosition::new(1.0, 1.0),
        });

        let release = WindowEvent::MouseInput {
            device_id,
            state: ElementState::Released,
            button: MouseButton::Left,
        };
        assert_eq!(adapter.process_event(&release), None);
    }
}
