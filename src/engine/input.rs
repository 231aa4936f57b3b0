use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Scancode;
use sdl2::EventPump;
use std::collections::HashSet;

/// Keyboard and mouse state gathered once per frame.
pub struct InputState {
    held: HashSet<Scancode>,
    pressed: HashSet<Scancode>,
    pub mouse_dx: f32,
    pub mouse_dy: f32,
    pub resized: bool,
    quit: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            pressed: HashSet::new(),
            mouse_dx: 0.0,
            mouse_dy: 0.0,
            resized: false,
            quit: false,
        }
    }

    pub fn update(&mut self, event_pump: &mut EventPump) {
        self.begin_frame();
        for event in event_pump.poll_iter() {
            self.handle(event);
        }
    }

    fn begin_frame(&mut self) {
        self.mouse_dx = 0.0;
        self.mouse_dy = 0.0;
        self.resized = false;
        self.pressed.clear();
    }

    fn handle(&mut self, event: Event) {
        match event {
            Event::Quit { .. } => self.quit = true,
            Event::KeyDown {
                scancode: Some(Scancode::Escape),
                ..
            } => self.quit = true,
            Event::KeyDown {
                scancode: Some(sc),
                repeat,
                ..
            } => {
                if !repeat {
                    self.pressed.insert(sc);
                }
                self.held.insert(sc);
            }
            Event::KeyUp {
                scancode: Some(sc), ..
            } => {
                self.held.remove(&sc);
            }
            Event::MouseMotion { xrel, yrel, .. } => {
                self.mouse_dx += xrel as f32;
                self.mouse_dy += yrel as f32;
            }
            Event::Window {
                win_event: WindowEvent::SizeChanged(..),
                ..
            } => self.resized = true,
            _ => {}
        }
    }

    pub fn is_key_held(&self, sc: Scancode) -> bool {
        self.held.contains(&sc)
    }

    /// True only on the frame the key went down.
    pub fn was_pressed(&self, sc: Scancode) -> bool {
        self.pressed.contains(&sc)
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_down(sc: Scancode, repeat: bool) -> Event {
        Event::KeyDown {
            timestamp: 0,
            window_id: 0,
            keycode: None,
            scancode: Some(sc),
            keymod: sdl2::keyboard::Mod::NOMOD,
            repeat,
        }
    }

    #[test]
    fn press_lasts_one_frame_hold_persists() {
        let mut input = InputState::new();
        input.handle(key_down(Scancode::F, false));
        assert!(input.was_pressed(Scancode::F));
        assert!(input.is_key_held(Scancode::F));

        input.begin_frame();
        input.handle(key_down(Scancode::F, true));
        assert!(!input.was_pressed(Scancode::F));
        assert!(input.is_key_held(Scancode::F));
    }

    #[test]
    fn escape_requests_quit() {
        let mut input = InputState::new();
        input.handle(key_down(Scancode::Escape, false));
        assert!(input.should_quit());
    }

    #[test]
    fn mouse_motion_accumulates() {
        let mut input = InputState::new();
        for _ in 0..3 {
            input.handle(Event::MouseMotion {
                timestamp: 0,
                window_id: 0,
                which: 0,
                mousestate: sdl2::mouse::MouseState::from_sdl_state(0),
                x: 0,
                y: 0,
                xrel: 2,
                yrel: -1,
            });
        }
        assert_eq!((input.mouse_dx, input.mouse_dy), (6.0, -3.0));
    }
}
