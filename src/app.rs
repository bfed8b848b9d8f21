// ============================================================================
// app.rs — ArcadeKit
// Key probe: a bare winit window that advances one frame per loop iteration and
// logs the press pulses the tracker reports.
// ============================================================================

use std::sync::Arc;
use std::time::{Duration, Instant};

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow},
    keyboard::KeyCode,
    window::{Window, WindowAttributes, WindowId},
};

use crate::input::KeyStateTracker;
use crate::keys::{KeyMap, LogicalKey};
use crate::platform;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// One `Key: code, code` entry per logical key, e.g. `Up: ArrowUp, KeyW`.
pub fn binding_summary(map: &KeyMap<KeyCode>) -> Vec<String> {
    LogicalKey::ALL
        .into_iter()
        .map(|key| {
            let mut codes: Vec<String> = map.codes_for(key).map(|c| format!("{:?}", c)).collect();
            codes.sort();
            let codes = if codes.is_empty() {
                String::from("(unbound)")
            } else {
                codes.join(", ")
            };
            format!("{}: {}", key.name(), codes)
        })
        .collect()
}

// ======================== Application ========================

pub struct ProbeApp {
    tracker: Arc<KeyStateTracker<KeyCode>>,
    window: Option<Window>,
    frame: u64,
    started: Instant,
    error: Option<String>,
}

impl ProbeApp {
    pub fn new(tracker: Arc<KeyStateTracker<KeyCode>>) -> Self {
        Self {
            tracker,
            window: None,
            frame: 0,
            started: Instant::now(),
            error: None,
        }
    }

    /// Failure that ended the event loop, if any.
    pub fn take_error(&mut self) -> Option<String> {
        self.error.take()
    }

    fn step_frame(&mut self, event_loop: &ActiveEventLoop) {
        let frame = self.tracker.advance_frame();
        self.frame += 1;

        for key in frame.just_pressed_keys() {
            let held: Vec<&str> = frame.pressed_keys().map(|k| k.name()).collect();
            log::info!(
                "frame {} (+{:.2}s): {} pressed | held [{}]",
                self.frame,
                self.started.elapsed().as_secs_f64(),
                key.name(),
                held.join(", ")
            );
        }

        if frame.is_just_pressed(LogicalKey::Cancel) {
            log::info!("Cancel pressed; closing probe after {} frames", self.frame);
            event_loop.exit();
        }
    }
}

impl ApplicationHandler for ProbeApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = WindowAttributes::default()
            .with_title("ArcadeKit — key probe")
            .with_inner_size(winit::dpi::LogicalSize::new(480u32, 240u32));

        match event_loop.create_window(window_attrs) {
            Ok(window) => {
                log::info!(
                    "Key probe ready: {} bindings, press Cancel to quit",
                    self.tracker.key_map().len()
                );
                for line in binding_summary(self.tracker.key_map()) {
                    log::info!("  {}", line);
                }
                self.window = Some(window);
            }
            Err(e) => {
                self.error = Some(format!("Failed to create probe window: {}", e));
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::KeyboardInput { event, .. } => {
                if platform::apply_key_event(&self.tracker, &event).is_none() {
                    log::debug!("Unbound key: {:?}", event.physical_key);
                }
            }

            WindowEvent::Focused(focused) => {
                platform::apply_focus_change(&self.tracker, focused);
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            self.step_frame(event_loop);
            event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + FRAME_INTERVAL));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeyBindings;

    #[test]
    fn test_binding_summary_lists_every_key() {
        let bindings = KeyBindings {
            up: vec![KeyCode::KeyW, KeyCode::ArrowUp],
            cancel: vec![],
            ..KeyBindings::default()
        };
        let summary = binding_summary(&bindings.to_key_map().unwrap());

        assert_eq!(summary.len(), LogicalKey::COUNT);
        assert_eq!(summary[0], "Up: ArrowUp, KeyW");
        assert_eq!(summary[4], "Confirm: Enter");
        assert_eq!(summary[5], "Cancel: (unbound)");
    }
}
