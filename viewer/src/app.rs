//! Window, event loop and key bindings
//!
//! Window events are translated into core [`InputEvent`]s and applied to the
//! [`FrameDriver`] between frames. Frames are drawn continuously.
//!
//! # Keyboard
//!
//! - Space: start/stop walking
//! - N: toggle normal coloring
//! - L: toggle lights
//! - O: toggle light orbit
//! - R: reset pose
//! - Tab / Shift+Tab: select the next/previous joint
//! - Up / Down: bend the selected joint by 5 degrees
//! - X / Y / Z: select a light axis, then + / - to move the light
//! - Esc: quit
//!
//! Drag with the left button to orbit the camera; shift-click to poke.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use glam::Vec2;
use kennel_core::{Config, FrameDriver, InputEvent, Joint, LightAxis, SceneState};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::graphics::{Graphics, InitError, RenderOutcome};

/// Degrees per Up/Down press
const JOINT_STEP: f32 = 5.0;
/// World units per +/- press
const LIGHT_STEP: f32 = 0.25;

/// Keyboard selection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    /// Index into [`Joint::ALL`]
    selected: usize,
    light_axis: LightAxis,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            selected: 0,
            light_axis: LightAxis::Y,
        }
    }
}

impl Controls {
    pub fn selected_joint(&self) -> Joint {
        Joint::ALL[self.selected]
    }

    /// Translate a key press into a scene command
    ///
    /// Selection keys only update `self` and return `None`. `repeat` is set
    /// for auto-repeated presses, which only the nudge keys honour.
    pub fn on_key(
        &mut self,
        code: KeyCode,
        shift: bool,
        repeat: bool,
        scene: &SceneState,
    ) -> Option<InputEvent> {
        let nudge = match code {
            KeyCode::ArrowUp => Some(JOINT_STEP),
            KeyCode::ArrowDown => Some(-JOINT_STEP),
            _ => None,
        };
        if let Some(step) = nudge {
            let joint = self.selected_joint();
            return Some(InputEvent::SetJoint {
                joint,
                degrees: scene.angles.get(joint) + step,
            });
        }

        let light_step = match code {
            KeyCode::Equal | KeyCode::NumpadAdd => Some(LIGHT_STEP),
            KeyCode::Minus | KeyCode::NumpadSubtract => Some(-LIGHT_STEP),
            _ => None,
        };
        if let Some(step) = light_step {
            let point = scene.lights.point;
            let current = match self.light_axis {
                LightAxis::X => point.x,
                LightAxis::Y => point.y,
                LightAxis::Z => point.z,
            };
            return Some(InputEvent::SetLightAxis {
                axis: self.light_axis,
                value: current + step,
            });
        }

        if repeat {
            return None;
        }

        match code {
            KeyCode::Space => Some(if scene.animator.is_locomotion_active() {
                InputEvent::StopLocomotion
            } else {
                InputEvent::StartLocomotion
            }),
            KeyCode::KeyN => Some(InputEvent::SetNormalDebug(!scene.normal_debug)),
            KeyCode::KeyL => Some(InputEvent::SetLighting(!scene.lights.enabled)),
            KeyCode::KeyO => Some(InputEvent::SetLightOrbit(!scene.lights.orbit)),
            KeyCode::KeyR => Some(InputEvent::ResetPose),
            KeyCode::Tab => {
                let count = Joint::ALL.len();
                self.selected = if shift {
                    (self.selected + count - 1) % count
                } else {
                    (self.selected + 1) % count
                };
                None
            }
            KeyCode::KeyX => {
                self.light_axis = LightAxis::X;
                None
            }
            KeyCode::KeyY => {
                self.light_axis = LightAxis::Y;
                None
            }
            KeyCode::KeyZ => {
                self.light_axis = LightAxis::Z;
                None
            }
            _ => None,
        }
    }
}

pub struct KennelApp {
    config: Config,
    window: Option<Arc<Window>>,
    graphics: Option<Graphics>,
    driver: FrameDriver,
    controls: Controls,
    start: Instant,
    shift: bool,
    cursor: Vec2,
    fps: u32,
    init_error: Option<InitError>,
}

impl KennelApp {
    pub fn new(config: Config) -> Self {
        let driver = FrameDriver::from_config(&config);
        Self {
            config,
            window: None,
            graphics: None,
            driver,
            controls: Controls::default(),
            start: Instant::now(),
            shift: false,
            cursor: Vec2::ZERO,
            fps: 0,
            init_error: None,
        }
    }

    /// Seconds since program start
    fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    fn apply(&mut self, event: InputEvent) {
        let now = self.now();
        self.driver.handle_input(event, now);
    }

    fn update_title(&self) {
        let Some(window) = &self.window else {
            return;
        };
        let joint = self.controls.selected_joint();
        let axis = self.controls.light_axis;
        window.set_title(&format!(
            "Kennel - {} fps - {}: {:.0} deg - light {:?}",
            self.fps,
            joint,
            self.driver.scene.angles.get(joint),
            axis
        ));
    }

    fn on_keyboard(&mut self, event: &KeyEvent, event_loop: &ActiveEventLoop) {
        if event.state != ElementState::Pressed {
            return;
        }
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        if code == KeyCode::Escape {
            event_loop.exit();
            return;
        }

        let command = self
            .controls
            .on_key(code, self.shift, event.repeat, &self.driver.scene);
        if let Some(command) = command {
            self.apply(command);
        }
        self.update_title();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = self.now();
        let Some(graphics) = self.graphics.as_mut() else {
            return;
        };

        match graphics.render(&mut self.driver, now) {
            Ok(RenderOutcome::Presented(stats)) => {
                if let Some(fps) = stats.fps {
                    self.fps = fps;
                    self.update_title();
                }
            }
            Ok(RenderOutcome::Reconfigured | RenderOutcome::Skipped) => {}
            Err(e) => {
                tracing::error!("Render error: {}", e);
                event_loop.exit();
            }
        }
    }
}

impl ApplicationHandler for KennelApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title("Kennel")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        match Graphics::new(window.clone(), self.config.window.vsync) {
            Ok(graphics) => {
                self.graphics = Some(graphics);
                self.window = Some(window);
                self.update_title();
            }
            Err(e) => {
                self.init_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Window close requested");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(graphics) = self.graphics.as_mut() {
                    graphics.resize(size.width, size.height);
                }
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.shift = modifiers.state().shift_key();
            }
            WindowEvent::KeyboardInput { event, .. } => self.on_keyboard(&event, event_loop),
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Vec2::new(position.x as f32, position.y as f32);
                self.apply(InputEvent::PointerMove {
                    position: self.cursor,
                });
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let event = match state {
                    ElementState::Pressed => InputEvent::PointerPress {
                        position: self.cursor,
                        shift: self.shift,
                    },
                    ElementState::Released => InputEvent::PointerRelease,
                };
                self.apply(event);
            }
            WindowEvent::CursorLeft { .. } => self.apply(InputEvent::PointerLeave),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Open the window and run until it closes
pub fn run(config: Config) -> Result<()> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let mut app = KennelApp::new(config);
    event_loop.run_app(&mut app).context("Event loop failed")?;

    if let Some(e) = app.init_error.take() {
        return Err(anyhow::Error::new(e).context("Failed to initialize graphics"));
    }
    Ok(())
}
