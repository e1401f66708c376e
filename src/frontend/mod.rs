//! Frontend collaborators: terminal drawing, keyboard input, audio cues
//!
//! Presentation resources are built once into [`Resources`]; the simulation
//! never sees them.

pub mod audio;
pub mod terminal;

pub use audio::AudioManager;
pub use terminal::{KeyboardInput, TerminalRenderer, TerminalSession};

use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Blend toward `b` by `t_256 / 256`
    pub const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }
}

/// Colors for every sprite kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub sky_top: Rgb,
    pub sky_bottom: Rgb,
    pub pipe: Rgb,
    pub pipe_edge: Rgb,
    pub ground: Rgb,
    pub grass: Rgb,
    pub actor: Rgb,
    /// Wing color per animation frame
    pub wing: [Rgb; 3],
    pub beak: Rgb,
    pub text: Rgb,
    pub shadow: Rgb,
    pub letterbox: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            sky_top: Rgb(70, 180, 200),
            sky_bottom: Rgb(190, 232, 245),
            pipe: Rgb(100, 170, 40),
            pipe_edge: Rgb(60, 100, 20),
            ground: Rgb(210, 185, 110),
            grass: Rgb(84, 168, 55),
            actor: Rgb(245, 200, 66),
            wing: [Rgb(255, 225, 100), Rgb(215, 165, 35), Rgb(185, 135, 20)],
            beak: Rgb(225, 75, 35),
            text: Rgb(255, 255, 255),
            shadow: Rgb(30, 30, 30),
            letterbox: Rgb(0, 0, 0),
        }
    }
}

impl Palette {
    pub fn high_contrast() -> Self {
        Self {
            sky_top: Rgb(0, 0, 0),
            sky_bottom: Rgb(0, 0, 40),
            pipe: Rgb(0, 255, 0),
            pipe_edge: Rgb(255, 255, 255),
            ground: Rgb(255, 255, 255),
            grass: Rgb(200, 200, 200),
            actor: Rgb(255, 255, 0),
            wing: [Rgb(255, 128, 0), Rgb(255, 96, 0), Rgb(255, 64, 0)],
            beak: Rgb(255, 0, 0),
            text: Rgb(255, 255, 255),
            shadow: Rgb(0, 0, 0),
            letterbox: Rgb(40, 40, 40),
        }
    }
}

/// Presentation bundle handed to the renderer
#[derive(Debug, Clone)]
pub struct Resources {
    pub palette: Palette,
    pub show_fps: bool,
}

impl Resources {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            palette: if settings.high_contrast {
                Palette::high_contrast()
            } else {
                Palette::default()
            },
            show_fps: settings.show_fps,
        }
    }
}
