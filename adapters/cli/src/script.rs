//! Scripted input feed that stands in for a keyboard.

use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use cabin_chase_core::Command;
use glam::Vec2;
use serde::Deserialize;

/// Ordered list of input steps, each held for a number of frames.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub(crate) struct InputScript {
    #[serde(default, rename = "step")]
    steps: Vec<ScriptStep>,
}

/// Keys held during a step; toggles and `start` fire on its first frame only.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub(crate) struct ScriptStep {
    frames: u32,
    move_x: f32,
    move_z: f32,
    toggle_crouch: bool,
    toggle_camera: bool,
    start: bool,
}

impl Default for ScriptStep {
    fn default() -> Self {
        Self {
            frames: 1,
            move_x: 0.0,
            move_z: 0.0,
            toggle_crouch: false,
            toggle_camera: false,
            start: false,
        }
    }
}

impl InputScript {
    /// Script used without `--script`: press start and stand still.
    pub(crate) fn idle() -> Self {
        Self {
            steps: vec![ScriptStep {
                start: true,
                ..ScriptStep::default()
            }],
        }
    }

    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read input script at {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid input script in {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let script: Self =
            toml::from_str(contents).context("failed to parse input script toml contents")?;
        for (index, step) in script.steps.iter().enumerate() {
            if step.frames == 0 {
                bail!("input step {index} must last at least one frame");
            }
            if !(step.move_x.is_finite() && step.move_z.is_finite()) {
                bail!("input step {index} has a non-finite movement direction");
            }
        }
        Ok(script)
    }

    pub(crate) fn cursor(&self) -> ScriptCursor<'_> {
        ScriptCursor {
            steps: &self.steps,
            index: 0,
            frame: 0,
        }
    }
}

/// Walks a script frame by frame; once exhausted it yields no input.
#[derive(Debug)]
pub(crate) struct ScriptCursor<'a> {
    steps: &'a [ScriptStep],
    index: usize,
    frame: u32,
}

impl ScriptCursor<'_> {
    /// Commands for the next frame; movement covers `speed * dt` units.
    pub(crate) fn next_frame(&mut self, speed: f32, dt: Duration) -> Vec<Command> {
        let Some(step) = self.steps.get(self.index) else {
            return Vec::new();
        };

        let mut commands = Vec::new();
        if self.frame == 0 {
            if step.start {
                commands.push(Command::StartSession);
            }
            if step.toggle_crouch {
                commands.push(Command::ToggleCrouch);
            }
            if step.toggle_camera {
                commands.push(Command::ToggleCameraMode);
            }
        }

        let direction = Vec2::new(step.move_x, step.move_z).normalize_or_zero();
        if direction != Vec2::ZERO {
            commands.push(Command::MovePlayer {
                delta: direction * speed * dt.as_secs_f32(),
            });
        }

        self.frame += 1;
        if self.frame >= step.frames {
            self.index += 1;
            self.frame = 0;
        }
        commands
    }
}
