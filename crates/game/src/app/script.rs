use std::fs;
use std::path::Path;

use engine::{InputAction, InputSnapshot, InputSource};
use serde::Deserialize;

/// One entry of an input script: hold `actions` for `frames` frames.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScriptStep {
    #[serde(default = "default_step_frames")]
    frames: u32,
    #[serde(default)]
    actions: Vec<String>,
}

fn default_step_frames() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq)]
struct ParsedStep {
    frames: u32,
    actions: Vec<InputAction>,
}

/// Scripted stand-in for a keyboard.
///
/// Movement actions are held for every frame of their step. Path requests,
/// debug toggles and quit are commands, so they are reported only on a
/// step's first frame.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct InputScript {
    steps: Vec<ParsedStep>,
    step: usize,
    frame_in_step: u32,
}

impl InputScript {
    pub(crate) fn total_frames(&self) -> u64 {
        self.steps.iter().map(|step| u64::from(step.frames)).sum()
    }
}

impl InputSource for InputScript {
    fn next_frame(&mut self) -> Option<InputSnapshot> {
        while let Some(step) = self.steps.get(self.step) {
            if self.frame_in_step >= step.frames {
                self.step += 1;
                self.frame_in_step = 0;
                continue;
            }

            let first_frame = self.frame_in_step == 0;
            self.frame_in_step += 1;
            let snapshot = step
                .actions
                .iter()
                .filter(|action| first_frame || !is_command(**action))
                .fold(InputSnapshot::empty(), |snapshot, action| {
                    snapshot.with_action_down(*action, true)
                });
            return Some(snapshot);
        }
        None
    }
}

fn is_command(action: InputAction) -> bool {
    matches!(
        action,
        InputAction::RequestPath | InputAction::ToggleDebug | InputAction::Quit
    )
}

pub(crate) fn load_input_script(path: &Path) -> Result<InputScript, String> {
    let raw = fs::read_to_string(path)
        .map_err(|error| format!("read script {}: {error}", path.display()))?;
    parse_input_script(&raw).map_err(|error| format!("{}: {error}", path.display()))
}

pub(crate) fn parse_input_script(raw: &str) -> Result<InputScript, String> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let steps = match serde_path_to_error::deserialize::<_, Vec<ScriptStep>>(&mut deserializer) {
        Ok(steps) => steps,
        Err(error) => {
            let path = error.path().to_string();
            let source = error.into_inner();
            return if path.is_empty() || path == "." {
                Err(format!("parse script json: {source}"))
            } else {
                Err(format!("parse script json at {path}: {source}"))
            };
        }
    };

    let steps = steps
        .into_iter()
        .enumerate()
        .map(|(index, step)| {
            let actions = step
                .actions
                .iter()
                .map(|token| {
                    InputAction::from_token(token)
                        .ok_or_else(|| format!("step {index}: unknown action '{token}'"))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ParsedStep {
                frames: step.frames,
                actions,
            })
        })
        .collect::<Result<Vec<_>, String>>()?;

    Ok(InputScript {
        steps,
        step: 0,
        frame_in_step: 0,
    })
}
