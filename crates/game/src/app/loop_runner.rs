use std::path::PathBuf;
use std::process::ExitCode;

use engine::{resolve_app_paths, run_app};
use tracing::{error, info};

use super::bootstrap::{AppWiring, DEFAULT_SCRIPT_FILE};
use super::script::load_input_script;

pub(crate) fn run(app: AppWiring) -> ExitCode {
    let script_path = match resolve_script_path(app.script_path) {
        Ok(path) => path,
        Err(err) => {
            error!(error = %err, "startup_failed");
            return ExitCode::FAILURE;
        }
    };
    let mut script = match load_input_script(&script_path) {
        Ok(script) => script,
        Err(err) => {
            error!(error = %err, "script_load_failed");
            return ExitCode::FAILURE;
        }
    };
    info!(
        script = %script_path.display(),
        frames = script.total_frames(),
        "script_loaded"
    );

    match run_app(app.config, &mut script) {
        Ok(summary) => {
            let last_metrics = summary.last_metrics.unwrap_or_default();
            info!(
                frames = summary.frames,
                transitions = summary.transitions,
                paths_found = summary.paths_found,
                room = %summary.final_room,
                fps = last_metrics.fps,
                tps = last_metrics.tps,
                frame_time_ms = last_metrics.frame_time_ms,
                "run_finished"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "startup_failed");
            ExitCode::FAILURE
        }
    }
}

fn resolve_script_path(explicit: Option<PathBuf>) -> Result<PathBuf, engine::StartupError> {
    match explicit {
        Some(path) => Ok(path),
        None => Ok(resolve_app_paths()?.scripts_dir.join(DEFAULT_SCRIPT_FILE)),
    }
}
