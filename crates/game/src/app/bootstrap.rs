use std::path::PathBuf;

use engine::{LoopConfig, RoomId};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

pub(crate) const DEFAULT_SCRIPT_FILE: &str = "demo.json";
const DEFAULT_START_ROOM: &str = "living-room";

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    /// Falls back to `<scripts_dir>/demo.json` when absent.
    pub(crate) script_path: Option<PathBuf>,
}

pub(crate) fn build_app(args: impl IntoIterator<Item = String>) -> AppWiring {
    init_tracing();
    info!("=== Tilewalk Startup ===");
    wire_from_args(args)
}

fn wire_from_args(args: impl IntoIterator<Item = String>) -> AppWiring {
    let mut config = LoopConfig {
        start_room: Some(RoomId::new(DEFAULT_START_ROOM)),
        ..LoopConfig::default()
    };
    let mut script_path = None;
    for arg in args {
        match arg.as_str() {
            "--realtime" => config.realtime = true,
            flag if flag.starts_with("--") => warn!(flag, "unknown_flag_ignored"),
            path => script_path = Some(PathBuf::from(path)),
        }
    }
    AppWiring {
        config,
        script_path,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn no_args_uses_defaults() {
        let wiring = wire_from_args(args(&[]));
        assert!(!wiring.config.realtime);
        assert!(wiring.script_path.is_none());
        assert_eq!(wiring.config.start_room, Some(RoomId::new("living-room")));
    }

    #[test]
    fn realtime_flag_and_script_path_are_read() {
        let wiring = wire_from_args(args(&["--realtime", "scripts/walk.json"]));
        assert!(wiring.config.realtime);
        assert_eq!(wiring.script_path, Some(PathBuf::from("scripts/walk.json")));
    }

    #[test]
    fn unknown_flags_are_ignored() {
        let wiring = wire_from_args(args(&["--fast"]));
        assert!(!wiring.config.realtime);
        assert!(wiring.script_path.is_none());
    }
}
