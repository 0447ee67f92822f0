use std::process::ExitCode;

mod app;

fn main() -> ExitCode {
    let wiring = app::bootstrap::build_app(std::env::args().skip(1));
    app::loop_runner::run(wiring)
}
