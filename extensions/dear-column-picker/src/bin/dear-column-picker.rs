//! Stand-alone column picker: prints the chosen path on stdout.
//!
//! Exits 0 after a path is committed, 1 when the session cannot start
//! (favorites unreadable), the window fails or is closed without a choice.

use std::process::ExitCode;

use dear_app::{AddOnsConfig, RunnerConfig, run};
use dear_column_picker::{ColumnPickerExt, ColumnPickerState, NavigationController, PickerConfig};

fn main() -> ExitCode {
    dear_imgui_rs::logging::init_tracing_with_filter("dear_column_picker=info,wgpu=warn");

    let controller = match NavigationController::start_local(PickerConfig::new()) {
        Ok(controller) => controller,
        Err(err) => {
            eprintln!("dear-column-picker: {err}");
            return ExitCode::FAILURE;
        }
    };
    let mut state = ColumnPickerState::new(controller);

    let runner = RunnerConfig {
        window_title: "Pick a file".to_string(),
        window_size: (960.0, 560.0),
        ini_filename: None,
        ..Default::default()
    };

    let result = run(runner, AddOnsConfig::default(), move |ui, _addons| {
        if let Some(path) = ui.column_picker().show(&mut state) {
            println!("{}", path.display());
            // The runner has no in-frame exit; the session ends with the commit.
            std::process::exit(0);
        }
    });

    match result {
        Ok(()) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("dear-column-picker: {err}");
            ExitCode::FAILURE
        }
    }
}
