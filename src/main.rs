use std::process::ExitCode;

fn main() -> ExitCode {
    match fossil_age::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "fossil exited with an error");
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
