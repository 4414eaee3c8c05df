//! Binary entry point: load settings, start file logging, open the SQLite
//! store and drive the Ratatui event loop until the user exits.
use anyhow::Context;
use student_management::logging::init_tracing;
use student_management::{open_database, run_app, App, AppConfig};
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config.log_path()?)?;

    let db_path = config.database_path()?;
    info!(path = %db_path.display(), "starting student management");
    let conn = open_database(&db_path)?;

    let mut app = App::new(conn, config.courses.clone())?;
    let result = run_app(&mut app);
    if let Err(err) = &result {
        error!(error = %err, "application exited with an error");
    }
    result
}
