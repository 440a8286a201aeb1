use mazetrace::{app, config::Config, logging};

fn main() -> std::io::Result<()> {
    // Dropping the guard flushes the log file, so it lives until exit
    let _log_guard = logging::init(&Config::log_dir_from_env())?;
    let config = Config::from_env();
    tracing::info!(rows = config.rows, cols = config.cols, speed = %config.speed, "Starting mazetrace");

    let mut stdout = std::io::stdout();
    app::run(&mut stdout, config)
}
