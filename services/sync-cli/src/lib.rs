mod cli;
mod sync;

use agency_sync::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
