use human_panic::{metadata, setup_panic};
use log::error;
use mixcost::cli::run_cli;
use mixcost::log::is_logger_initialised;

fn main() {
    setup_panic!(metadata!().support("Open an issue on the project's issue tracker."));

    if let Err(err) = run_cli() {
        if is_logger_initialised() {
            error!("{err:?}");
        } else {
            eprintln!("Error: {err:?}");
        }

        std::process::exit(1);
    }
}
