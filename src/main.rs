extern crate broadsheet;

use broadsheet::{logger, setup_rocket};

fn main() {
    dotenv::dotenv().ok();
    logger::setup_logging(logger::level_from_env(log::LevelFilter::Info))
        .expect("failed to initialize logging");
    setup_rocket::setup_rocket().launch();
}
