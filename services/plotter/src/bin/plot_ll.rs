//! Plot surface winds over surface pressure for every time in a lat/lon file.

use anyhow::Result;
use clap::Parser;
use tracing::info;

use plotter::config::LatLonArgs;
use plotter::latlon::LatLonPlotter;
use plotter::{logging, open_input, EXIT_INPUT_ERROR, FILE_NOT_FOUND_MSG};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = LatLonArgs::parse();
    logging::init(&args.logging)?;

    let Some(ds) = open_input(&args.file)? else {
        println!("{}", FILE_NOT_FOUND_MSG);
        std::process::exit(EXIT_INPUT_ERROR);
    };

    let plotter = LatLonPlotter::new(args.resolve()?)?;
    info!(file = %args.file.display(), "Plotting lat/lon file");

    let written = plotter.run(&ds)?;
    info!(plots = written.len(), "Done");
    Ok(())
}
