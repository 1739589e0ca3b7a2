//! Plot an MPAS cell field on its mesh for a set of levels and times.

use anyhow::Result;
use clap::Parser;
use tracing::info;

use plotter::config::MeshArgs;
use plotter::mesh::MeshPlotter;
use plotter::{
    logging, open_input, EXIT_INPUT_ERROR, FILE_NOT_FOUND_MSG, VARIABLE_NOT_FOUND_MSG,
};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = MeshArgs::parse();
    logging::init(&args.logging)?;
    let cfg = args.resolve()?;

    let Some(ds) = open_input(&args.file)? else {
        println!("{}", FILE_NOT_FOUND_MSG);
        std::process::exit(EXIT_INPUT_ERROR);
    };
    if !ds.has_variable(&cfg.variable) {
        println!("{}", VARIABLE_NOT_FOUND_MSG);
        std::process::exit(EXIT_INPUT_ERROR);
    }

    info!(file = %args.file.display(), variable = %cfg.variable, "Plotting MPAS mesh");
    let plotter = MeshPlotter::new(cfg)?;
    let written = plotter.run(&ds)?;
    info!(plots = written.len(), "Done");
    Ok(())
}
