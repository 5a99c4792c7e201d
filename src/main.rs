use anyhow::Result;
use lipo_cell_sim::{config, simulation, telemetry};
use config::{Config, OutputFormat};
use simulation::RunSummary;
use telemetry::init_tracing;
use tracing::{info, warn};

fn main() -> Result<()> {
    init_tracing();

    let cfg = Config::load()?;
    let mut sim = cfg.build_simulator()?;

    info!(
        capacity_ah = cfg.cell.capacity_ah,
        initial_soc = cfg.cell.initial_soc,
        initial_temp_c = cfg.initial_temp_c(),
        format = ?cfg.output.format,
        "loaded configuration"
    );

    let records = sim.run(&cfg.profile);

    for record in &records {
        match cfg.output.format {
            OutputFormat::Text => println!("{record}"),
            OutputFormat::Json => println!("{}", serde_json::to_string(record)?),
        }
    }

    match RunSummary::from_records(&records) {
        Some(summary) => info!(summary = %serde_json::to_string(&summary)?, "run summary"),
        None => warn!("run produced no steps; check run.duration_s"),
    }

    Ok(())
}
