use std::error::Error;
use std::fs::{self, File};
use std::path::PathBuf;

use clap::Args;
use simexp_design::DesignPlan;

use crate::write_json;

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Design plan (YAML or JSON)
    #[arg(long)]
    pub design: PathBuf,
    /// Output directory for experiments.json
    #[arg(long)]
    pub out: PathBuf,
    /// Also write experiments.csv
    #[arg(long)]
    pub csv: bool,
}

pub fn run(args: &PlanArgs) -> Result<(), Box<dyn Error>> {
    let plan = DesignPlan::load(&args.design)?;
    let table = plan.table()?;
    fs::create_dir_all(&args.out)?;
    write_json(args.out.join("experiments.json"), &table)?;
    if args.csv {
        let file = File::create(args.out.join("experiments.csv"))?;
        table.write_csv(file)?;
    }
    println!(
        "{} experiments ({:?}), plan {}",
        table.experiments.len(),
        table.strategy,
        table.plan_hash
    );
    Ok(())
}
