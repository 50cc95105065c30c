use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use simexp_design::{from_yaml_slice, DesignPlan};
use simexp_script::{write_script, ScriptOptions};

#[derive(Args, Debug)]
pub struct ScriptArgs {
    /// Design plan (YAML or JSON)
    #[arg(long)]
    pub design: PathBuf,
    /// Script options (packages, working directory, command, result files)
    #[arg(long)]
    pub options: Option<PathBuf>,
    /// Path of the script to write; result folders are created next to it
    #[arg(long)]
    pub out: PathBuf,
}

pub fn run(args: &ScriptArgs) -> Result<(), Box<dyn Error>> {
    let plan = DesignPlan::load(&args.design)?;
    let options = match &args.options {
        Some(path) => from_yaml_slice::<ScriptOptions>(&fs::read(path)?)?,
        None => ScriptOptions::default(),
    };
    let summary = write_script(plan.experiments()?, &options, &args.out)?;
    for (idx, model) in summary.models.iter().enumerate() {
        println!("{:>4}  {model}", idx + 1);
    }
    println!("results in {}", summary.results_dir.display());
    Ok(())
}
