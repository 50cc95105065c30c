use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use simexp_record::read_params;

#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Initialization file, e.g. dsin.txt
    #[arg(long)]
    pub file: PathBuf,
    /// Field names, repeatable
    #[arg(long = "name", required = true)]
    pub names: Vec<String>,
}

pub fn run(args: &ReadArgs) -> Result<(), Box<dyn Error>> {
    let values = read_params(&args.file, &args.names)?;
    for (name, value) in args.names.iter().zip(values) {
        println!("{name} = {value}");
    }
    Ok(())
}
