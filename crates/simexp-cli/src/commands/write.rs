use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use simexp_core::{flatten, FlatMap, ParamTree, Value};
use simexp_design::from_yaml_slice;
use simexp_record::write_params;

#[derive(Args, Debug)]
pub struct WriteArgs {
    /// Initialization file, e.g. dsin.txt
    #[arg(long)]
    pub file: PathBuf,
    /// `name=value` assignment, repeatable; wins over --params
    #[arg(long = "set", value_parser = parse_assignment)]
    pub assignments: Vec<(String, Value)>,
    /// Parameter tree (YAML or JSON) of values to write
    #[arg(long)]
    pub params: Option<PathBuf>,
}

pub fn run(args: &WriteArgs) -> Result<(), Box<dyn Error>> {
    let mut values: FlatMap<Value> = match &args.params {
        Some(path) => flatten(from_yaml_slice::<ParamTree<Value>>(&fs::read(path)?)?)?,
        None => FlatMap::new(),
    };
    for (name, value) in &args.assignments {
        values.insert(name.clone(), value.clone());
    }
    if values.is_empty() {
        return Err("nothing to write: pass --set or --params".into());
    }
    write_params(&args.file, &values)?;
    println!("wrote {} fields to {}", values.len(), args.file.display());
    Ok(())
}

fn parse_assignment(raw: &str) -> Result<(String, Value), String> {
    let (name, literal) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got `{raw}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing field name in `{raw}`"));
    }
    let value: Value = serde_yaml::from_str(literal.trim()).map_err(|err| err.to_string())?;
    Ok((name.to_string(), value))
}
