use std::fs;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use chrono::{Local, NaiveDate};
use simexp_core::errors::SimExpError;
use simexp_core::{render_modifier, Experiment, FlatMap, Value};

use crate::options::{expand_home, ScriptOptions};

/// What a written script contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptSummary {
    /// Model names without package path, one per experiment.
    pub models: Vec<String>,
    /// Folder holding the script; per-experiment result folders go here.
    pub results_dir: PathBuf,
}

/// Writes a command script running every experiment and copying its result
/// files into a numbered folder next to the script.
pub fn write_script<I>(
    experiments: I,
    options: &ScriptOptions,
    path: &Path,
) -> Result<ScriptSummary, SimExpError>
where
    I: IntoIterator<Item = Experiment>,
{
    let path = expand_home(&path.to_string_lossy());
    let results_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&results_dir)
        .map_err(|err| SimExpError::io("script-create-dir", &results_dir, err))?;

    let (text, models) = render_script(
        experiments,
        options,
        &results_dir,
        Local::now().date_naive(),
    );
    fs::write(&path, text).map_err(|err| SimExpError::io("script-write", &path, err))?;
    tracing::info!(
        path = %path.display(),
        experiments = models.len(),
        "wrote simulation script"
    );
    Ok(ScriptSummary {
        models,
        results_dir,
    })
}

/// Renders the script text and returns it with the abbreviated model names.
pub fn render_script<I>(
    experiments: I,
    options: &ScriptOptions,
    results_dir: &Path,
    date: NaiveDate,
) -> (String, Vec<String>)
where
    I: IntoIterator<Item = Experiment>,
{
    let working_dir = expand_home(&options.working_dir);
    let results = options.resolved_results();
    let mut out = String::new();

    out.push_str(&format!(
        "// Modelica experiment script written by simexp {}\n",
        date.format("%Y-%m-%d")
    ));
    out.push_str("import Modelica.Utilities.Files.copy;\n");
    out.push_str("import Modelica.Utilities.Files.createDirectory;\n");
    out.push_str(
        "Advanced.TranslationInCommandLog = true \"Also include translation log in command log\";\n",
    );
    out.push_str(&format!("cd(\"{}\");\n", working_dir.display()));
    for package in &options.packages {
        out.push_str(&package_lines(package, &working_dir));
    }
    out.push_str(&format!(
        "destination = \"{}{}\";\n\n",
        results_dir.display(),
        MAIN_SEPARATOR
    ));

    let mut models = Vec::new();
    for (idx, experiment) in experiments.into_iter().enumerate() {
        let number = idx + 1;
        models.push(experiment.short_model().to_string());
        out.push_str(&format!("// Experiment {number}\n"));
        out.push_str(&format!(
            "ok = {}{};\n",
            options.command,
            call_arguments(&experiment)
        ));
        out.push_str("if ok then\n");
        out.push_str("    savelog();\n");
        out.push_str(&format!(
            "    createDirectory(destination + \"{number}\");\n"
        ));
        for result in &results {
            out.push_str(&format!(
                "    copy(\"{result}\", destination + \"{number}/{result}\", true);\n"
            ));
        }
        out.push_str("end if;\n");
        out.push_str("clearlog();\n\n");
    }

    // Without an explicit exit the environment waits for manual closing.
    out.push_str("exit();\n");
    (out, models)
}

fn package_lines(package: &str, working_dir: &Path) -> String {
    let open = if package.ends_with(".mos") {
        let script = Path::new(package);
        let folder = script.parent().unwrap_or_else(|| Path::new(""));
        let name = script.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        format!("cd(\"{}\");\nRunScript(\"{name}\");\n", folder.display())
    } else if package.ends_with(".mo") {
        format!("openModel(\"{package}\");\n")
    } else {
        format!(
            "openModel(\"{}\");\n",
            Path::new(package).join("package.mo").display()
        )
    };
    format!("{open}cd(\"{}\");\n", working_dir.display())
}

/// `(problem="Model(mods)", arg=value, ...)`, or `()` with neither a model
/// nor arguments. `Null` arguments render as nothing, and a user-supplied
/// `problem` is replaced by the generated one.
fn call_arguments(experiment: &Experiment) -> String {
    let mut args: FlatMap<Value> = FlatMap::new();
    if !experiment.model().is_empty() {
        args.insert(
            "problem".to_string(),
            Value::Text(format!("\"{}\"", experiment.problem())),
        );
    }
    for (name, value) in experiment.args() {
        if name == "problem" && args.contains_key("problem") {
            tracing::warn!(model = experiment.model(), "ignoring `problem` argument");
            continue;
        }
        args.insert(name.clone(), value.clone());
    }
    match render_modifier(&args) {
        rendered if rendered.is_empty() => "()".to_string(),
        rendered => rendered,
    }
}
