use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Settings shared by every experiment in a script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptOptions {
    /// Packages to preload: `*.mo` files, folders holding a `package.mo`, or
    /// `*.mos` scripts (run from their own folder).
    #[serde(default)]
    pub packages: Vec<String>,
    /// Working directory of the simulation environment; `~` is expanded.
    #[serde(default = "default_working_dir")]
    pub working_dir: String,
    /// Command issued per experiment, e.g. `simulateModel` or `translateModel`.
    #[serde(default = "default_command")]
    pub command: String,
    /// Files copied into each experiment's result folder. `%x` stands for the
    /// executable extension of the host.
    #[serde(default = "default_results")]
    pub results: Vec<String>,
}

fn default_working_dir() -> String {
    "~/Documents/Modelica".to_string()
}

fn default_command() -> String {
    "simulateModel".to_string()
}

fn default_results() -> Vec<String> {
    ["dsin.txt", "dslog.txt", "dsres.mat", "dymosim%x", "dymolalg.txt"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for ScriptOptions {
    fn default() -> Self {
        Self {
            packages: Vec::new(),
            working_dir: default_working_dir(),
            command: default_command(),
            results: default_results(),
        }
    }
}

impl ScriptOptions {
    /// Result file names with `%x` resolved for this host.
    pub fn resolved_results(&self) -> Vec<String> {
        let exe = if cfg!(windows) { ".exe" } else { "" };
        self.results
            .iter()
            .map(|result| result.replace("%x", exe))
            .collect()
    }
}

const SEPARATORS: &[char] = &['/', '\\'];

/// Expands a bare `~` or a leading `~/` to the current user's home
/// directory. `~user` forms are left alone.
pub fn expand_home(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with(SEPARATORS) => rest,
        _ => return PathBuf::from(path),
    };
    match env::var_os("HOME").or_else(|| env::var_os("USERPROFILE")) {
        Some(home) => match rest.trim_start_matches(SEPARATORS) {
            "" => PathBuf::from(home),
            rest => Path::new(&home).join(rest),
        },
        None => PathBuf::from(path),
    }
}
