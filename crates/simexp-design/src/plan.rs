use std::fs;
use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use simexp_core::errors::{ErrorInfo, SimExpError};
use simexp_core::{flatten, Experiment, FlatMap, ParamTree, Value};

use crate::generate::{generate, Experiments, Levels, Strategy};
use crate::hash::stable_hash_string;
use crate::serde::from_yaml_slice;

/// Declarative description of an experiment design, loadable from YAML or JSON.
///
/// ```yaml
/// models: [Modelica.Electrical.Analog.Examples.ChuaCircuit]
/// params:
///   L.L: [16, 18, 20]
///   C2: { C: [80, 100, 120] }
/// args:
///   stopTime: [2500]
/// strategy: fullfact
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignPlan {
    /// Model paths in dot notation.
    pub models: Levels<String>,
    /// Parameter value lists, nested or keyed by dotted path.
    #[serde(default)]
    pub params: ParamTree<Levels<Value>>,
    /// Command argument value lists.
    #[serde(default)]
    pub args: FlatMap<Levels<Value>>,
    /// Combination rule.
    #[serde(default)]
    pub strategy: Strategy,
}

impl DesignPlan {
    /// Reads a plan from a YAML or JSON file.
    pub fn load(path: &Path) -> Result<Self, SimExpError> {
        let bytes = fs::read(path).map_err(|err| SimExpError::io("plan-read", path, err))?;
        let plan: DesignPlan = from_yaml_slice(&bytes)?;
        tracing::debug!(path = %path.display(), strategy = ?plan.strategy, "loaded design plan");
        Ok(plan)
    }

    /// Lazily expands the plan.
    pub fn experiments(&self) -> Result<Experiments, SimExpError> {
        generate(
            self.models.clone(),
            self.params.clone(),
            self.args.clone(),
            self.strategy,
        )
    }

    /// Stable hash of the plan.
    ///
    /// Parameters are hashed in flattened declaration order, so nested and
    /// dotted spellings of the same plan agree while reordering factors
    /// (which reorders the experiments) does not.
    pub fn plan_hash(&self) -> Result<String, SimExpError> {
        let params: Vec<(String, Levels<Value>)> =
            flatten(self.params.clone())?.into_iter().collect();
        let args: Vec<(&String, &Levels<Value>)> = self.args.iter().collect();
        stable_hash_string(&(&self.models, params, args, self.strategy))
    }

    /// Materializes the plan into an exportable table.
    pub fn table(&self) -> Result<ExperimentTable, SimExpError> {
        Ok(ExperimentTable {
            plan_hash: self.plan_hash()?,
            strategy: self.strategy,
            experiments: self.experiments()?.collect(),
        })
    }
}

/// Expanded design stamped with the hash of the plan it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentTable {
    /// [`DesignPlan::plan_hash`] of the source plan.
    pub plan_hash: String,
    /// Strategy the rows were expanded with.
    pub strategy: Strategy,
    /// Experiments in generation order; row `n` of the CSV export is
    /// `experiments[n - 1]`.
    pub experiments: Vec<Experiment>,
}

impl ExperimentTable {
    /// Writes one row per experiment: index, model, then one column per
    /// parameter path and argument name in first-seen order.
    pub fn write_csv<W: Write>(&self, out: W) -> Result<(), SimExpError> {
        let mut param_columns: Vec<&str> = Vec::new();
        let mut arg_columns: Vec<&str> = Vec::new();
        for experiment in &self.experiments {
            for key in experiment.params().keys() {
                if !param_columns.contains(&key.as_str()) {
                    param_columns.push(key);
                }
            }
            for key in experiment.args().keys() {
                if !arg_columns.contains(&key.as_str()) {
                    arg_columns.push(key);
                }
            }
        }

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(out);
        let mut header = vec!["experiment".to_string(), "model".to_string()];
        header.extend(param_columns.iter().map(|key| key.to_string()));
        header.extend(arg_columns.iter().map(|key| key.to_string()));
        writer
            .write_record(&header)
            .map_err(|err| wrap_csv("table-write-header", err))?;

        for (idx, experiment) in self.experiments.iter().enumerate() {
            let mut record = vec![(idx + 1).to_string(), experiment.model().to_string()];
            record.extend(param_columns.iter().map(|key| cell(experiment.params(), key)));
            record.extend(arg_columns.iter().map(|key| cell(experiment.args(), key)));
            writer
                .write_record(&record)
                .map_err(|err| wrap_csv("table-write-row", err))?;
        }
        writer
            .flush()
            .map_err(|err| wrap_csv("table-flush", err.into()))?;
        Ok(())
    }
}

fn cell(values: &FlatMap<Value>, key: &str) -> String {
    values.get(key).map(Value::to_string).unwrap_or_default()
}

fn wrap_csv(code: &str, err: csv::Error) -> SimExpError {
    SimExpError::Serde(ErrorInfo::new(code, "CSV export failure").with_hint(err.to_string()))
}
