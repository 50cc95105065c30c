use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};
use simexp_core::errors::{ErrorInfo, SimExpError};
use simexp_core::{flatten, Experiment, FlatMap, ParamTree, Value};

/// Rule used to combine the value lists into experiments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// The i-th experiment takes the i-th value of every list.
    #[serde(alias = "aslisted")]
    ElementWise,
    /// First values are the baseline; each factor is swept alone.
    #[serde(alias = "ofat")]
    OneFactorAtATime,
    /// Cartesian product with the last-declared list cycling fastest.
    #[default]
    #[serde(alias = "fullfact")]
    FullFactorial,
}

/// Candidate values for one model list, parameter or argument.
///
/// `Bare` exists so that a scalar given where a list is required can be
/// reported by name instead of failing deep inside deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Levels<T> {
    /// Ordered candidate values.
    List(Vec<T>),
    /// A single value where a list was expected.
    Bare(T),
}

impl<T> Levels<T> {
    fn into_list(self, argument: &str) -> Result<Vec<T>, SimExpError> {
        match self {
            Levels::List(values) => Ok(values),
            Levels::Bare(_) => Err(SimExpError::InvalidDesignInput(
                ErrorInfo::new("design-not-a-list", "design inputs must be lists of values")
                    .with_context("argument", argument)
                    .with_hint("wrap single values in a one-element list"),
            )),
        }
    }
}

impl<T> From<Vec<T>> for Levels<T> {
    fn from(values: Vec<T>) -> Self {
        Levels::List(values)
    }
}

/// Expands models, parameters and arguments into a lazy experiment sequence.
///
/// Factors are ordered models first, then flattened parameters in
/// declaration order, then arguments. Nothing is materialized here: the
/// returned iterator computes each experiment on demand.
pub fn generate(
    models: Levels<String>,
    params: ParamTree<Levels<Value>>,
    args: FlatMap<Levels<Value>>,
    strategy: Strategy,
) -> Result<Experiments, SimExpError> {
    let models = models.into_list("models")?;
    let params = flatten(params)?
        .into_iter()
        .map(|(path, levels)| {
            let values = levels.into_list(&format!("params.{path}"))?;
            Ok((path, values))
        })
        .collect::<Result<Vec<_>, SimExpError>>()?;
    let args = args
        .into_iter()
        .map(|(name, levels)| {
            let values = levels.into_list(&format!("args.{name}"))?;
            Ok((name, values))
        })
        .collect::<Result<Vec<_>, SimExpError>>()?;

    let mut lens = Vec::with_capacity(1 + params.len() + args.len());
    lens.push(models.len());
    lens.extend(params.iter().map(|(_, values)| values.len()));
    lens.extend(args.iter().map(|(_, values)| values.len()));

    let (cursor, total) = match strategy {
        Strategy::ElementWise => {
            check_shape(&models, &params, &args)?;
            (Cursor::ElementWise { row: 0 }, models.len())
        }
        Strategy::OneFactorAtATime => {
            check_baselines(&models, &params, &args)?;
            let sweeps: usize = lens.iter().map(|len| len - 1).sum();
            (Cursor::OneFactor { sweep: None }, 1 + sweeps)
        }
        Strategy::FullFactorial => {
            let total = lens
                .iter()
                .try_fold(1usize, |acc, len| acc.checked_mul(*len))
                .ok_or_else(|| {
                    SimExpError::InvalidDesignInput(ErrorInfo::new(
                        "design-too-large",
                        "full-factorial design size overflows",
                    ))
                })?;
            (
                Cursor::Factorial {
                    odometer: vec![0; lens.len()],
                },
                total,
            )
        }
    };
    tracing::debug!(
        ?strategy,
        factors = lens.len(),
        experiments = total,
        "expanded experiment design"
    );

    Ok(Experiments {
        models,
        params,
        args,
        lens,
        cursor,
        remaining: total,
    })
}

fn check_shape(
    models: &[String],
    params: &[(String, Vec<Value>)],
    args: &[(String, Vec<Value>)],
) -> Result<(), SimExpError> {
    let expected = models.len();
    let lists = params
        .iter()
        .map(|(path, values)| (format!("params.{path}"), values.len()))
        .chain(
            args.iter()
                .map(|(name, values)| (format!("args.{name}"), values.len())),
        );
    for (argument, len) in lists {
        if len != expected {
            return Err(SimExpError::ShapeMismatch(
                ErrorInfo::new(
                    "design-shape-mismatch",
                    "element-wise design requires lists of equal length",
                )
                .with_context("argument", argument)
                .with_context("expected", expected.to_string())
                .with_context("found", len.to_string()),
            ));
        }
    }
    Ok(())
}

fn check_baselines(
    models: &[String],
    params: &[(String, Vec<Value>)],
    args: &[(String, Vec<Value>)],
) -> Result<(), SimExpError> {
    let empty = std::iter::once(("models".to_string(), models.is_empty()))
        .chain(
            params
                .iter()
                .map(|(path, values)| (format!("params.{path}"), values.is_empty())),
        )
        .chain(
            args.iter()
                .map(|(name, values)| (format!("args.{name}"), values.is_empty())),
        )
        .find(|(_, is_empty)| *is_empty);
    match empty {
        Some((argument, _)) => Err(SimExpError::InvalidDesignInput(
            ErrorInfo::new(
                "design-missing-baseline",
                "one-factor-at-a-time requires a baseline value in every list",
            )
            .with_context("argument", argument),
        )),
        None => Ok(()),
    }
}

#[derive(Debug, Clone)]
enum Cursor {
    ElementWise { row: usize },
    /// `None` is the all-baseline row; `Some((factor, level))` sweeps one factor.
    OneFactor { sweep: Option<(usize, usize)> },
    Factorial { odometer: Vec<usize> },
}

/// Single-pass sequence of experiments produced by [`generate`].
#[derive(Debug, Clone)]
pub struct Experiments {
    models: Vec<String>,
    params: Vec<(String, Vec<Value>)>,
    args: Vec<(String, Vec<Value>)>,
    lens: Vec<usize>,
    cursor: Cursor,
    remaining: usize,
}

impl Experiments {
    fn next_indices(&mut self) -> Vec<usize> {
        let lens = &self.lens;
        match &mut self.cursor {
            Cursor::ElementWise { row } => {
                let indices = vec![*row; lens.len()];
                *row += 1;
                indices
            }
            Cursor::OneFactor { sweep } => {
                let mut indices = vec![0; lens.len()];
                if let Some((factor, level)) = *sweep {
                    indices[factor] = level;
                }
                *sweep = next_sweep(*sweep, lens);
                indices
            }
            Cursor::Factorial { odometer } => {
                let indices = odometer.clone();
                for (digit, len) in odometer.iter_mut().zip(lens).rev() {
                    *digit += 1;
                    if *digit < *len {
                        break;
                    }
                    *digit = 0;
                }
                indices
            }
        }
    }

    fn build(&self, indices: &[usize]) -> Experiment {
        let (model_idx, rest) = indices.split_at(1);
        let (param_idx, arg_idx) = rest.split_at(self.params.len());
        let params = self
            .params
            .iter()
            .zip(param_idx)
            .map(|((path, values), idx)| (path.clone(), values[*idx].clone()))
            .collect();
        let args = self
            .args
            .iter()
            .zip(arg_idx)
            .map(|((name, values), idx)| (name.clone(), values[*idx].clone()))
            .collect();
        Experiment::new(self.models[model_idx[0]].clone(), params, args)
    }
}

/// Next non-baseline `(factor, level)` after `current`, skipping factors with
/// a single value.
fn next_sweep(current: Option<(usize, usize)>, lens: &[usize]) -> Option<(usize, usize)> {
    let (mut factor, mut level) = match current {
        None => (0, 1),
        Some((factor, level)) => (factor, level + 1),
    };
    while factor < lens.len() {
        if level < lens[factor] {
            return Some((factor, level));
        }
        factor += 1;
        level = 1;
    }
    None
}

impl Iterator for Experiments {
    type Item = Experiment;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let indices = self.next_indices();
        Some(self.build(&indices))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Experiments {}

impl FusedIterator for Experiments {}
