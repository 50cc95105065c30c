use std::fs;
use std::path::{Path, PathBuf};

use simexp_core::errors::{ErrorInfo, SimExpError};
use simexp_core::{FlatMap, Value};

use crate::grammar::{FieldSpan, Located, RecordCodec};

/// In-memory copy of an initialization file.
///
/// Reads and writes operate on the buffer; nothing reaches the disk until
/// [`RecordStore::flush`]. There is no file locking: concurrent writers to
/// the same file must coordinate themselves.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
    text: String,
}

impl RecordStore {
    /// Loads the whole file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SimExpError> {
        let path = path.into();
        let text =
            fs::read_to_string(&path).map_err(|err| SimExpError::io("record-read", &path, err))?;
        Ok(Self::from_text(path, text))
    }

    /// Wraps text that did not come from disk; `path` is used for
    /// diagnostics and as the flush target.
    pub fn from_text(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Reads one field as a real number.
    pub fn read_field(&self, name: &str) -> Result<f64, SimExpError> {
        let span = self.locate(name)?;
        let literal = &self.text[span.value];
        literal.parse::<f64>().map_err(|err| {
            SimExpError::Serde(
                ErrorInfo::new("record-value-parse", err.to_string())
                    .with_context("field", name)
                    .with_context("literal", literal),
            )
        })
    }

    /// Reads several fields, in the order given.
    pub fn read_fields<I, S>(&self, names: I) -> Result<Vec<f64>, SimExpError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|name| self.read_field(name.as_ref()))
            .collect()
    }

    /// Replaces the value of one field in the buffer.
    pub fn write_field(&mut self, name: &str, value: &Value) -> Result<(), SimExpError> {
        let literal = record_literal(name, value)?;
        let span = self.locate(name)?;
        tracing::debug!(field = name, grammar = span.grammar, %literal, "rewriting field");
        self.text = RecordCodec::shared().rewrite(&self.text, &span, &literal);
        Ok(())
    }

    /// Applies all writes or none: the buffer is only replaced once every
    /// field has been rewritten successfully.
    pub fn write_fields<'a, I>(&mut self, fields: I) -> Result<(), SimExpError>
    where
        I: IntoIterator<Item = (&'a str, &'a Value)>,
    {
        let mut staged = self.clone();
        for (name, value) in fields {
            staged.write_field(name, value)?;
        }
        self.text = staged.text;
        Ok(())
    }

    /// Writes the whole buffer back to its path.
    pub fn flush(&self) -> Result<(), SimExpError> {
        fs::write(&self.path, &self.text)
            .map_err(|err| SimExpError::io("record-write", &self.path, err))?;
        tracing::info!(path = %self.path.display(), bytes = self.text.len(), "flushed record store");
        Ok(())
    }

    fn locate(&self, name: &str) -> Result<FieldSpan, SimExpError> {
        match RecordCodec::shared().locate(name, &self.text) {
            Located::Unique(span) => Ok(span),
            Located::Missing => Err(SimExpError::FieldNotFound(
                ErrorInfo::new(
                    "record-field-missing",
                    "field does not exist or is not formatted as expected",
                )
                .with_context("field", name)
                .with_context("file", self.path.display().to_string()),
            )),
            Located::Ambiguous { grammar, matches } => Err(SimExpError::AmbiguousField(
                ErrorInfo::new("record-field-ambiguous", "field occurs more than once")
                    .with_context("field", name)
                    .with_context("file", self.path.display().to_string())
                    .with_context("grammar", grammar)
                    .with_context("matches", matches.to_string()),
            )),
        }
    }
}

/// Text written into the value column. Records only hold numbers, so
/// booleans become 1/0 and reals are written in plain decimal notation.
fn record_literal(name: &str, value: &Value) -> Result<String, SimExpError> {
    match value {
        Value::Bool(flag) => Ok(if *flag { "1" } else { "0" }.to_string()),
        Value::Int(int) => Ok(int.to_string()),
        Value::Float(float) if float.is_finite() => Ok(float.to_string()),
        other => {
            let hint = match other {
                Value::Array(_) => "split arrays into one field per index, e.g. x[1], x[2]",
                Value::Text(_) => "give enumerations as their integer equivalent",
                Value::Null => "leave the field out to keep its current value",
                _ => "records only hold finite numbers",
            };
            Err(SimExpError::UnsupportedValueType(
                ErrorInfo::new("record-value-type", "value cannot be stored in a record")
                    .with_context("field", name)
                    .with_context("kind", other.kind())
                    .with_hint(hint),
            ))
        }
    }
}

/// Reads fields from the file at `path`, in the order given.
pub fn read_params<I, S>(path: &Path, names: I) -> Result<Vec<f64>, SimExpError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    RecordStore::open(path)?.read_fields(names)
}

/// Rewrites fields of the file at `path` in one read-modify-write cycle.
/// The file is left untouched if any field fails.
pub fn write_params(path: &Path, params: &FlatMap<Value>) -> Result<(), SimExpError> {
    let mut store = RecordStore::open(path)?;
    store.write_fields(params.iter().map(|(name, value)| (name.as_str(), value)))?;
    store.flush()
}
