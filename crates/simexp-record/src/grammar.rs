//! Line grammars of the Dymola initialization file (`dsin.txt`).
//!
//! Initial values are stored as six columns followed by the variable name in
//! a trailing comment, optionally wrapped onto a second line after the
//! maximum:
//!
//! ```text
//!  -1      18                       0                       0                  1   280   # L.L
//!  -1      10                       0  1.0000000000000000E+100
//!   1   280   # C1.C
//! ```
//!
//! | column | meaning |
//! |---|---|
//! | 1 | type of initial value: -2 continue, -1 fixed, 0 free, >0 weight of a desired value |
//! | 2 | the value |
//! | 3, 4 | minimum and maximum (ignored if minimum >= maximum) |
//! | 5 | category: 1 parameter, 2 state, 3 state derivative, 4 output, 5 input, 6 auxiliary |
//! | 6 | data type: 0 real, 1 boolean, 2 integer (plus flag bits) |
//!
//! Experiment and method settings use a single value per line:
//!
//! ```text
//!     2500                   # StopTime     Time at which integration stops
//! ```

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

const REAL: &str = r"[+-]?\d+(?:\.\d+)?(?:[Ee][+-]\d+)?";
const INT: &str = r"[+-]?\d+";
const UINT: &str = r"\d+";

/// One line grammar. The pattern captures `prefix`, `value`, `suffix` and
/// `name`; the value span sits between prefix and suffix.
#[derive(Debug, Clone)]
struct FieldGrammar {
    label: &'static str,
    pattern: Regex,
}

/// Where a field's value sits in a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpan {
    /// Label of the grammar that matched.
    pub grammar: &'static str,
    /// Byte range of the value column.
    pub value: Range<usize>,
}

/// Outcome of looking a field up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Located {
    /// No grammar matched the name.
    Missing,
    /// Exactly one record of the first matching grammar carries the name.
    Unique(FieldSpan),
    /// The first matching grammar carries the name more than once.
    Ambiguous {
        grammar: &'static str,
        matches: usize,
    },
}

/// Priority-ordered grammar table. Grammars are tried in order and the first
/// one with a record for the requested name decides the outcome.
#[derive(Debug, Clone)]
pub struct RecordCodec {
    grammars: Vec<FieldGrammar>,
}

static DYMOLA_CODEC: OnceLock<RecordCodec> = OnceLock::new();

impl RecordCodec {
    /// Codec for Dymola `dsin.txt` initialization and final-value files.
    pub fn dymola() -> Self {
        let record = format!(
            r"(?m)^(?P<prefix>[ \t]*{INT}[ \t]+)(?P<value>{REAL})(?P<suffix>[ \t]+{REAL}[ \t]+{REAL}[ \t]*\r?\n?[ \t]+{UINT}[ \t]+{UINT}[ \t]+#[ \t]+(?P<name>[^\s#]+)[^\n]*)"
        );
        let setting = format!(
            r"(?m)^(?P<prefix>[ \t]*)(?P<value>{REAL})(?P<suffix>[ \t]+#[ \t]*(?P<name>[^\s#]+)[^\n]*)"
        );
        Self {
            grammars: vec![
                FieldGrammar {
                    label: "initial-value",
                    pattern: Regex::new(&record).expect("valid initial-value record regex"),
                },
                FieldGrammar {
                    label: "setting",
                    pattern: Regex::new(&setting).expect("valid setting regex"),
                },
            ],
        }
    }

    /// Process-wide Dymola codec, compiled on first use.
    pub fn shared() -> &'static RecordCodec {
        DYMOLA_CODEC.get_or_init(RecordCodec::dymola)
    }

    /// Finds the value span of `name` in `text`.
    pub fn locate(&self, name: &str, text: &str) -> Located {
        for grammar in &self.grammars {
            let mut spans = grammar
                .pattern
                .captures_iter(text)
                .filter(|caps| caps.name("name").map(|m| m.as_str()) == Some(name))
                .filter_map(|caps| caps.name("value").map(|m| m.range()));
            let Some(value) = spans.next() else {
                continue;
            };
            let extra = spans.count();
            if extra > 0 {
                return Located::Ambiguous {
                    grammar: grammar.label,
                    matches: extra + 1,
                };
            }
            return Located::Unique(FieldSpan {
                grammar: grammar.label,
                value,
            });
        }
        Located::Missing
    }

    /// Returns `text` with the value span replaced by `literal`.
    pub fn rewrite(&self, text: &str, span: &FieldSpan, literal: &str) -> String {
        let mut out = String::with_capacity(text.len() + literal.len());
        out.push_str(&text[..span.value.start]);
        out.push_str(literal);
        out.push_str(&text[span.value.end..]);
        out
    }
}
