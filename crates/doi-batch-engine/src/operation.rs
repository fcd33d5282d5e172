//! Operation definitions: the raw, user-supplied shape and its compiled form.

use doi_batch_path::{parse_path, RecordPath};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BatchError, OperationError, PatternField};

/// Operation as supplied by a caller, before validation.
///
/// Field semantics follow the operation form: blank strings mean "not set".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationSpec {
    pub attribute: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub replacement: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<ConditionSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionSpec {
    pub attribute: String,
    pub pattern: String,
}

impl OperationSpec {
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            ..Self::default()
        }
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_replacement(mut self, replacement: impl Into<Value>) -> Self {
        self.replacement = replacement.into();
        self
    }

    pub fn with_condition(mut self, attribute: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.condition = Some(ConditionSpec {
            attribute: attribute.into(),
            pattern: pattern.into(),
        });
        self
    }
}

/// A validated condition: the location to test and the regex to test it with.
#[derive(Debug, Clone)]
pub struct Condition {
    pub attribute: RecordPath,
    pub pattern: Regex,
}

/// A validated, ready-to-run operation.
#[derive(Debug, Clone)]
pub struct Operation {
    pub attribute: RecordPath,
    /// `None` replaces the whole value instead of substituting inside a string.
    pub pattern: Option<Regex>,
    pub replacement: Value,
    pub condition: Option<Condition>,
}

impl Operation {
    pub fn compile(spec: &OperationSpec) -> Result<Self, OperationError> {
        let attribute = parse_path(spec.attribute.trim());
        if attribute.is_empty() {
            return Err(OperationError::MissingAttribute);
        }
        let pattern = match non_blank(spec.pattern.as_deref()) {
            Some(source) => Some(compile_regex(PatternField::Pattern, source)?),
            None => None,
        };
        let condition = match &spec.condition {
            Some(condition) => Condition::compile(condition)?,
            None => None,
        };
        Ok(Self {
            attribute,
            pattern,
            replacement: match &spec.replacement {
                // An absent replacement deletes the match (or blanks the value).
                Value::Null => Value::String(String::new()),
                other => other.clone(),
            },
            condition,
        })
    }

    /// Replacement is absent or whitespace only.
    pub fn has_blank_replacement(&self) -> bool {
        match &self.replacement {
            Value::Null => true,
            Value::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// The value written is read from the condition location instead of
    /// being supplied literally.
    pub fn is_extract_and_set(&self) -> bool {
        self.condition.is_some() && self.has_blank_replacement()
    }
}

impl Condition {
    /// A condition without a pattern is dropped: it would always hold.
    fn compile(spec: &ConditionSpec) -> Result<Option<Self>, OperationError> {
        let Some(source) = non_blank(Some(&spec.pattern)) else {
            return Ok(None);
        };
        let attribute = parse_path(spec.attribute.trim());
        if attribute.is_empty() {
            return Err(OperationError::ConditionWithoutAttribute);
        }
        Ok(Some(Self {
            attribute,
            pattern: compile_regex(PatternField::ConditionPattern, source)?,
        }))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn compile_regex(field: PatternField, source: &str) -> Result<Regex, OperationError> {
    Regex::new(source).map_err(|source_err| OperationError::InvalidRegex {
        field,
        pattern: source.to_string(),
        source: source_err,
    })
}

/// Compile every operation, attributing the first failure to its index.
///
/// An empty list is accepted and compiles to an empty list.
pub fn compile_operations(specs: &[OperationSpec]) -> Result<Vec<Operation>, BatchError> {
    specs
        .iter()
        .enumerate()
        .map(|(index, spec)| {
            Operation::compile(spec).map_err(|source| BatchError::Operation { index, source })
        })
        .collect()
}

/// Validate and compile a batch before any record is touched.
///
/// Unlike [`compile_operations`], a batch must contain at least one operation.
pub fn compile_batch(specs: &[OperationSpec]) -> Result<Vec<Operation>, BatchError> {
    if specs.is_empty() {
        return Err(BatchError::EmptyBatch);
    }
    compile_operations(specs)
}

/// Validate a batch without keeping the compiled operations.
pub fn validate_operations(specs: &[OperationSpec]) -> Result<(), BatchError> {
    compile_batch(specs).map(|_| ())
}

/// Decode a JSON array of operations.
pub fn parse_operations(json: &str) -> Result<Vec<OperationSpec>, BatchError> {
    Ok(serde_json::from_str(json)?)
}
