//! Two-pass validation: JSON Schema structure, then field constraints.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::marker::PhantomData;

use jsonschema::Validator;
use schemars::JsonSchema;
use schemars::generate::SchemaSettings;
use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::{Error, Result, ValidationStage};

/// Generates the draft-07 JSON Schema of `T`.
pub fn schema_value<T: JsonSchema>() -> Result<Value> {
    let mut generator = SchemaSettings::draft07().into_generator();
    let schema = generator.root_schema_for::<T>();
    Ok(serde_json::to_value(&schema)?)
}

/// Validator for values of type `T`.
///
/// Structural violations come from the schema generated for `T`; semantic
/// violations come from `T`'s [`Validate`] implementation. Both are reported
/// together.
pub struct SchemaValidator<T> {
    schema: Value,
    validator: Validator,
    stage: ValidationStage,
    _marker: PhantomData<fn() -> T>,
}

impl<T: JsonSchema> SchemaValidator<T> {
    /// Compiles the schema of `T`.
    pub fn new(stage: ValidationStage) -> Result<Self> {
        let schema = schema_value::<T>()?;
        let validator = Validator::new(&schema)
            .map_err(|e| Error::config(format!("invalid schema for {}: {e}", T::schema_name())))?;

        Ok(Self {
            schema,
            validator,
            stage,
            _marker: PhantomData,
        })
    }

    /// Returns the JSON Schema.
    pub fn schema(&self) -> &Value {
        &self.schema
    }
}

impl<T: JsonSchema + DeserializeOwned + Validate> SchemaValidator<T> {
    /// Validates `value` and returns the typed value.
    ///
    /// Fails with [`Error::Validation`] listing every violation found. A path
    /// flagged by the schema is not reported again by the field constraints.
    pub fn validate(&self, value: &Value) -> Result<T> {
        let mut flagged = BTreeSet::new();
        let mut violations = BTreeSet::new();
        for error in self.validator.iter_errors(value) {
            let path = error.instance_path.to_string();
            violations.insert(violation(&path, &error.to_string()));
            flagged.insert(path);
        }

        match serde_json::from_value::<T>(value.clone()) {
            Ok(typed) => {
                if let Err(errors) = typed.validate() {
                    let mut semantic = Violations {
                        flagged: &flagged,
                        out: &mut violations,
                    };
                    semantic.collect(&errors, "");
                }
                if violations.is_empty() {
                    return Ok(typed);
                }
            }
            Err(error) if violations.is_empty() => {
                violations.insert(violation("", &error.to_string()));
            }
            Err(_) => {}
        }

        Err(Error::validation(self.stage, violations.into_iter().collect()))
    }
}

fn violation(path: &str, message: &str) -> String {
    if path.is_empty() {
        format!("/: {message}")
    } else {
        format!("{path}: {message}")
    }
}

/// Field constraint violations not already reported by the schema.
struct Violations<'a> {
    flagged: &'a BTreeSet<String>,
    out: &'a mut BTreeSet<String>,
}

impl Violations<'_> {
    fn collect(&mut self, errors: &ValidationErrors, prefix: &str) {
        for (field, kind) in errors.errors() {
            let path = format!("{prefix}/{}", camel_case(field));
            match kind {
                ValidationErrorsKind::Field(_) if self.flagged.contains(&path) => {}
                ValidationErrorsKind::Field(field_errors) => {
                    for error in field_errors {
                        let message = error.message.clone().unwrap_or_else(|| {
                            Cow::Owned(format!("failed `{}` check", error.code))
                        });
                        self.out.insert(violation(&path, &message));
                    }
                }
                ValidationErrorsKind::Struct(nested) => self.collect(nested, &path),
                ValidationErrorsKind::List(items) => {
                    for (index, nested) in items {
                        self.collect(nested, &format!("{path}/{index}"));
                    }
                }
            }
        }
    }
}

/// Field names are reported the way they appear on the wire.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
