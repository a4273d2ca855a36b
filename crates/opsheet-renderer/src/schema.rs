//! Operation record schema.
//!
//! A section document is a table of operation name to record table. Every
//! record must carry `prototype` and `short`; a [`Schema`] can require more
//! fields by name. The whole document is checked before any record is handed
//! to the renderer.

use toml::Value;

/// Field holding the operation's syntax form.
const PROTOTYPE: &str = "prototype";
/// Field holding the operation's short description.
const SHORT: &str = "short";

/// One validated operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpRecord {
    /// Operation name (the document key).
    pub name: String,
    /// Syntax form, rendered verbatim.
    pub prototype: String,
    /// Short description, may contain backtick code spans.
    pub short: String,
}

/// Error returned when a section document does not match the schema.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// The entry is not a table of fields.
    #[error("Operation '{op}' is not a table")]
    NotATable {
        /// Operation name.
        op: String,
    },
    /// A required field is absent.
    #[error("Operation '{op}' is missing required field '{field}'")]
    MissingField {
        /// Operation name.
        op: String,
        /// Field name.
        field: String,
    },
    /// A text field holds an array or table.
    #[error("Operation '{op}' has field '{field}' that is not text")]
    InvalidField {
        /// Operation name.
        op: String,
        /// Field name.
        field: String,
    },
}

/// Required-field schema for operation records.
#[derive(Clone, Debug)]
pub struct Schema {
    extra_required: Vec<String>,
}

impl Default for Schema {
    fn default() -> Self {
        Self::new(Vec::<String>::new())
    }
}

impl Schema {
    /// Create a schema requiring `prototype`, `short` and the given extra fields.
    #[must_use]
    pub fn new<I, S>(extra_required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extra_required: extra_required.into_iter().map(Into::into).collect(),
        }
    }

    /// All required field names, core fields first.
    pub fn required(&self) -> impl Iterator<Item = &str> {
        [PROTOTYPE, SHORT]
            .into_iter()
            .chain(self.extra_required.iter().map(String::as_str))
    }

    /// Validate a whole section document.
    ///
    /// Returns records in document order. Nothing is returned unless every
    /// record is valid.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] in document order.
    pub fn validate(&self, document: &toml::Table) -> Result<Vec<OpRecord>, SchemaError> {
        let mut records = Vec::with_capacity(document.len());
        for (name, entry) in document {
            let Value::Table(fields) = entry else {
                return Err(SchemaError::NotATable { op: name.clone() });
            };

            for field in self.required() {
                if !fields.contains_key(field) {
                    return Err(SchemaError::MissingField {
                        op: name.clone(),
                        field: field.to_owned(),
                    });
                }
            }

            records.push(OpRecord {
                name: name.clone(),
                prototype: text_field(name, fields, PROTOTYPE)?,
                short: text_field(name, fields, SHORT)?,
            });
        }
        Ok(records)
    }
}

/// Read a required field as text.
///
/// Strings are used verbatim; other scalars use their literal form.
fn text_field(op: &str, fields: &toml::Table, field: &str) -> Result<String, SchemaError> {
    let missing = || SchemaError::MissingField {
        op: op.to_owned(),
        field: field.to_owned(),
    };
    match fields.get(field).ok_or_else(missing)? {
        Value::String(s) => Ok(s.clone()),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::Boolean(b) => Ok(b.to_string()),
        Value::Datetime(d) => Ok(d.to_string()),
        Value::Array(_) | Value::Table(_) => Err(SchemaError::InvalidField {
            op: op.to_owned(),
            field: field.to_owned(),
        }),
    }
}
