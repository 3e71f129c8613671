//! Input and output shape validation.
//!
//! A [`Schema`] turns an untrusted JSON value into a validated (and possibly
//! normalized) JSON value, or reports every problem it finds as
//! [`ValidationErrors`] keyed by dot-joined field path.
//!
//! [`Shape`] is the built-in schema. Any closure can be used as a schema via
//! [`schema_fn`].
//!
//! # Example
//!
//! ```
//! use praxis_core::{Schema, Shape};
//! use serde_json::json;
//!
//! let schema = Shape::object([
//!     ("name", Shape::string().min_length(1).message("Name is required")),
//!     ("age", Shape::integer().min(0).optional()),
//! ]);
//!
//! assert!(schema.parse(&json!({ "name": "Alice" })).is_ok());
//!
//! let errors = schema.parse(&json!({ "name": "" })).unwrap_err();
//! assert_eq!(errors.get("name"), Some(&["Name is required".to_string()][..]));
//! ```

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{ValidationErrors, ROOT_FIELD};

/// Validates and normalizes a JSON value.
pub trait Schema: Send + Sync + 'static {
    /// Parses `value`, returning the accepted value or every field error.
    fn parse(&self, value: &Value) -> Result<Value, ValidationErrors>;
}

/// A schema backed by a closure.
#[derive(Debug, Clone)]
pub struct FnSchema<F>(F);

impl<F> Schema for FnSchema<F>
where
    F: Fn(&Value) -> Result<Value, ValidationErrors> + Send + Sync + 'static,
{
    fn parse(&self, value: &Value) -> Result<Value, ValidationErrors> {
        (self.0)(value)
    }
}

/// Wraps a closure as a [`Schema`].
///
/// ```
/// use praxis_core::{schema_fn, Schema, ValidationErrors};
/// use serde_json::Value;
///
/// let even = schema_fn(|v: &Value| match v.as_u64() {
///     Some(n) if n % 2 == 0 => Ok(v.clone()),
///     _ => Err(ValidationErrors::root("Expected an even number")),
/// });
/// assert!(even.parse(&serde_json::json!(4)).is_ok());
/// assert!(even.parse(&serde_json::json!(3)).is_err());
/// ```
pub fn schema_fn<F>(f: F) -> FnSchema<F>
where
    F: Fn(&Value) -> Result<Value, ValidationErrors> + Send + Sync + 'static,
{
    FnSchema(f)
}

/// Parses `value` with `schema` and deserializes the accepted value into `T`.
///
/// A value the schema accepts but `T` cannot represent is reported under
/// [`ROOT_FIELD`].
pub fn parse_typed<T, S>(schema: &S, value: &Value) -> Result<T, ValidationErrors>
where
    T: DeserializeOwned,
    S: Schema + ?Sized,
{
    let parsed = schema.parse(value)?;
    deserialize_value(parsed)
}

/// Deserializes an unvalidated value into `T`, reporting failures under [`ROOT_FIELD`].
pub fn deserialize_value<T: DeserializeOwned>(value: Value) -> Result<T, ValidationErrors> {
    serde_json::from_value(value).map_err(|e| ValidationErrors::root(e.to_string()))
}

#[derive(Debug, Clone)]
enum Kind {
    String {
        min_length: Option<usize>,
        max_length: Option<usize>,
        pattern: Option<Regex>,
        email: bool,
    },
    Integer {
        minimum: Option<f64>,
        maximum: Option<f64>,
    },
    Number {
        minimum: Option<f64>,
        maximum: Option<f64>,
    },
    Boolean,
    Array {
        items: Box<Shape>,
        min_items: Option<usize>,
        max_items: Option<usize>,
    },
    Object {
        properties: Vec<(String, Shape)>,
    },
    Any,
    Null,
}

/// Built-in declarative schema.
///
/// Object properties are required unless marked [`optional`](Shape::optional).
/// Unknown object keys are stripped from the parsed value. `null` is only
/// accepted by [`nullable`](Shape::nullable) shapes, [`Shape::any`] and
/// [`Shape::null`].
///
/// Messages follow a fixed vocabulary:
///
/// - `Required`
/// - `Expected string, received number`
/// - `String must contain at least 1 character(s)`
/// - `Number must be less than or equal to 100`
/// - `Invalid email`
///
/// [`message`](Shape::message) replaces every message produced at that node.
#[derive(Debug, Clone)]
pub struct Shape {
    kind: Kind,
    optional: bool,
    nullable: bool,
    message: Option<String>,
}

impl Shape {
    fn of(kind: Kind) -> Self {
        Self {
            kind,
            optional: false,
            nullable: false,
            message: None,
        }
    }

    /// Creates a string shape.
    #[must_use]
    pub fn string() -> Self {
        Self::of(Kind::String {
            min_length: None,
            max_length: None,
            pattern: None,
            email: false,
        })
    }

    /// Creates an integer shape.
    #[must_use]
    pub fn integer() -> Self {
        Self::of(Kind::Integer {
            minimum: None,
            maximum: None,
        })
    }

    /// Creates a number shape.
    #[must_use]
    pub fn number() -> Self {
        Self::of(Kind::Number {
            minimum: None,
            maximum: None,
        })
    }

    /// Creates a boolean shape.
    #[must_use]
    pub fn boolean() -> Self {
        Self::of(Kind::Boolean)
    }

    /// Creates an array shape.
    #[must_use]
    pub fn array(items: Shape) -> Self {
        Self::of(Kind::Array {
            items: Box::new(items),
            min_items: None,
            max_items: None,
        })
    }

    /// Creates an object shape from `(name, shape)` pairs.
    #[must_use]
    pub fn object<'a>(properties: impl IntoIterator<Item = (&'a str, Shape)>) -> Self {
        Self::of(Kind::Object {
            properties: properties
                .into_iter()
                .map(|(name, shape)| (name.to_string(), shape))
                .collect(),
        })
    }

    /// Creates a shape that accepts anything.
    #[must_use]
    pub fn any() -> Self {
        Self::of(Kind::Any)
    }

    /// Creates a shape that accepts only `null`.
    #[must_use]
    pub fn null() -> Self {
        Self::of(Kind::Null)
    }

    /// Allows the value to be absent.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Allows the value to be `null`.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Replaces every message produced at this node.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the minimum string length, in characters.
    #[must_use]
    pub fn min_length(mut self, len: usize) -> Self {
        if let Kind::String { min_length, .. } = &mut self.kind {
            *min_length = Some(len);
        }
        self
    }

    /// Sets the maximum string length, in characters.
    #[must_use]
    pub fn max_length(mut self, len: usize) -> Self {
        if let Kind::String { max_length, .. } = &mut self.kind {
            *max_length = Some(len);
        }
        self
    }

    /// Requires the string to match `regex`.
    #[must_use]
    pub fn pattern(mut self, regex: Regex) -> Self {
        if let Kind::String { pattern, .. } = &mut self.kind {
            *pattern = Some(regex);
        }
        self
    }

    /// Requires the string to look like an email address.
    #[must_use]
    pub fn email(mut self) -> Self {
        if let Kind::String { email, .. } = &mut self.kind {
            *email = true;
        }
        self
    }

    /// Sets the inclusive minimum of a number or integer.
    #[must_use]
    pub fn min(mut self, n: impl Into<f64>) -> Self {
        if let Kind::Integer { minimum, .. } | Kind::Number { minimum, .. } = &mut self.kind {
            *minimum = Some(n.into());
        }
        self
    }

    /// Sets the inclusive maximum of a number or integer.
    #[must_use]
    pub fn max(mut self, n: impl Into<f64>) -> Self {
        if let Kind::Integer { maximum, .. } | Kind::Number { maximum, .. } = &mut self.kind {
            *maximum = Some(n.into());
        }
        self
    }

    /// Sets the minimum number of array items.
    #[must_use]
    pub fn min_items(mut self, n: usize) -> Self {
        if let Kind::Array { min_items, .. } = &mut self.kind {
            *min_items = Some(n);
        }
        self
    }

    /// Sets the maximum number of array items.
    #[must_use]
    pub fn max_items(mut self, n: usize) -> Self {
        if let Kind::Array { max_items, .. } = &mut self.kind {
            *max_items = Some(n);
        }
        self
    }

    fn report(&self, path: &[String], errors: &mut ValidationErrors, message: String) {
        let field = if path.is_empty() {
            ROOT_FIELD.to_string()
        } else {
            path.join(".")
        };
        let message = self.message.clone().unwrap_or(message);
        // One node can fail several checks that share a custom message.
        if errors.get(&field).is_some_and(|existing| existing.contains(&message)) {
            return;
        }
        errors.add(field, message);
    }

    /// Returns the normalized value, or `None` when the value was absent or rejected.
    fn parse_at(
        &self,
        value: Option<&Value>,
        path: &mut Vec<String>,
        errors: &mut ValidationErrors,
    ) -> Option<Value> {
        let Some(value) = value else {
            if !self.optional {
                self.report(path, errors, "Required".to_string());
            }
            return None;
        };

        if value.is_null() && (self.nullable || matches!(self.kind, Kind::Any | Kind::Null)) {
            return Some(Value::Null);
        }

        match &self.kind {
            Kind::String {
                min_length,
                max_length,
                pattern,
                email,
            } => {
                let Some(s) = value.as_str() else {
                    self.report(path, errors, expected("string", value));
                    return None;
                };
                let len = s.chars().count();
                let mut ok = true;
                if let Some(min) = min_length.filter(|min| len < *min) {
                    self.report(
                        path,
                        errors,
                        format!("String must contain at least {min} character(s)"),
                    );
                    ok = false;
                }
                if let Some(max) = max_length.filter(|max| len > *max) {
                    self.report(
                        path,
                        errors,
                        format!("String must contain at most {max} character(s)"),
                    );
                    ok = false;
                }
                if *email && !looks_like_email(s) {
                    self.report(path, errors, "Invalid email".to_string());
                    ok = false;
                }
                if pattern.as_ref().is_some_and(|re| !re.is_match(s)) {
                    self.report(path, errors, "Invalid".to_string());
                    ok = false;
                }
                ok.then(|| value.clone())
            }

            Kind::Integer { minimum, maximum } | Kind::Number { minimum, maximum } => {
                let integer = matches!(self.kind, Kind::Integer { .. });
                let Some(n) = value.as_f64() else {
                    self.report(path, errors, expected("number", value));
                    return None;
                };
                let mut ok = true;
                if integer && n.fract().abs() > 0.0 {
                    self.report(path, errors, "Expected integer, received float".to_string());
                    ok = false;
                }
                if let Some(min) = minimum.filter(|min| n < *min) {
                    self.report(
                        path,
                        errors,
                        format!("Number must be greater than or equal to {min}"),
                    );
                    ok = false;
                }
                if let Some(max) = maximum.filter(|max| n > *max) {
                    self.report(
                        path,
                        errors,
                        format!("Number must be less than or equal to {max}"),
                    );
                    ok = false;
                }
                ok.then(|| value.clone())
            }

            Kind::Boolean => {
                if value.is_boolean() {
                    Some(value.clone())
                } else {
                    self.report(path, errors, expected("boolean", value));
                    None
                }
            }

            Kind::Array {
                items,
                min_items,
                max_items,
            } => {
                let Some(arr) = value.as_array() else {
                    self.report(path, errors, expected("array", value));
                    return None;
                };
                let mut ok = true;
                if let Some(min) = min_items.filter(|min| arr.len() < *min) {
                    self.report(
                        path,
                        errors,
                        format!("Array must contain at least {min} element(s)"),
                    );
                    ok = false;
                }
                if let Some(max) = max_items.filter(|max| arr.len() > *max) {
                    self.report(
                        path,
                        errors,
                        format!("Array must contain at most {max} element(s)"),
                    );
                    ok = false;
                }
                let mut parsed = Vec::with_capacity(arr.len());
                for (idx, item) in arr.iter().enumerate() {
                    path.push(idx.to_string());
                    match items.parse_at(Some(item), path, errors) {
                        Some(v) => parsed.push(v),
                        None => ok = false,
                    }
                    path.pop();
                }
                ok.then_some(Value::Array(parsed))
            }

            Kind::Object { properties } => {
                let Some(obj) = value.as_object() else {
                    self.report(path, errors, expected("object", value));
                    return None;
                };
                let mut ok = true;
                let mut parsed = Map::new();
                for (name, shape) in properties {
                    path.push(name.clone());
                    let field = shape.parse_at(obj.get(name), path, errors);
                    path.pop();
                    match field {
                        Some(v) => {
                            parsed.insert(name.clone(), v);
                        }
                        None if obj.contains_key(name) || !shape.optional => ok = false,
                        None => {}
                    }
                }
                ok.then_some(Value::Object(parsed))
            }

            Kind::Any => Some(value.clone()),

            Kind::Null => {
                self.report(path, errors, expected("null", value));
                None
            }
        }
    }
}

impl Schema for Shape {
    fn parse(&self, value: &Value) -> Result<Value, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut path = Vec::new();
        let parsed = self.parse_at(Some(value), &mut path, &mut errors);
        match parsed {
            Some(v) if errors.is_empty() => Ok(v),
            _ => Err(errors),
        }
    }
}

fn expected(type_name: &str, value: &Value) -> String {
    format!("Expected {type_name}, received {}", value_type_name(value))
}

/// Returns a human-readable name for a JSON value type.
fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn looks_like_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !s.chars().any(char::is_whitespace)
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}
