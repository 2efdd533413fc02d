//! Assertions that return the checked value or raise a caller-chosen error.
//!
//! The error to raise is described by an [`ExceptionSpec`] and only built on
//! the failure path:
//!
//! ```ignore
//! let n = ensure(true, is_valid, ExceptionSpec::Default)?;
//! let n = ensure(true, is_valid, "the message")?;
//! let n = ensure(true, is_valid, ExceptionSpec::construct("http", vec![json!("gone"), json!(410)]))?;
//! let n = ensure(true, is_valid, Error::failure("prebuilt"))?;
//! ```
//!
//! Type identifiers are resolved through the alias table of an [`Ensurer`]
//! and then looked up in its constructor registry.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{Error, ErrorCode, Result};

/// Builds an error from constructor arguments.
pub type Constructor = Arc<dyn Fn(&[Value]) -> Result<Error> + Send + Sync>;

/// Alias installed by default: `http` resolves to the HTTP error type.
pub const HTTP_ALIAS: &str = "http";

/// What to raise when an assertion fails.
#[derive(Debug, Clone, Default)]
pub enum ExceptionSpec {
    /// Generic failure describing the two compared values.
    #[default]
    Default,
    /// Generic failure with this message.
    Message(String),
    /// Registered type identifier (or alias) plus constructor arguments.
    Construct { type_id: String, args: Vec<Value> },
    /// Raised as is.
    Prebuilt(Error),
}

impl ExceptionSpec {
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    pub fn construct(type_id: impl Into<String>, args: Vec<Value>) -> Self {
        Self::Construct {
            type_id: type_id.into(),
            args,
        }
    }
}

impl From<&str> for ExceptionSpec {
    fn from(message: &str) -> Self {
        Self::Message(message.to_string())
    }
}

impl From<String> for ExceptionSpec {
    fn from(message: String) -> Self {
        Self::Message(message)
    }
}

impl From<Error> for ExceptionSpec {
    fn from(error: Error) -> Self {
        Self::Prebuilt(error)
    }
}

impl From<Option<ExceptionSpec>> for ExceptionSpec {
    fn from(spec: Option<ExceptionSpec>) -> Self {
        spec.unwrap_or_default()
    }
}

/// Owns the alias table and the constructor registry used by `ensure`.
#[derive(Clone)]
pub struct Ensurer {
    aliases: BTreeMap<String, String>,
    constructors: HashMap<String, Constructor>,
}

impl std::fmt::Debug for Ensurer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut registered: Vec<&String> = self.constructors.keys().collect();
        registered.sort();
        f.debug_struct("Ensurer")
            .field("aliases", &self.aliases)
            .field("constructors", &registered)
            .finish()
    }
}

impl Default for Ensurer {
    fn default() -> Self {
        Self::new()
    }
}

pub fn default_aliases() -> BTreeMap<String, String> {
    let mut aliases = BTreeMap::new();
    aliases.insert(
        HTTP_ALIAS.to_string(),
        ErrorCode::HttpError.as_str().to_string(),
    );
    aliases
}

impl Ensurer {
    pub fn new() -> Self {
        Self::with_aliases(default_aliases())
    }

    pub fn with_aliases(aliases: BTreeMap<String, String>) -> Self {
        let mut ensurer = Self {
            aliases,
            constructors: HashMap::new(),
        };
        ensurer.register_builtins();
        ensurer
    }

    /// Ensurer configured from the loaded defaults.
    pub fn from_defaults(defaults: &crate::defaults::Defaults) -> Self {
        Self::with_aliases(defaults.exception_aliases.clone())
    }

    pub fn aliases(&self) -> &BTreeMap<String, String> {
        &self.aliases
    }

    /// Replace the whole alias table.
    pub fn set_aliases(&mut self, aliases: BTreeMap<String, String>) {
        self.aliases = aliases;
    }

    /// Register (or replace) the constructor for a type identifier.
    pub fn register<F>(&mut self, type_id: impl Into<String>, constructor: F)
    where
        F: Fn(&[Value]) -> Result<Error> + Send + Sync + 'static,
    {
        self.constructors.insert(type_id.into(), Arc::new(constructor));
    }

    pub fn is_registered(&self, type_id: &str) -> bool {
        self.constructors.contains_key(self.resolve(type_id))
    }

    /// Resolve an alias to its type identifier. Unknown names resolve to
    /// themselves.
    pub fn resolve<'a>(&'a self, type_id: &'a str) -> &'a str {
        self.aliases
            .get(type_id)
            .map(String::as_str)
            .unwrap_or(type_id)
    }

    /// Build the error described by `spec`.
    ///
    /// An unknown type identifier, or arguments its constructor rejects,
    /// produce a `validation.invalid_argument` error instead.
    pub fn build_error(&self, spec: ExceptionSpec) -> Error {
        self.build(spec, "assertion failed".to_string())
    }

    fn build(&self, spec: ExceptionSpec, fallback: String) -> Error {
        match spec {
            ExceptionSpec::Default => Error::failure(fallback),
            ExceptionSpec::Message(message) if message.is_empty() => Error::failure(fallback),
            ExceptionSpec::Message(message) => Error::failure(message),
            ExceptionSpec::Prebuilt(error) => error,
            ExceptionSpec::Construct { type_id, args } if args.is_empty() => {
                self.build(ExceptionSpec::Message(type_id), fallback)
            }
            ExceptionSpec::Construct { type_id, args } => {
                let resolved = self.resolve(&type_id);
                match self.constructors.get(resolved) {
                    Some(constructor) => constructor(&args).unwrap_or_else(|e| e),
                    None => Error::validation_invalid_argument(
                        "exception",
                        format!("Unknown exception type '{}'", type_id),
                        Some(resolved.to_string()),
                        Some(self.registered_ids()),
                    ),
                }
            }
        }
    }

    fn registered_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.constructors.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Return `actual` when it equals `expected`, otherwise the error built
    /// from `spec`.
    pub fn ensure<T>(&self, expected: T, actual: T, spec: impl Into<ExceptionSpec>) -> Result<T>
    where
        T: PartialEq + Display,
    {
        if expected == actual {
            return Ok(actual);
        }

        Err(self.build(
            spec.into(),
            format!("'{}' did not equal '{}'", expected, actual),
        ))
    }

    /// Return `actual` when it differs from `throw_on`, otherwise the error
    /// built from `spec`.
    pub fn ensure_not<T>(&self, throw_on: T, actual: T, spec: impl Into<ExceptionSpec>) -> Result<T>
    where
        T: PartialEq + Display,
    {
        if throw_on != actual {
            return Ok(actual);
        }

        Err(self.build(spec.into(), format!("'{}' equals '{}'", throw_on, actual)))
    }

    pub fn ensure_true(&self, condition: bool, spec: impl Into<ExceptionSpec>) -> Result<()> {
        self.ensure(true, condition, spec).map(|_| ())
    }

    pub fn ensure_false(&self, condition: bool, spec: impl Into<ExceptionSpec>) -> Result<()> {
        self.ensure(false, condition, spec).map(|_| ())
    }

    /// Unwrap `value`, raising the error built from `spec` on `None`.
    pub fn ensure_some<T>(&self, value: Option<T>, spec: impl Into<ExceptionSpec>) -> Result<T> {
        match value {
            Some(v) => Ok(v),
            None => Err(self.build(spec.into(), "value was None".to_string())),
        }
    }

    fn register_builtins(&mut self) {
        self.register(ErrorCode::GenericFailure.as_str(), |args| {
            let mut err = Error::failure(arg_string(args, 0, "message")?.unwrap_or_default());
            if let Some(code) = arg_int(args, 1, "code")? {
                err = err.with_numeric_code(code);
            }
            if let Some(previous) = arg_previous(args, 2)? {
                err = err.with_previous(previous);
            }
            Ok(err)
        });

        self.register(ErrorCode::ValidationInvalidArgument.as_str(), |args| {
            let message = arg_string(args, 0, "message")?.unwrap_or_default();
            let code = arg_int(args, 1, "code")?.unwrap_or(0);
            Ok(Error::validation_invalid_argument("value", message, None, None).with_numeric_code(code))
        });

        self.register(ErrorCode::ValidationUnexpectedValue.as_str(), |args| {
            let message = arg_string(args, 0, "message")?.unwrap_or_default();
            let code = arg_int(args, 1, "code")?.unwrap_or(0);
            Ok(Error::validation_unexpected_value("value", None, message).with_numeric_code(code))
        });

        self.register(ErrorCode::NumericOverflow.as_str(), |args| {
            let message = arg_string(args, 0, "message")?.unwrap_or_default();
            let code = arg_int(args, 1, "code")?.unwrap_or(0);
            Ok(Error::numeric_overflow("", "", message).with_numeric_code(code))
        });

        // message, http status code, code, previous, user message
        self.register(ErrorCode::HttpError.as_str(), |args| {
            let message =
                arg_string(args, 0, "message")?.unwrap_or_else(|| "Application Error".to_string());
            let status = arg_int(args, 1, "http status code")?.unwrap_or(500);
            let code = arg_int(args, 2, "code")?.unwrap_or(0);
            let user_message = arg_string(args, 4, "user message")?;

            let mut err = Error::http(message, status, user_message).with_numeric_code(code);
            if let Some(previous) = arg_previous(args, 3)? {
                err = err.with_previous(previous);
            }
            Ok(err)
        });
    }
}

fn arg_string(args: &[Value], index: usize, name: &str) -> Result<Option<String>> {
    match args.get(index) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(Error::validation_invalid_argument(
            name,
            format!("{} was not a string", name),
            None,
            None,
        )),
    }
}

fn arg_int(args: &[Value], index: usize, name: &str) -> Result<Option<i64>> {
    match args.get(index) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) if n.is_i64() => Ok(n.as_i64()),
        Some(_) => Err(Error::validation_invalid_argument(
            name,
            format!("{} was not an int", name),
            None,
            None,
        )),
    }
}

/// A previous error is given either as a bare message or as an object with
/// `message` and optional `code`.
fn arg_previous(args: &[Value], index: usize) -> Result<Option<Error>> {
    match args.get(index) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(message)) => Ok(Some(Error::failure(message.clone()))),
        Some(Value::Object(map)) => {
            let message = map.get("message").and_then(Value::as_str).unwrap_or_default();
            let code = map.get("code").and_then(Value::as_i64).unwrap_or(0);
            Ok(Some(Error::failure(message).with_numeric_code(code)))
        }
        Some(_) => Err(Error::validation_invalid_argument(
            "previous",
            "previous was not null, a string or an object",
            None,
            None,
        )),
    }
}

/// [`Ensurer::ensure`] with the default alias table. The default ensurer is
/// only built when the check fails.
pub fn ensure<T>(expected: T, actual: T, spec: impl Into<ExceptionSpec>) -> Result<T>
where
    T: PartialEq + Display,
{
    if expected == actual {
        return Ok(actual);
    }
    Ensurer::default().ensure(expected, actual, spec)
}

/// [`Ensurer::ensure_not`] with the default alias table.
pub fn ensure_not<T>(throw_on: T, actual: T, spec: impl Into<ExceptionSpec>) -> Result<T>
where
    T: PartialEq + Display,
{
    if throw_on != actual {
        return Ok(actual);
    }
    Ensurer::default().ensure_not(throw_on, actual, spec)
}

pub fn ensure_true(condition: bool, spec: impl Into<ExceptionSpec>) -> Result<()> {
    ensure(true, condition, spec).map(|_| ())
}

pub fn ensure_false(condition: bool, spec: impl Into<ExceptionSpec>) -> Result<()> {
    ensure(false, condition, spec).map(|_| ())
}

/// [`Ensurer::ensure_some`] with the default alias table.
pub fn ensure_some<T>(value: Option<T>, spec: impl Into<ExceptionSpec>) -> Result<T> {
    match value {
        Some(v) => Ok(v),
        None => Ensurer::default().ensure_some(None, spec),
    }
}
