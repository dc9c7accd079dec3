use std::io;

use thiserror::Error;
use tracing::{debug, info};

use crate::calc_engine::{
    evaluate_with_trace, unbound_variables, EvaluationTrace, Function, ParseError, Step, Variables,
};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("'{0}' is not a valid variable name")]
    InvalidName(String),
    #[error("'{0}' is a function and cannot be assigned")]
    ReservedName(String),
    #[error("could not read a value for '{name}': {source}")]
    Prompt {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Supplies values for variables an expression uses but the session has
/// not bound yet. The line front end asks the user.
pub trait VariableSource {
    fn value_for(&mut self, name: &str) -> io::Result<f64>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub expression: String,
    pub value: f64,
    pub postfix: Option<String>,
    pub steps: Vec<Step>,
    /// Variables that were unbound and read as 0.
    pub defaulted: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Assignment { name: String, value: f64 },
    Evaluation(Evaluation),
    /// Snapshot of the bindings, for the `vars` command.
    Listing(Vec<(String, f64)>),
}

/// Splits `name = expression`. Returns `None` when the input has no `=`.
pub fn split_assignment(input: &str) -> Option<(&str, &str)> {
    let (name, expression) = input.split_once('=')?;
    Some((name.trim(), expression.trim()))
}

fn check_name(name: &str) -> Result<(), SessionError> {
    let mut chars = name.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_alphabetic())
        && chars.all(|c| c.is_alphanumeric());
    if !valid {
        return Err(SessionError::InvalidName(name.to_string()));
    }
    if Function::from_name(name).is_some() {
        return Err(SessionError::ReservedName(name.to_string()));
    }
    Ok(())
}

/// Variable bindings that live across the inputs of one interactive run.
#[derive(Debug, Default)]
pub struct Session {
    variables: Variables,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    /// Bindings sorted by name.
    pub fn bindings(&self) -> Vec<(&str, f64)> {
        let mut bindings: Vec<(&str, f64)> = self
            .variables
            .iter()
            .map(|(name, value)| (name.as_str(), *value))
            .collect();
        bindings.sort_by(|a, b| a.0.cmp(b.0));
        bindings
    }

    pub fn listing(&self) -> Entry {
        Entry::Listing(
            self.bindings()
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        )
    }

    pub fn bind(&mut self, name: &str, value: f64) -> Result<(), SessionError> {
        check_name(name)?;
        debug!(variable = name, value, "bound variable");
        self.variables.insert(name.to_string(), value);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.variables.clear();
    }

    /// Asks `source` for every variable in `expression` that is still
    /// unbound and binds the answers. Each name is asked for once.
    pub fn resolve(
        &mut self,
        expression: &str,
        source: &mut impl VariableSource,
    ) -> Result<(), SessionError> {
        let names = unbound_variables(expression, &self.variables)?;
        for name in &names {
            check_name(name)?;
        }

        for name in names {
            let value = source.value_for(&name).map_err(|e| SessionError::Prompt {
                name: name.clone(),
                source: e,
            })?;
            self.bind(&name, value)?;
        }
        Ok(())
    }

    /// Runs one line of input: either `name = expression` or a plain
    /// expression.
    pub fn run(&mut self, input: &str, detailed: bool) -> Result<Entry, SessionError> {
        if let Some((name, expression)) = split_assignment(input) {
            check_name(name)?;
            let value = self.evaluate(expression, false)?.value;
            self.bind(name, value)?;
            info!(variable = name, value, "assignment");
            return Ok(Entry::Assignment {
                name: name.to_string(),
                value,
            });
        }

        self.evaluate(input, detailed).map(Entry::Evaluation)
    }

    fn evaluate(&self, expression: &str, detailed: bool) -> Result<Evaluation, SessionError> {
        let mut trace = EvaluationTrace::new(detailed);
        let value = evaluate_with_trace(expression, &self.variables, &mut trace)?;
        Ok(Evaluation {
            expression: expression.to_string(),
            value,
            postfix: trace.postfix,
            steps: trace.steps,
            defaulted: trace.defaulted,
        })
    }
}
