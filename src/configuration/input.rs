//! Initial conditions in the flat whitespace format:
//!
//! ```text
//! G  numBodies  timeSteps
//! mass  x y z  vx vy vz
//! ...
//! ```
//!
//! Exactly `numBodies` records of seven numbers must follow the header.
//! Line breaks carry no meaning; tokens are read in order.

use std::fs;
use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("input ended before {field}")]
    MissingValue { field: String },
    #[error("invalid value for {field}: {token:?}")]
    InvalidNumber { field: String, token: String },
    #[error("{field} is not finite")]
    NonFinite { field: String },
    #[error("body {body} has non-positive mass {mass}")]
    NonPositiveMass { body: usize, mass: f64 },
}

/// Initial state for one body, as read from the input
#[derive(Debug, Clone, PartialEq)]
pub struct BodyConfig {
    pub m: f64,
    pub x: [f64; 3],
    pub v: [f64; 3],
}

/// Everything the input file provides
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioConfig {
    pub g: f64,
    pub time_steps: usize,
    pub bodies: Vec<BodyConfig>,
}

pub fn load_input(path: &Path) -> Result<ScenarioConfig, InputError> {
    let text = fs::read_to_string(path)?;
    parse_input(&text)
}

pub fn parse_input(text: &str) -> Result<ScenarioConfig, InputError> {
    let mut tokens = Tokens(text.split_whitespace());

    let g = tokens.float("G")?;
    let num_bodies = tokens.count("numBodies")?;
    let time_steps = tokens.count("timeSteps")?;

    let mut bodies = Vec::with_capacity(num_bodies.min(1 << 16));
    for n in 1..=num_bodies {
        let m = tokens.float(&format!("mass of body {n}"))?;
        if m <= 0.0 {
            return Err(InputError::NonPositiveMass { body: n, mass: m });
        }
        let mut x = [0.0; 3];
        for (axis, c) in ["x", "y", "z"].iter().zip(x.iter_mut()) {
            *c = tokens.float(&format!("{axis} of body {n}"))?;
        }
        let mut v = [0.0; 3];
        for (axis, c) in ["vx", "vy", "vz"].iter().zip(v.iter_mut()) {
            *c = tokens.float(&format!("{axis} of body {n}"))?;
        }
        bodies.push(BodyConfig { m, x, v });
    }

    let trailing = tokens.0.count();
    if trailing > 0 {
        log::warn!("ignoring {trailing} trailing token(s) after body {num_bodies}");
    }

    Ok(ScenarioConfig { g, time_steps, bodies })
}

struct Tokens<'a>(std::str::SplitWhitespace<'a>);

impl<'a> Tokens<'a> {
    fn next(&mut self, field: &str) -> Result<&'a str, InputError> {
        self.0.next().ok_or_else(|| InputError::MissingValue { field: field.to_string() })
    }

    fn float(&mut self, field: &str) -> Result<f64, InputError> {
        let token = self.next(field)?;
        let value: f64 = token.parse().map_err(|_| InputError::InvalidNumber {
            field: field.to_string(),
            token: token.to_string(),
        })?;
        if !value.is_finite() {
            return Err(InputError::NonFinite { field: field.to_string() });
        }
        Ok(value)
    }

    fn count(&mut self, field: &str) -> Result<usize, InputError> {
        let token = self.next(field)?;
        token.parse().map_err(|_| InputError::InvalidNumber {
            field: field.to_string(),
            token: token.to_string(),
        })
    }
}
