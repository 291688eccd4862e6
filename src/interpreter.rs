use crate::environment::Environment;
use crate::evaluator::{self, Context};
use crate::types::{Symbol, Value};
use crate::{printer, reader};
use std::fmt;
use std::io::Write;

pub type Result<T = Value> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Read(reader::Error),
    Eval(evaluator::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Read(e) => write!(f, "syntax error: {}", e),
            Error::Eval(e) => write!(f, "{}", e),
        }
    }
}

impl From<reader::Error> for Error {
    fn from(e: reader::Error) -> Self {
        Self::Read(e)
    }
}

impl From<evaluator::Error> for Error {
    fn from(e: evaluator::Error) -> Self {
        Self::Eval(e)
    }
}

/// Reads and evaluates programs against one persistent environment.
///
/// Each call to [`run`](Self::run) is all-or-nothing: if the program fails,
/// the environment is left exactly as it was before the program started.
pub struct Interpreter {
    ctx: Context,
}

impl Interpreter {
    pub fn new() -> Self {
        Self {
            ctx: Context::default(),
        }
    }

    /// An interpreter whose `print` output goes to `output` instead of stdout.
    pub fn with_output(output: Box<dyn Write>) -> Self {
        Self {
            ctx: Context::new(Environment::default(), output),
        }
    }

    pub fn run(&mut self, source: &str) -> Result {
        let program = reader::read_str(source)?;
        self.ctx.env.snapshot();
        match evaluator::eval(&program, &mut self.ctx) {
            Ok(value) => {
                self.ctx.env.commit();
                Ok(value)
            }
            Err(e) => {
                self.ctx.env.restore();
                log::debug!("rolled back after error: {}", e);
                Err(e.into())
            }
        }
    }

    /// Runs one line of interactive input; nil results print nothing.
    pub fn rep(&mut self, line: &str) -> Result<Option<String>> {
        let value = self.run(line)?;
        Ok(match value.is_nil() {
            true => None,
            false => Some(printer::pr_str(&value)),
        })
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.ctx.env.get(&Symbol::from(name))
    }

    pub fn env(&self) -> &Environment {
        &self.ctx.env
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
