//! Command-line options for the `loopc` driver.

use std::{fmt::Display, path::PathBuf, str::FromStr};

use thiserror::Error;

pub const USAGE: &str = "usage: loopc [--emit ir|dot|ast|tokens] [-o <path>] [-v|-vv] <file>";

/// Which artifact the driver writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Emit {
    #[default]
    Ir,
    Dot,
    Ast,
    Tokens,
}

impl FromStr for Emit {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ir" => Ok(Emit::Ir),
            "dot" => Ok(Emit::Dot),
            "ast" => Ok(Emit::Ast),
            "tokens" => Ok(Emit::Tokens),
            other => Err(ConfigError::UnknownEmit {
                value: other.to_string(),
            }),
        }
    }
}

impl Display for Emit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Emit::Ir => write!(f, "ir"),
            Emit::Dot => write!(f, "dot"),
            Emit::Ast => write!(f, "ast"),
            Emit::Tokens => write!(f, "tokens"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("no input file given")]
    MissingInput,
    #[error("expected exactly one input file, got {count}")]
    TooManyInputs { count: usize },
    #[error("option {option} requires a value")]
    MissingValue { option: String },
    #[error("unknown emit kind {value:?}, expected one of ir, dot, ast, tokens")]
    UnknownEmit { value: String },
    #[error("unknown option {option:?}")]
    UnknownOption { option: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub input: PathBuf,
    pub emit: Emit,
    /// Output file; stdout when absent
    pub output: Option<PathBuf>,
    /// 0 = warnings, 1 = info (`-v`), 2 and up = debug (`-vv`)
    pub verbosity: u8,
}

impl Options {
    /// Parses the arguments that follow the program name.
    pub fn from_args<I>(args: I) -> Result<Options, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let mut inputs = Vec::new();
        let mut emit = Emit::default();
        let mut output = None;
        let mut verbosity = 0;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--emit" => emit = Self::value_for(&arg, args.next())?.parse()?,
                "-o" => output = Some(PathBuf::from(Self::value_for(&arg, args.next())?)),
                "-v" => verbosity += 1,
                "-vv" => verbosity += 2,
                _ if arg.starts_with("--emit=") => emit = arg["--emit=".len()..].parse()?,
                _ if arg.starts_with('-') && arg.len() > 1 => {
                    return Err(ConfigError::UnknownOption {
                        option: arg.clone(),
                    })
                }
                _ => inputs.push(PathBuf::from(arg)),
            }
        }

        let input = match inputs.len() {
            0 => return Err(ConfigError::MissingInput),
            1 => inputs.remove(0),
            count => return Err(ConfigError::TooManyInputs { count }),
        };

        Ok(Options {
            input,
            emit,
            output,
            verbosity,
        })
    }

    fn value_for(option: &str, value: Option<String>) -> Result<String, ConfigError> {
        value.ok_or_else(|| ConfigError::MissingValue {
            option: option.to_string(),
        })
    }

    /// The default log filter for this verbosity; `RUST_LOG` takes precedence.
    pub fn log_filter(&self) -> &'static str {
        match self.verbosity {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }

    /// The input's file name, used for positions and the module name.
    pub fn file_name(&self) -> String {
        self.input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.input.to_string_lossy().into_owned())
    }
}
