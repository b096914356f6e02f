use std::{fmt, path::PathBuf};

/// Conditions that abandon a translation unit.
#[derive(Debug)]
pub enum TranslationError {
    Io(PathBuf, std::io::Error),
    Config(PathBuf, String),
    Template(String),
    Recursion(PathBuf),
    Halted,
}

impl fmt::Display for TranslationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationError::Io(path, error) => {
                write!(f, "{}: {}", path.display(), error)
            }
            TranslationError::Config(path, details) => {
                write!(f, "{}: configuration failed: {}", path.display(), details)
            }
            TranslationError::Template(details) => {
                write!(f, "page template failed: {}", details)
            }
            TranslationError::Recursion(path) => {
                write!(f, "{}: includes nested too deeply", path.display())
            }
            TranslationError::Halted => write!(f, "user interrupt"),
        }
    }
}

impl std::error::Error for TranslationError {}

impl TranslationError {
    pub fn code(&self) -> ExitCode {
        match self {
            TranslationError::Io(_, _) => ExitCode::Io,
            TranslationError::Config(_, _) => ExitCode::Fatal,
            TranslationError::Template(_) => ExitCode::Fatal,
            TranslationError::Recursion(_) => ExitCode::Error,
            TranslationError::Halted => ExitCode::UserHalt,
        }
    }
}

/// The result of a translation unit, also the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ExitCode {
    Okay = 0,
    Error = 1,
    Usage = 2,
    Fatal = 3,
    UserHalt = 4,
    Io = 5,
}

impl ExitCode {
    pub fn value(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExitCode::Okay => "okay",
            ExitCode::Error => "error",
            ExitCode::Usage => "usage",
            ExitCode::Fatal => "fatal",
            ExitCode::UserHalt => "halted",
            ExitCode::Io => "i/o failure",
        };
        write!(f, "{}", name)
    }
}
