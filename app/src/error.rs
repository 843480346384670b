use std::{
    borrow::Cow,
    fmt::{Debug, Display},
    process::ExitCode,
};

pub enum Error {
    InvalidField(&'static str),
    Io(std::io::Error),
    Mpw(mpw::Error),
    NoHome,
    NoUser,
    Toml(toml::de::Error),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidField(field) => write!(f, "invalid value for `{field}`"),
            Self::Io(e) => Display::fmt(e, f),
            Self::Mpw(e) => Display::fmt(e, f),
            Self::NoHome => f.write_str("could not determine home directory"),
            Self::NoUser => {
                f.write_str("no user name given (pass --user or set `user` in the config file)")
            }
            Self::Toml(e) => write!(f, "could not parse TOML config: {e}"),
        }
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<toml::de::Error> for Error {
    fn from(value: toml::de::Error) -> Self {
        Self::Toml(value)
    }
}

impl From<mpw::Error> for Error {
    fn from(value: mpw::Error) -> Self {
        Self::Mpw(value)
    }
}

pub struct Context {
    error: Error,
    context: Option<Cow<'static, str>>,
}

impl Context {
    /// Generator faults are distinguished from ordinary I/O and usage
    /// errors in the exit status.
    pub fn exit_code(&self) -> ExitCode {
        match self.error {
            Error::Mpw(_) => ExitCode::from(2),
            _ => ExitCode::FAILURE,
        }
    }
}

impl Display for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(context) = &self.context {
            write!(f, "{}: {}", context, self.error)
        } else {
            Display::fmt(&self.error, f)
        }
    }
}

impl Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl From<Error> for Context {
    fn from(error: Error) -> Self {
        Self {
            error,
            context: None,
        }
    }
}

impl From<mpw::Error> for Context {
    fn from(error: mpw::Error) -> Self {
        Error::Mpw(error).into()
    }
}

pub trait ResultExt<T> {
    fn context<C: Into<Cow<'static, str>>>(self, context: C) -> Result<T, Context>;
}

impl<T, E: Into<Error>> ResultExt<T> for Result<T, E> {
    fn context<C: Into<Cow<'static, str>>>(self, context: C) -> Result<T, Context> {
        self.map_err(|e| Context {
            error: e.into(),
            context: Some(context.into()),
        })
    }
}
