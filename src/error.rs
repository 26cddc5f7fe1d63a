use std::convert::From;
use std::error;
use std::fmt;
use std::io;
use std::process::ExitStatus;
use std::result;

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: Option<String>,
}

#[derive(Debug)]
pub enum ErrorKind {
    InvalidConfiguration,
    ConfigParse,
    EventSourceUnavailable,
    TemplateNotFound,
    TemplateRender,
    ToolNotFound,
    CompileFailed(ExitStatus),
    IOError(io::Error),
}

impl Error {
    pub fn new(kind: ErrorKind, msg: &str) -> Self {
        Error {
            kind,
            message: Some(msg.to_owned()),
        }
    }

    pub fn with_msg(mut self, message: &str) -> Self {
        self.message = Some(message.to_owned());
        self
    }

    pub fn invalid_config(msg: &str) -> Self {
        Error::new(ErrorKind::InvalidConfiguration, msg)
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            kind,
            message: None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(io_error: io::Error) -> Error {
        Error::from(ErrorKind::IOError(io_error))
    }
}

impl From<toml::de::Error> for Error {
    fn from(toml_error: toml::de::Error) -> Error {
        Error::new(ErrorKind::ConfigParse, &toml_error.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(csv_error: csv::Error) -> Error {
        Error::new(ErrorKind::EventSourceUnavailable, &csv_error.to_string())
    }
}

impl From<minijinja::Error> for Error {
    fn from(template_error: minijinja::Error) -> Error {
        let kind = match template_error.kind() {
            minijinja::ErrorKind::TemplateNotFound => ErrorKind::TemplateNotFound,
            _ => ErrorKind::TemplateRender,
        };
        Error::new(kind, &template_error.to_string())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{}: {}", self.kind.as_str(), msg),
            None => write!(f, "{}", self.kind.as_str()),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match &self.kind {
            ErrorKind::IOError(err) => Some(err),
            _ => None,
        }
    }
}

impl ErrorKind {
    pub fn as_str(&self) -> String {
        match self {
            ErrorKind::InvalidConfiguration => "invalid configuration".to_owned(),
            ErrorKind::ConfigParse => "invalid config file".to_owned(),
            ErrorKind::EventSourceUnavailable => "event source unavailable".to_owned(),
            ErrorKind::TemplateNotFound => "template not found".to_owned(),
            ErrorKind::TemplateRender => "could not render template".to_owned(),
            ErrorKind::ToolNotFound => "tool not found".to_owned(),
            ErrorKind::CompileFailed(status) => format!("compilation failed ({})", status),
            ErrorKind::IOError(err) => err.to_string(),
        }
    }
}
