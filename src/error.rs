use crate::parse::TokenizeError;

#[derive(Debug)]
pub enum ShellError {
    Readline(rustyline::error::ReadlineError),
    Io(std::io::Error),
    Input(std::io::Error),
    Allocation,
    FlagError(String),
}

impl From<rustyline::error::ReadlineError> for ShellError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        ShellError::Readline(err)
    }
}

impl From<std::io::Error> for ShellError {
    fn from(err: std::io::Error) -> Self {
        ShellError::Io(err)
    }
}

impl From<TokenizeError> for ShellError {
    fn from(err: TokenizeError) -> Self {
        match err {
            TokenizeError::Allocation => ShellError::Allocation,
        }
    }
}

impl std::fmt::Display for ShellError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShellError::Readline(e) => write!(f, "readline error: {}", e),
            ShellError::Io(e) => write!(f, "IO error: {}", e),
            ShellError::Input(e) => write!(f, "failed to read input: {}", e),
            ShellError::Allocation => write!(f, "allocation error"),
            ShellError::FlagError(msg) => write!(f, "flag error: {}", msg),
        }
    }
}

impl std::error::Error for ShellError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShellError::Readline(e) => Some(e),
            ShellError::Io(e) | ShellError::Input(e) => Some(e),
            ShellError::Allocation | ShellError::FlagError(_) => None,
        }
    }
}
