use std::fmt;
use std::path::PathBuf;

/// An error that prevents a report from being produced
///
/// Problems inside the sections never surface here. They are recorded as
/// [`Anomaly`](crate::Anomaly) values on the report instead.
#[derive(Debug)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub(crate) fn new(kind: ErrorKind) -> Error {
        Error(Box::new(kind))
    }

    /// Return the specific type of error
    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }
}

/// Specific type of error
#[derive(Debug)]
pub enum ErrorKind {
    /// The buffer cannot even hold the file header
    FileTooSmall { len: usize },

    /// The game state file does not exist
    PathNotFound(PathBuf),

    /// No path was given and there is no default location for this platform
    NoDefaultPath,

    /// Any other failure reading the file
    Io(std::io::Error),
}

impl ErrorKind {
    /// Process exit code the binaries report for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorKind::PathNotFound(_) | ErrorKind::NoDefaultPath => 2,
            ErrorKind::FileTooSmall { .. } => 3,
            ErrorKind::Io(_) => 1,
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self.0 {
            ErrorKind::Io(ref err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self.0 {
            ErrorKind::FileTooSmall { len } => write!(
                f,
                "file too small: {} bytes is less than the {} byte header",
                len,
                crate::FileHeader::SIZE
            ),
            ErrorKind::PathNotFound(ref path) => write!(f, "file not found: {}", path.display()),
            ErrorKind::NoDefaultPath => write!(
                f,
                "no file given and the default game state location is unknown"
            ),
            ErrorKind::Io(ref err) => write!(f, "io error: {}", err),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::new(kind)
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::new(ErrorKind::Io(error))
    }
}
