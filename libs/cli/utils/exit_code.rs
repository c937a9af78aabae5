use std::process::Termination;

/// Exit codes of the `huddle` binary, taken from `<sysexits.h>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// (EX_OK)
    Success = 0,

    /// Any failure without a more specific code.
    Error = 1,

    /// The backend rejected the submitted values. (EX_DATAERR)
    DataError = 65,

    /// The requested activity or profile does not exist. (EX_NOINPUT)
    NoInput = 66,

    /// The backend could not be reached or failed. (EX_UNAVAILABLE)
    Unavailable = 69,

    /// Signed out, or not allowed to perform the operation. (EX_NOPERM)
    PermissionDenied = 77,

    /// The configuration file is unreadable or invalid. (EX_CONFIG)
    ConfigError = 78,
}

impl ExitCode {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Allows `ExitCode` to be returned from `main`.
impl Termination for ExitCode {
    fn report(self) -> std::process::ExitCode {
        self.code().into()
    }
}
