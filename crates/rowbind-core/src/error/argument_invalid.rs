use super::Error;

/// Error when a required input is missing or structurally unusable.
///
/// This occurs when:
/// - No entry type is supplied to a mapping source
/// - An instance handed to an accessor is not of the accessor's owning type
/// - A member is used in a way its kind does not support (reading a column
///   value from an association member)
///
/// Raised before any state is touched.
#[derive(Debug)]
pub(super) struct ArgumentInvalid {
    message: Box<str>,
}

impl std::error::Error for ArgumentInvalid {}

impl core::fmt::Display for ArgumentInvalid {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid argument: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid argument error.
    pub fn argument_invalid(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::ArgumentInvalid(ArgumentInvalid {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid argument error.
    pub fn is_argument_invalid(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::ArgumentInvalid(_))
    }
}
