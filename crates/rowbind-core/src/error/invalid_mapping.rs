use super::Error;

/// Error when a mapping declaration is structurally invalid.
///
/// This occurs when:
/// - An entry type declares no tables
/// - A member is declared twice, or a key names a member that does not exist
/// - An identity or discriminator member has an unsupported type
/// - Inheritance declarations disagree (duplicate codes, missing default,
///   conflicting discriminators)
/// - An unresolved association is traversed
///
/// A model whose build fails with this error is discarded and never cached.
#[derive(Debug)]
pub(super) struct InvalidMapping {
    message: Box<str>,
}

impl std::error::Error for InvalidMapping {}

impl core::fmt::Display for InvalidMapping {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid mapping: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid mapping error.
    pub fn invalid_mapping(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidMapping(InvalidMapping {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid mapping error.
    pub fn is_invalid_mapping(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidMapping(_))
    }
}
