//! Domain factories for creating domain entities and value objects.

use super::{ConnectionId, error::ValueObjectError};

/// Factory for generating ConnectionId instances.
///
/// Connection identities are assigned by the server, never by clients, so
/// generation lives here rather than in the validating constructor.
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// Generate a new ConnectionId from a random UUID v4.
    ///
    /// # Errors
    ///
    /// This method should not fail in practice, but returns Result for consistency
    /// with the domain error handling pattern.
    pub fn generate() -> Result<ConnectionId, ValueObjectError> {
        let uuid = uuid::Uuid::new_v4();
        ConnectionId::new(uuid.to_string())
    }
}
