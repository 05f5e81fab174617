//! # Framework Errors
//!
//! Errors produced by the actor plumbing itself. Entity-level failures travel boxed inside
//! [`FrameworkError::EntityError`] and are recovered by the typed clients.

/// Errors that can occur within the actor framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

impl FrameworkError {
    /// Recovers the entity's own error type, if that is what this error carries.
    ///
    /// Returns the framework error unchanged when it is plumbing-level or carries a
    /// different error type.
    pub fn into_entity_error<E>(self) -> Result<E, FrameworkError>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        match self {
            FrameworkError::EntityError(inner) => match inner.downcast::<E>() {
                Ok(err) => Ok(*err),
                Err(other) => Err(FrameworkError::EntityError(other)),
            },
            other => Err(other),
        }
    }

    /// True for failures of the channel transport rather than of the request.
    pub fn is_transport(&self) -> bool {
        matches!(self, FrameworkError::ActorClosed | FrameworkError::ActorDropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error, PartialEq)]
    #[error("boom")]
    struct Boom;

    #[test]
    fn test_entity_error_round_trips_through_box() {
        let err = FrameworkError::EntityError(Box::new(Boom));
        assert_eq!(err.into_entity_error::<Boom>().unwrap(), Boom);
    }

    #[test]
    fn test_foreign_entity_error_is_preserved() {
        let err = FrameworkError::EntityError(Box::new(std::io::Error::other("disk")));
        let back = err.into_entity_error::<Boom>().unwrap_err();
        assert!(back.to_string().contains("disk"));
    }

    #[test]
    fn test_transport_classification() {
        assert!(FrameworkError::ActorClosed.is_transport());
        assert!(FrameworkError::ActorDropped.is_transport());
        assert!(!FrameworkError::NotFound("order_1".into()).is_transport());
    }
}
