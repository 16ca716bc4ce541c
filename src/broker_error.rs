use thiserror::Error;

/// Errors returned by broker operations.
///
/// Publishing and unsubscribing never fail; a publish that reaches nobody is
/// not an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrokerError {
    /// The subscriber was already dropped when the subscription was attempted.
    #[error("subscriber of type {type_name} is no longer alive")]
    InvalidSubscriber { type_name: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_subscriber_display() {
        let err = BrokerError::InvalidSubscriber { type_name: "demo::Listener" };
        assert_eq!(
            err.to_string(),
            "subscriber of type demo::Listener is no longer alive"
        );
    }

    #[test]
    fn test_debug_format() {
        let err = BrokerError::InvalidSubscriber { type_name: "u8" };
        assert_eq!(format!("{:?}", err), "InvalidSubscriber { type_name: \"u8\" }");
    }

    #[test]
    fn test_error_trait() {
        let err: &dyn std::error::Error = &BrokerError::InvalidSubscriber { type_name: "u8" };
        assert!(err.source().is_none());
    }
}
