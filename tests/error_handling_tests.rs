use std::error::Error;
use termlink::{SerialFault, TermLinkError, TermLinkResult};

/// Error handling and resilience tests
#[cfg(test)]
mod error_handling_tests {
    use super::*;

    #[test]
    fn test_error_types() {
        let errors = vec![
            TermLinkError::Fault(SerialFault::Framing),
            TermLinkError::Network { message: "connection refused".to_string() },
            TermLinkError::Config { message: "Config error".to_string() },
            TermLinkError::Discovery { message: "address in use".to_string() },
            TermLinkError::NotConnected,
            TermLinkError::InvalidInput("Invalid input".to_string()),
            TermLinkError::Output("Output error".to_string()),
            TermLinkError::Tui("TUI error".to_string()),
        ];

        for error in errors {
            assert!(!error.to_string().is_empty(), "Error display should not be empty");
        }

        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TermLinkError>();
    }

    #[test]
    fn test_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let error: TermLinkError = io_error.into();
        assert!(matches!(error, TermLinkError::Io(_)));
        assert!(error.source().is_some());

        let error: TermLinkError = SerialFault::PermissionDenied.into();
        assert!(matches!(error, TermLinkError::Fault(SerialFault::PermissionDenied)));
        assert!(error.to_string().contains("permission denied"));
    }

    #[test]
    fn test_result_propagation() {
        fn open() -> TermLinkResult<()> {
            let opened: Result<(), SerialFault> = Err(SerialFault::DeviceNotFound);
            opened?;
            Ok(())
        }
        fn connect() -> TermLinkResult<u32> {
            open()?;
            Ok(1)
        }

        assert!(matches!(connect(), Err(TermLinkError::Fault(SerialFault::DeviceNotFound))));
    }

    #[test]
    fn test_fault_classification_is_total() {
        let transient: Vec<SerialFault> = SerialFault::ALL
            .into_iter()
            .filter(|fault| !fault.is_fatal())
            .collect();

        assert_eq!(
            transient,
            vec![
                SerialFault::Parity,
                SerialFault::Framing,
                SerialFault::BreakCondition,
                SerialFault::WriteFailure,
                SerialFault::ReadFailure,
            ]
        );
        assert_eq!(SerialFault::ALL.iter().filter(|fault| fault.is_fatal()).count(), 8);
    }

    #[test]
    fn test_fault_serialization() {
        let json = serde_json::to_string(&SerialFault::ResourceDisappeared).unwrap();
        assert_eq!(json, "\"resource_disappeared\"");
    }
}
