//! Error handling tests for swiftflight
//!
//! Tests for parse errors, the error type surface, and lint findings.

use swiftflight::{check, format, lint, Error};

mod parse_errors {
    use super::*;

    #[test]
    fn missing_type_name() {
        assert!(format("struct {").is_err());
    }

    #[test]
    fn unclosed_parameter_list() {
        assert!(format("func f(a: Int").is_err());
    }

    #[test]
    fn unclosed_block() {
        assert!(format("struct S {").is_err());
    }

    #[test]
    fn unterminated_string() {
        assert!(format("let s = \"abc").is_err());
    }

    #[test]
    fn unterminated_block_comment() {
        assert!(format("/* never closed\nlet a = 1").is_err());
    }

    #[test]
    fn missing_endif() {
        assert!(format("#if X\nlet a = 1").is_err());
    }

    #[test]
    fn parse_error_names_the_location() {
        let err = format("struct {").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Parse error"), "got: {}", message);
        assert!(message.contains("line 1"), "got: {}", message);
    }

    #[test]
    fn parse_error_is_the_right_variant() {
        let err = format("struct {").unwrap_err();
        assert!(matches!(err, Error::ParseError { .. }));
    }
}

mod error_type {
    use super::*;

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::IoError(_)));
    }

    #[test]
    fn display_is_prefixed_by_kind() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(err.to_string().starts_with("IO error"));
    }
}

mod check_api {
    use super::*;

    #[test]
    fn formatted_input_checks_clean() {
        assert!(check("let a = 1\n").expect("check should succeed"));
    }

    #[test]
    fn unformatted_input_reports_dirty() {
        assert!(!check("let a=1").expect("check should succeed"));
    }

    #[test]
    fn check_propagates_parse_errors() {
        assert!(check("struct {").is_err());
    }
}

mod lint_api {
    use super::*;

    #[test]
    fn cramped_comment_is_reported() {
        let diagnostics = lint("let a = 1 //bad").expect("lint should succeed");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, 1);
        assert!(diagnostics[0].message.contains("space"));
    }

    #[test]
    fn well_spaced_comment_is_clean() {
        let diagnostics = lint("let a = 1 // good").expect("lint should succeed");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn lint_does_not_require_formatted_input() {
        let diagnostics = lint("let   a=1").expect("lint should succeed");
        assert!(diagnostics.is_empty());
    }
}
