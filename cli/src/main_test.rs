mod tests {
    use crate::*;

    #[test]
    fn test_env_toggle_enabled() {
        assert!(env_toggle_enabled("1"));
        assert!(env_toggle_enabled("true"));
        assert!(env_toggle_enabled("nbench::harness=trace"));
        assert!(!env_toggle_enabled(""));
        assert!(!env_toggle_enabled("  "));
        assert!(!env_toggle_enabled("0"));
        assert!(!env_toggle_enabled("FALSE"));
        assert!(!env_toggle_enabled("off"));
    }

    #[test]
    fn test_filter_expr_from() {
        assert_eq!(filter_expr_from("1"), None);
        assert_eq!(filter_expr_from("On"), None);
        assert_eq!(filter_expr_from(""), None);
        assert_eq!(
            filter_expr_from(" nbench::workload=trace "),
            Some("nbench::workload=trace".to_string())
        );
    }

    #[test]
    fn test_default_trace_filter_parses() {
        assert!(tracing_subscriber::EnvFilter::try_new(DEFAULT_TRACE_FILTER).is_ok());
    }

    #[test]
    fn test_cli_args_accepts_no_arguments() {
        assert!(CliArgs::try_parse_from(["nbench"]).is_ok());
    }

    #[test]
    fn test_cli_args_rejects_positional() {
        let err = CliArgs::try_parse_from(["nbench", "fib"]).expect_err("no positional arguments");
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_cli_args_rejects_unknown_flag() {
        assert!(CliArgs::try_parse_from(["nbench", "--quick"]).is_err());
    }
}
