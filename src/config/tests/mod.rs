#[cfg(test)]
mod tests {
    use std::io::Write;
    use tempfile::NamedTempFile;
    use crate::config::parser::{load_config, load_or_default, parse_config, ConfigError};

    // Helper function to create a temporary file with content
    fn create_temp_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes()).expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_valid_configuration() {
        let config_yaml = r#"
        network:
          name: solana-devnet
          rpc_url: https://api.devnet.solana.com
          commitment: finalized
          request_timeout_secs: 5
        poller:
          interval_secs: 30
          minor_units_per_token: 1000000000
          display_decimals: 2
          token_symbol: SOL
        metrics:
          enabled: true
          port: 9100
        "#;

        let temp_file = create_temp_file(config_yaml);
        let config = load_config(temp_file.path()).expect("Failed to load valid config");

        assert_eq!(config.network.name, "solana-devnet");
        assert_eq!(config.network.rpc_url, "https://api.devnet.solana.com");
        assert_eq!(config.network.commitment, "finalized");
        assert_eq!(config.network.request_timeout_secs, 5);
        assert_eq!(config.poller.interval_secs, 30);
        assert_eq!(config.poller.display_decimals, 2);
        assert!(config.metrics.enabled);
        assert_eq!(config.metrics.port, 9100);
    }

    #[test]
    fn test_defaults_applied() {
        let config = parse_config("network:\n  name: mainnet\n").unwrap();

        assert_eq!(config.network.name, "mainnet");
        assert_eq!(config.network.rpc_url, "https://api.mainnet-beta.solana.com");
        assert_eq!(config.network.commitment, "confirmed");
        assert_eq!(config.poller.interval_secs, 15);
        assert_eq!(config.poller.minor_units_per_token, 1_000_000_000);
        assert_eq!(config.poller.display_decimals, 4);
        assert_eq!(config.poller.token_symbol, "SOL");
        assert!(!config.metrics.enabled);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = parse_config("   \n").unwrap();
        assert_eq!(config.poller.interval_secs, 15);
        assert_eq!(config.network.name, "solana-mainnet");
    }

    #[test]
    fn test_invalid_rpc_url() {
        let result = parse_config("network:\n  rpc_url: not a url\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_invalid_commitment() {
        let result = parse_config("network:\n  commitment: eventually\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_zero_divisor_rejected() {
        let result = parse_config("poller:\n  minor_units_per_token: 0\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_timeout_must_be_shorter_than_interval() {
        let result = parse_config("network:\n  request_timeout_secs: 40\npoller:\n  interval_secs: 15\n");
        assert!(matches!(result, Err(ConfigError::Other(_))));

        let result = parse_config("network:\n  request_timeout_secs: 15\npoller:\n  interval_secs: 15\n");
        assert!(matches!(result, Err(ConfigError::Other(_))));

        let config = parse_config("network:\n  request_timeout_secs: 14\npoller:\n  interval_secs: 15\n").unwrap();
        assert_eq!(config.network.request_timeout_secs, 14);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let result = parse_config("poller:\n  interval_secs: 0\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_too_many_decimals_rejected() {
        let result = parse_config("poller:\n  display_decimals: 12\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_invalid_yaml() {
        let result = parse_config("poller: [unterminated");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_missing_explicit_file() {
        let result = load_or_default(Some(std::path::Path::new(
            "/nonexistent/novapay/config.yaml",
        )));
        assert!(matches!(result, Err(ConfigError::FileError(_))));
    }
}
