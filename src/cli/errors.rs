//! User-facing help for startup errors.

use crate::config::{ENV_API_KEY, ENV_MCP_ENDPOINT};
use crate::error::AppError;

/// Map an [`AppError`] to a help string with actionable guidance.
pub fn format_error_help(err: &AppError) -> String {
    match err {
        AppError::MissingConfiguration { key } => {
            format!("Missing configuration '{key}'. Set it in the environment or in a .env file.")
        }
        AppError::Configuration(msg) => {
            format!("Configuration error: {msg}. Check your environment or .env file.")
        }
        AppError::Authentication(msg) => format!(
            "Authentication failed: {msg}. Run `az login` or set {ENV_API_KEY}."
        ),
        AppError::Provider { provider, message } if provider.starts_with("mcp") => format!(
            "Could not use the MCP server ({message}). Check {ENV_MCP_ENDPOINT} or --mcp-endpoint."
        ),
        AppError::Stream(message) if message.contains("MCP") => format!(
            "Could not reach the MCP server ({message}). Check {ENV_MCP_ENDPOINT} or --mcp-endpoint."
        ),
        AppError::Network(e) => format!("Network error: {e}. Check your connection and endpoints."),
        other => format!("{other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_configuration_names_key() {
        let help = format_error_help(&AppError::missing("AZURE_OPENAI_ENDPOINT"));
        assert!(help.contains("AZURE_OPENAI_ENDPOINT"));
        assert!(help.contains(".env"));
    }

    #[test]
    fn authentication_error_suggests_login() {
        let help = format_error_help(&AppError::Authentication("token expired".into()));
        assert!(help.contains("az login"));
        assert!(help.contains("AZURE_OPENAI_API_KEY"));
    }

    #[test]
    fn mcp_failures_point_at_endpoint() {
        let help = format_error_help(&AppError::Provider {
            provider: "mcp".into(),
            message: "MCP initialize error".into(),
        });
        assert!(help.contains("LEARN_MCP_ENDPOINT"));

        let help = format_error_help(&AppError::Stream("MCP transport closed".into()));
        assert!(help.contains("--mcp-endpoint"));
    }

    #[test]
    fn other_error_falls_through_to_display() {
        let help = format_error_help(&AppError::InvalidState("not connected".into()));
        assert_eq!(help, "Invalid state: not connected");
    }
}
