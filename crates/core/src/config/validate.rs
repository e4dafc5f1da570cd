use super::{
    types::{ApiMode, Config},
    ConfigError,
};
use crate::source::TicketScope;

/// Validate configuration for a ticket run
/// Currently validates:
/// - API modes have an API key and an endpoint for the selected mode
/// - `mine` scopes have an agent ID, `group` scopes a group ID
/// - Test mode needs nothing from the config
pub fn validate_config(
    config: &Config,
    mode: ApiMode,
    scope: Option<TicketScope>,
) -> Result<(), ConfigError> {
    if mode == ApiMode::Test {
        return Ok(());
    }

    let fs = &config.freshservice;

    if fs.api_key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "freshservice.api_key must be set for API modes".to_string(),
        ));
    }

    match fs.endpoint(mode) {
        Some(url) if !url.trim().is_empty() => {}
        _ => {
            return Err(ConfigError::ValidationError(format!(
                "freshservice.{}_endpoint must be set for {} mode",
                mode.as_str(),
                mode.as_str()
            )))
        }
    }

    if fs.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "freshservice.timeout_secs cannot be 0".to_string(),
        ));
    }

    let Some(scope) = scope else {
        return Err(ConfigError::ValidationError(
            "a ticket scope is required for API modes".to_string(),
        ));
    };

    if scope.is_agent_scope() && fs.agent_id.is_none() {
        return Err(ConfigError::ValidationError(format!(
            "freshservice.agent_id must be set for the {} scope",
            scope.as_str()
        )));
    }
    if scope.is_group_scope() && fs.group_id.is_none() {
        return Err(ConfigError::ValidationError(format!(
            "freshservice.group_id must be set for the {} scope",
            scope.as_str()
        )));
    }

    Ok(())
}

/// Validate the web form server section
pub fn validate_server_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    Ok(())
}
