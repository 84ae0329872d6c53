use anyhow::Error;
use std::process::ExitCode;
use suspendable_config::ConfigError;
use suspendable_core::time::TimeParseError;
use suspendable_core::CoreError;
use suspendable_store::error::{StoreError, StoreErrorKind};
use thiserror::Error as ThisError;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_NOT_FOUND: u8 = 2;
pub const EXIT_INVALID_INPUT: u8 = 3;

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
}

pub fn invalid_input(message: impl Into<String>) -> Error {
    CliError::InvalidInput(message.into()).into()
}

pub fn not_found(message: impl Into<String>) -> Error {
    CliError::NotFound(message.into()).into()
}

pub fn report_error(err: &Error, verbose: bool) {
    if verbose {
        eprintln!("error: {:#}", err);
    } else {
        eprintln!("error: {}", err);
    }
}

pub fn exit_code_for(err: &Error) -> ExitCode {
    ExitCode::from(exit_status_for(err))
}

fn exit_status_for(err: &Error) -> u8 {
    for cause in err.chain() {
        if let Some(cli_err) = cause.downcast_ref::<CliError>() {
            return match cli_err {
                CliError::InvalidInput(_) => EXIT_INVALID_INPUT,
                CliError::NotFound(_) => EXIT_NOT_FOUND,
            };
        }
        if let Some(store_err) = cause.downcast_ref::<StoreError>() {
            return store_exit_code(store_err);
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return config_exit_code(config_err);
        }
        if cause.downcast_ref::<CoreError>().is_some()
            || cause.downcast_ref::<TimeParseError>().is_some()
        {
            return EXIT_INVALID_INPUT;
        }
    }
    EXIT_FAILURE
}

fn store_exit_code(err: &StoreError) -> u8 {
    if err.kind() == StoreErrorKind::NotFound {
        EXIT_NOT_FOUND
    } else if err.is_input_error() {
        EXIT_INVALID_INPUT
    } else {
        EXIT_FAILURE
    }
}

fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::MissingHomeDir => EXIT_FAILURE,
        ConfigError::InvalidConfigPath(_)
        | ConfigError::MissingConfigFile(_)
        | ConfigError::InsecurePermissions(_)
        | ConfigError::InvalidTimeZone(_)
        | ConfigError::Read { .. }
        | ConfigError::Parse { .. } => EXIT_INVALID_INPUT,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        exit_status_for, invalid_input, not_found, EXIT_FAILURE, EXIT_INVALID_INPUT,
        EXIT_NOT_FOUND,
    };
    use anyhow::{anyhow, Context as _};
    use suspendable_core::CoreError;
    use suspendable_store::error::StoreError;

    #[test]
    fn cli_errors_map_to_exit_codes() {
        assert_eq!(exit_status_for(&not_found("account x")), EXIT_NOT_FOUND);
        assert_eq!(exit_status_for(&invalid_input("bad")), EXIT_INVALID_INPUT);
        assert_eq!(exit_status_for(&anyhow!("boom")), EXIT_FAILURE);
    }

    #[test]
    fn wrapped_store_errors_are_found_in_chain() {
        let err = Err::<(), _>(StoreError::Core(CoreError::SuspensionReasonTooLong(300)))
            .context("update account")
            .unwrap_err();
        assert_eq!(exit_status_for(&err), EXIT_INVALID_INPUT);

        let err = anyhow::Error::from(StoreError::NotFound("x".to_string()));
        assert_eq!(exit_status_for(&err), EXIT_NOT_FOUND);

        let err = anyhow::Error::from(StoreError::SchemaTooNew {
            found: 2,
            supported: 1,
        });
        assert_eq!(exit_status_for(&err), EXIT_FAILURE);
    }
}
