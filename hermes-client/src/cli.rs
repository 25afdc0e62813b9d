//! Command line runner: validate, dispatch, print

use crate::action::Command;
use crate::client::StoreClient;
use crate::error::{ClientError, UsageError};
use crate::transport::Transport;
use std::io::Write;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Usage(#[from] UsageError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("failed to write response: {0}")]
    Output(#[from] std::io::Error),
}

impl CliError {
    /// Process exit code for this failure
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Usage(_) => 1,
            CliError::Client(_) | CliError::Output(_) => 2,
        }
    }
}

/// Run one client invocation: `args` are the positional arguments
/// (`<action> [group[/key]] [value...]`).
///
/// Prints the status code line and the body line to `out`. Usage errors are
/// returned before the transport is touched.
pub async fn run<T, S, W>(client: &StoreClient<T>, args: &[S], out: &mut W) -> Result<(), CliError>
where
    T: Transport,
    S: AsRef<str>,
    W: Write,
{
    let command = Command::parse(args)?;
    let response = client.execute(&command).await?;
    writeln!(out, "{}", response.status)?;
    writeln!(out, "{}", response.body)?;
    Ok(())
}
