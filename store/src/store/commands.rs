use crate::{
    model::statement::{Statement, StatementResult},
    store::table::ApplyErrors,
};

/// Store commands are how we interact with the store, they are how we ask it to apply a statement, shutdown, etc
///
/// The majority of interactions happen via statements (add, remove, list, email lookups), control commands
/// exist for lifecycle concerns like shutdown.
#[derive(Debug)]
pub enum StoreCommand {
    /// Sends a single statement to the store and returns its result
    Statement(Statement),

    /// Commands that control the store
    Control(Control),
}

impl StoreCommand {
    /// True for commands that only read table state, used to pick a quieter log level
    pub fn is_query(&self) -> bool {
        match self {
            StoreCommand::Statement(statement) => statement.is_query(),
            StoreCommand::Control(_) => false,
        }
    }

    /// Single place to decide how commands appear in the store log
    pub fn log_format(&self) -> String {
        format!("{:?}", self)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum StoreCommandStatementResponse {
    /// Statement was applied, returns its result
    Success(StatementResult),
    /// Statement was rejected by a constraint, the table is unchanged
    Error(ApplyErrors),
}

#[derive(Clone, Debug, PartialEq)]
pub enum StoreCommandControlResponse {
    /// Successfully performed the control
    Success(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum StoreCommandResponse {
    StoreCommandStatementResponse(StoreCommandStatementResponse),
    StoreCommandControlResponse(StoreCommandControlResponse),
}

impl StoreCommandResponse {
    pub fn statement_success(result: StatementResult) -> Self {
        StoreCommandResponse::StoreCommandStatementResponse(StoreCommandStatementResponse::Success(
            result,
        ))
    }

    pub fn statement_error(error: ApplyErrors) -> Self {
        StoreCommandResponse::StoreCommandStatementResponse(StoreCommandStatementResponse::Error(
            error,
        ))
    }

    pub fn control_success(message: &str) -> Self {
        StoreCommandResponse::StoreCommandControlResponse(StoreCommandControlResponse::Success(
            message.to_string(),
        ))
    }
}

#[derive(Debug)]
pub enum Control {
    /// Performs a safe shutdown of the store, requests already queued before the shutdown will be applied, requests after it will be ignored
    Shutdown,
}

pub struct StoreCommandRequest {
    pub resolver: oneshot::Sender<StoreCommandResponse>,
    pub command: StoreCommand,
}
