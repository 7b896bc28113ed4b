use std::time::Duration;
use thiserror::Error;

use crate::{
    consts::consts::ContactId,
    model::{
        contact::{Contact, NewContact},
        statement::{Statement, StatementResult},
    },
    store::{
        commands::{
            Control, StoreCommand, StoreCommandControlResponse, StoreCommandRequest,
            StoreCommandResponse, StoreCommandStatementResponse,
        },
        table::ApplyErrors,
    },
};

#[derive(Error, Debug, PartialEq)]
pub enum RequestManagerError {
    #[error("Store took too long to respond to request")]
    StoreTimeout,
    #[error("Statement was rejected: {0}")]
    Statement(#[from] ApplyErrors),
}

#[derive(Clone)]
pub struct RequestManager {
    store_sender: flume::Sender<StoreCommandRequest>,
}

/// Goal of the request manager is to provide a simple interface for interacting with the store
///
/// The request manager provides the following APIs. These are sorted by the easiest to use to the most complex
/// 1. CRUD operations on a single contact -- these are completely type safe
/// 2. Generic Statement based API -- not type safe because you need to know what Statement maps to what
///    StatementResult (e.g. Statement::Add maps -> StatementResult::Single)
///
/// For 2/ Can we improve the type safety of the generic statement based API?
/// - Statement knows what StatementResult it maps to
/// - StatementResult knows what Statement it maps to
/// - Generics...?
impl RequestManager {
    pub fn new(store_sender: flume::Sender<StoreCommandRequest>) -> Self {
        Self { store_sender }
    }

    pub fn send_add(&self, new_contact: NewContact) -> Result<Contact, RequestManagerError> {
        let statement_result = self.send_statement(Statement::Add(new_contact))?;
        return Ok(statement_result.single());
    }

    pub fn send_remove(&self, id: ContactId) -> Result<Contact, RequestManagerError> {
        let statement_result = self.send_statement(Statement::Remove(id))?;
        return Ok(statement_result.single());
    }

    pub fn send_has_email(&self, email: String) -> Result<bool, RequestManagerError> {
        let statement_result = self.send_statement(Statement::HasEmail(email))?;
        return Ok(statement_result.exists());
    }

    pub fn send_list(&self) -> Result<Vec<Contact>, RequestManagerError> {
        let statement_result = self.send_statement(Statement::List)?;
        return Ok(statement_result.list());
    }

    /// Sends a shutdown request to the store and returns the store's response
    pub fn send_shutdown_request(&self) -> Result<String, RequestManagerError> {
        let response = self.send_command(StoreCommand::Control(Control::Shutdown))?;

        match response {
            StoreCommandResponse::StoreCommandControlResponse(
                StoreCommandControlResponse::Success(message),
            ) => Ok(message),
            StoreCommandResponse::StoreCommandStatementResponse(_) => {
                panic!("Control commands should always return a control response")
            }
        }
    }

    /// Sends a single statement to the store and returns a single statement result
    pub fn send_statement(
        &self,
        statement: Statement,
    ) -> Result<StatementResult, RequestManagerError> {
        let response = self.send_command(StoreCommand::Statement(statement))?;

        match response {
            StoreCommandResponse::StoreCommandStatementResponse(statement_response) => {
                match statement_response {
                    StoreCommandStatementResponse::Success(statement_result) => {
                        Ok(statement_result)
                    }
                    StoreCommandStatementResponse::Error(error) => {
                        Err(RequestManagerError::Statement(error))
                    }
                }
            }
            StoreCommandResponse::StoreCommandControlResponse(_) => {
                panic!("Statement commands should always return a statement response")
            }
        }
    }

    fn send_command(
        &self,
        command: StoreCommand,
    ) -> Result<StoreCommandResponse, RequestManagerError> {
        let (resolver, resolver_receiver) = oneshot::channel::<StoreCommandResponse>();

        let request = StoreCommandRequest { resolver, command };

        // Sends the request to the store thread, the store will respond
        //  on the resolver once it has finished processing the request
        self.store_sender.send(request).unwrap();

        match resolver_receiver.recv_timeout(Duration::from_secs(2)) {
            Ok(response) => Ok(response),
            Err(oneshot::RecvTimeoutError::Timeout) => Err(RequestManagerError::StoreTimeout),
            Err(oneshot::RecvTimeoutError::Disconnected) => panic!("Store exited"),
        }
    }
}
