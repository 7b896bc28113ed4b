use thiserror::Error;

use crate::{
    consts::consts::ContactId,
    model::{
        contact::Contact,
        statement::{Statement, StatementResult},
    },
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApplyErrors {
    // Constraints
    #[error("Cannot add contact, a contact already exists with this email: {0}")]
    DuplicateEmail(String),

    // CRUD - DELETE
    #[error("Cannot remove contact, no contact exists with id: {0}")]
    NotFound(ContactId),
}

/// The authoritative in-memory contact collection. Contacts are kept in
/// insertion order, identifiers are handed out by an internal counter and are
/// never reused after a removal
pub struct ContactTable {
    pub contacts: Vec<Contact>,
    current_contact_id: ContactId,
}

impl ContactTable {
    pub fn new() -> Self {
        Self {
            contacts: Vec::new(),
            current_contact_id: ContactId::new_initial(),
        }
    }

    // Each mutation statement is broken up into 2 steps
    //  - Verifying constraints (email uniqueness, id existence)
    //  - Applying the mutation
    #[tracing::instrument(skip(self))]
    pub fn apply(&mut self, statement: Statement) -> Result<StatementResult, ApplyErrors> {
        let statement_result = match statement {
            Statement::Add(new_contact) => {
                // Constraint check happens before any mutation, a rejected add
                // must leave the table untouched
                if self.has_email(&new_contact.email) {
                    return Err(ApplyErrors::DuplicateEmail(new_contact.email));
                }

                self.current_contact_id = self.current_contact_id.increment();

                let contact = new_contact.to_contact(self.current_contact_id.clone());

                self.contacts.push(contact.clone());

                StatementResult::Single(contact)
            }
            Statement::Remove(id) => {
                let index = self.index_of(&id).ok_or(ApplyErrors::NotFound(id))?;

                // Vec::remove shifts the tail left, the relative order of the
                // remaining contacts is preserved
                let removed_contact = self.contacts.remove(index);

                StatementResult::Single(removed_contact)
            }
            Statement::HasEmail(email) => StatementResult::Exists(self.has_email(&email)),
            Statement::List => StatementResult::List(self.list()),
        };

        Ok(statement_result)
    }

    /// Position of the first contact with the given id
    pub fn index_of(&self, id: &ContactId) -> Option<usize> {
        self.contacts.iter().position(|contact| &contact.id == id)
    }

    /// True iff some stored contact's email exactly equals `email`. The
    /// comparison is case sensitive
    // TODO: Swap the scan for a unique email index if the contact list ever
    //  outgrows demo sizes
    #[tracing::instrument(skip(self))]
    pub fn has_email(&self, email: &str) -> bool {
        self.contacts.iter().any(|contact| contact.email == email)
    }

    /// Contacts in insertion order. No side effects, never fails
    pub fn list(&self) -> Vec<Contact> {
        self.contacts.clone()
    }
}
