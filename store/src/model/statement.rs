use crate::consts::consts::ContactId;

use super::contact::{Contact, NewContact};

#[derive(Clone, Debug)]
pub enum Statement {
    Add(NewContact),
    Remove(ContactId),
    /// Returns whether some stored contact's email exactly equals the argument
    HasEmail(String),
    /// Returns the contact list in insertion order
    List,
}

impl Statement {
    pub fn is_query(&self) -> bool {
        !self.is_mutation()
    }

    pub fn is_mutation(&self) -> bool {
        match self {
            Statement::Add(_) | Statement::Remove(_) => true,
            Statement::HasEmail(_) | Statement::List => false,
        }
    }
}

// Each statement maps to exactly one result variant, the accessors below assume
// the caller knows which one it asked for
#[derive(Clone, Debug, PartialEq)]
pub enum StatementResult {
    Single(Contact),
    List(Vec<Contact>),
    Exists(bool),
}

impl StatementResult {
    pub fn single(self) -> Contact {
        if let StatementResult::Single(contact) = self {
            contact
        } else {
            panic!("Statement result is not of type Single")
        }
    }

    pub fn list(self) -> Vec<Contact> {
        if let StatementResult::List(contacts) = self {
            contacts
        } else {
            panic!("Statement result is not of type List")
        }
    }

    pub fn exists(self) -> bool {
        if let StatementResult::Exists(exists) = self {
            exists
        } else {
            panic!("Statement result is not of type Exists")
        }
    }
}
