use std::fmt;

use serde::{Deserialize, Serialize};

// New Type Pattern -- https://doc.rust-lang.org/rust-by-example/generics/new_types.html
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct ContactId(pub usize);

impl ContactId {
    /// Identifier state before any contact has been assigned, the first
    /// assigned contact gets id 1
    pub fn new_initial() -> ContactId {
        ContactId(0)
    }

    pub fn increment(&self) -> ContactId {
        ContactId(self.0 + 1)
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
