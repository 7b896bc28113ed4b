use serde::{Deserialize, Serialize};

use crate::consts::consts::ContactId;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub email: String,
}

/// The payload of an add statement, the store assigns the identifier when the
/// statement is applied
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NewContact {
    pub name: String,
    pub email: String,
}

impl NewContact {
    pub fn new(name: String, email: String) -> Self {
        NewContact { name, email }
    }

    pub fn to_contact(self, id: ContactId) -> Contact {
        Contact {
            id,
            name: self.name,
            email: self.email,
        }
    }

    pub fn new_test() -> Self {
        NewContact {
            name: "Full Name".to_string(),
            email: "Email".to_string(),
        }
    }
}
