pub mod contact;
pub mod statement;
