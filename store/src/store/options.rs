use crate::model::contact::NewContact;

#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub seed: Vec<NewContact>,
}

// Implements: https://rust-unofficial.github.io/patterns/patterns/creational/builder.html
impl StoreOptions {
    /// Defines the contacts the store thread inserts before serving requests.
    /// Seeds run through the same uniqueness checks as any other add
    pub fn set_seed(mut self, seed: Vec<NewContact>) -> Self {
        self.seed = seed;
        self
    }
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self { seed: Vec::new() }
    }
}
