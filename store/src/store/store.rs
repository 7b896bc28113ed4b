use std::thread;

use crate::{
    model::statement::Statement,
    store::{
        commands::{Control, StoreCommand, StoreCommandRequest, StoreCommandResponse},
        options::StoreOptions,
        request_manager::RequestManager,
        table::ContactTable,
    },
};

/// Owns the contact table. All reads and writes go through the store thread's
/// command channel, which is what serializes them
pub struct Store {
    contact_table: ContactTable,
    store_receiver: flume::Receiver<StoreCommandRequest>,
    store_sender: flume::Sender<StoreCommandRequest>,
    store_options: StoreOptions,
}

impl Store {
    pub fn new(options: StoreOptions) -> Self {
        let (store_sender, store_receiver) = flume::unbounded::<StoreCommandRequest>();

        Self {
            contact_table: ContactTable::new(),
            store_receiver,
            store_sender,
            store_options: options,
        }
    }

    /// Spawns the store thread and hands back a request manager connected to it.
    /// The request manager is cheap to clone, one per caller thread is fine
    pub fn run(self) -> RequestManager {
        let store_sender = self.store_sender.clone();

        thread::spawn(move || self.start());

        RequestManager::new(store_sender)
    }

    pub fn start(self) {
        let Store {
            mut contact_table,
            store_receiver,
            store_sender,
            store_options,
        } = self;

        // Were the store to keep its own sender alive the receive loop below
        // could never observe a disconnect
        drop(store_sender);

        let seed_count = store_options.seed.len();

        for new_contact in store_options.seed {
            contact_table
                .apply(Statement::Add(new_contact))
                .expect("Seed contacts should not contain duplicate emails");
        }

        log::info!("📇 Store ready [SeedContacts: {}]", seed_count);

        // Process incoming requests from the channel
        loop {
            let StoreCommandRequest { resolver, command } = match store_receiver.recv() {
                Ok(request) => request,
                // Every request manager is gone, nothing more will arrive
                Err(flume::RecvError::Disconnected) => return,
            };

            if command.is_query() {
                log::debug!("Received request: {}", command.log_format());
            } else {
                log::info!("Received request: {}", command.log_format());
            }

            match command {
                StoreCommand::Statement(statement) => {
                    let response = match contact_table.apply(statement) {
                        Ok(statement_result) => {
                            StoreCommandResponse::statement_success(statement_result)
                        }
                        Err(error) => {
                            log::info!("⚠️  Rejected: [{}]", &error);

                            StoreCommandResponse::statement_error(error)
                        }
                    };

                    // Sends the response data back to the caller of the request (i.e.), the entity on the other end of the channel
                    resolver
                        .send(response)
                        .expect("Should always be able to send a response back to the caller");
                }
                StoreCommand::Control(Control::Shutdown) => {
                    // The caller may have stopped waiting, a dropped resolver
                    // must not cancel the shutdown
                    let _ = resolver.send(StoreCommandResponse::control_success(
                        "Successfully shutdown store",
                    ));

                    return;
                }
            }
        }
    }
}


pub mod test_utils {
    use crate::{
        model::statement::{Statement, StatementResult},
        store::{options::StoreOptions, request_manager::RequestManager, store::Store},
    };
    use std::thread::{self, JoinHandle};

    /// Boots a store on its own thread, hammers it with generated statements from
    /// `sender_threads` concurrent request managers, then shuts the store down
    pub fn store_test(
        sender_threads: usize,
        statements: u32,
        statement_generator: fn(usize, u32) -> Statement,
    ) {
        let request_manager = Store::new(StoreOptions::default()).run();

        let mut sender_handles: Vec<JoinHandle<()>> = vec![];

        for thread_id in 0..sender_threads {
            let rm = request_manager.clone();

            let sender_handle = thread::spawn(move || {
                for index in 0..statements {
                    let statement = statement_generator(thread_id, index);

                    rm.send_statement(statement).expect("Should not timeout");
                }
            });

            sender_handles.push(sender_handle);
        }

        for handle in sender_handles {
            handle.join().unwrap();
        }

        // Allows the store thread to successfully exit
        let shutdown_response = request_manager
            .send_shutdown_request()
            .expect("Should not timeout");

        assert_eq!(shutdown_response, "Successfully shutdown store".to_string());
    }

    /// Sends `statements` generated statements through a single request manager
    /// and collects the results
    pub fn run_statements(
        request_manager: &RequestManager,
        statements: u32,
        statement_generator: fn(u32) -> Statement,
    ) -> Vec<StatementResult> {
        (0..statements)
            .map(|index| {
                request_manager
                    .send_statement(statement_generator(index))
                    .expect("Should not timeout")
            })
            .collect()
    }
}
