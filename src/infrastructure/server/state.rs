use crate::application::dispatcher::Dispatcher;
use std::sync::Arc;

pub struct ServerState {
    dispatcher: Arc<Dispatcher>,
}

impl ServerState {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> Arc<Dispatcher> {
        Arc::clone(&self.dispatcher)
    }
}
