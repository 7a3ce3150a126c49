mod docs;
pub mod dto;
mod error;
mod router;
pub mod routes;
mod state;

pub use error::ServerError;
pub use state::ServerState;

use crate::application::dispatcher::Dispatcher;
use std::net::SocketAddr;
use std::sync::Arc;

pub async fn serve(dispatcher: Arc<Dispatcher>, addr: SocketAddr) -> Result<(), ServerError> {
    router::serve(dispatcher, addr).await
}
