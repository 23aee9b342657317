//! UseCase layer: one struct per operation a connection handler performs.

mod connect_client;
mod disconnect_client;
mod error;
mod get_status;
mod relay_message;

pub use connect_client::ConnectClientUseCase;
pub use disconnect_client::DisconnectClientUseCase;
pub use error::ConnectError;
pub use get_status::{GetStatusUseCase, RelayStatus};
pub use relay_message::RelayMessageUseCase;
