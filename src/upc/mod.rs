pub mod upc_client;
pub mod upc_handlers;

pub use upc_client::UpcClient;
pub use upc_handlers::lookup_product;
