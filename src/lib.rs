pub mod error;
pub mod item;
pub mod notification;
pub mod outbox;
pub mod routes;
pub mod state;
pub mod storage;
pub mod subscription;
pub mod upc;
