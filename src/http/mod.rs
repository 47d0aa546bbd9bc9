//! HTTP surface: inbound webhooks plus operational endpoints.

mod handlers;
mod server;

pub use handlers::{
    HealthResponse, MobilesResponse, ReceiverSummary, ReceiversResponse, StatsResponse,
};
pub use server::{build_router, AppState, HttpServer, ReloadResult};
