pub mod identifier_ctx;
pub mod purchase_flow;

pub use identifier_ctx::IdentifierCtx;
pub use purchase_flow::{PurchaseFlow, RetryPolicy};
