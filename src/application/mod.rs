pub mod context;
pub mod pay_service;
pub mod retry_service;
pub mod scheduler;

pub use context::{PassContext, RetryContext};
pub use pay_service::PayService;
pub use retry_service::RetryService;
pub use scheduler::PayoutScheduler;
