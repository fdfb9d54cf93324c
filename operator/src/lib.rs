pub mod client;
pub mod ddl;
pub mod operator;
pub mod poller;
pub mod sequencer;

#[cfg(test)]
mod test_utils;

pub use client::{HttpQueryService, QueryService, QueryServiceError};
pub use ddl::DdlError;
pub use operator::{DropBehavior, OperatorError, TableOperator};
pub use poller::PollError;
pub use sequencer::BatchError;
