//! # estate-client
//!
//! Client runtime that wraps every outbound business call.
//!
//! - [`RequestInterceptor`]: attaches the bearer credential and, on a 401,
//!   refreshes once and retries the original call exactly once
//! - [`RefreshCoordinator`]: guarantees at most one refresh call in flight
//! - [`SingleFlight`]: the keyed deduplication primitive behind it
//! - [`Transport`]: the HTTP seam, with a `reqwest` implementation
//! - [`Navigator`]: the hard-navigation seam used on session termination

pub mod coordinator;
pub mod error;
pub mod interceptor;
pub mod navigator;
pub mod single_flight;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

pub use coordinator::RefreshCoordinator;
pub use error::HttpError;
pub use interceptor::{RequestInterceptor, RequestOptions};
pub use navigator::{ChannelNavigator, Navigation, Navigator};
pub use single_flight::SingleFlight;
pub use transport::{InboundResponse, OutboundRequest, ReqwestTransport, Transport};
