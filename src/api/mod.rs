//! HTTP API module for the reimbursement calculation engine.
//!
//! This module provides the REST API endpoints for computing quotes,
//! processing outcomes, and eligibility decisions under the Laptop
//! Reimbursement Policy.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{EligibilityRequest, ProcessRequest, QuoteRequest, RequestPayload};
pub use response::ApiError;
pub use state::AppState;
