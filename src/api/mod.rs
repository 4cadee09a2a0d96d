//! HTTP API for the payroll engine.
//!
//! Exposes punch extraction, session revival and the payroll reports as
//! JSON endpoints.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{DailyReportRequest, ExtractRequest, MonthlyReportRequest, SummaryReportRequest};
pub use response::{
    ApiError, ApiErrorResponse, DailyReportResponse, ExtractResponse, SummaryReportResponse,
};
pub use state::AppState;
