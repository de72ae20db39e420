pub mod report_service;

pub use report_service::{
    MostExpensive, Report, ReportOptions, ReportService, SubscriptionReportRow,
};

use crate::errors::EngineError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("{0}")]
    Invalid(String),
}
