mod client;
mod types;

pub use client::{
    Gateway, GatewayError, HttpGateway, CREDENTIAL_HEADER, DASHBOARD_PATH, KEY_CHECK_PATH,
    UPLOAD_PATH,
};
pub use types::{
    service_base_url, DashboardData, MarkupFragment, SummaryStats, UploadReceipt,
    ValidationVerdict, DEFAULT_BASE_URL,
};
