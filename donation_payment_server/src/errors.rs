use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use donation_payment_engine::traits::{DonationGatewayError, OrderQueryError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Payload deserialization error")]
    CouldNotDeserializePayload,
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Could not read request path: {0}")]
    InvalidRequestPath(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("Insufficient Permissions. {0}")]
    InsufficientPermissions(String),
    #[error("Payment verification failed. {0}")]
    PaymentVerificationError(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::CouldNotDeserializePayload => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(e) => e.status_code(),
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
            Self::PaymentVerificationError(_) => StatusCode::FORBIDDEN,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

/// Failures while establishing who is making the request.
///
/// Authentication itself happens upstream; these errors cover the trusted identity headers being absent or
/// unreadable, and role checks failing.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("No user identity was supplied with the request.")]
    MissingIdentity,
    #[error("The identity headers are not in the correct format. {0}")]
    PoorlyFormattedHeader(String),
    #[error("Insufficient Permissions. {0}")]
    InsufficientPermissions(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingIdentity => StatusCode::UNAUTHORIZED,
            AuthError::PoorlyFormattedHeader(_) => StatusCode::BAD_REQUEST,
            AuthError::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
        }
    }
}

impl From<DonationGatewayError> for ServerError {
    fn from(e: DonationGatewayError) -> Self {
        match e {
            DonationGatewayError::InvalidAmount => Self::InvalidRequestBody(e.to_string()),
            DonationGatewayError::OrderNotFound(_) => Self::NoRecordFound(e.to_string()),
            DonationGatewayError::Forbidden => Self::InsufficientPermissions(e.to_string()),
            DonationGatewayError::VerificationFailed(_) => Self::PaymentVerificationError(e.to_string()),
            DonationGatewayError::OrderAlreadyExists(_) |
            DonationGatewayError::InvalidStatusChange |
            DonationGatewayError::DatabaseError(_) => Self::BackendError(e.to_string()),
            DonationGatewayError::QueryError(e) => e.into(),
        }
    }
}

impl From<OrderQueryError> for ServerError {
    fn from(e: OrderQueryError) -> Self {
        match e {
            OrderQueryError::QueryError(_) => Self::InvalidRequestBody(e.to_string()),
            OrderQueryError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}
