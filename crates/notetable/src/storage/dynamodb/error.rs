//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to `StoreError` from `notetable_core::storage`, which
//! decides whether a failure is worth retrying.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::operation::create_table::CreateTableError;
use aws_sdk_dynamodb::operation::describe_table::DescribeTableError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use notetable_core::storage::StoreError;

/// Map failures that happen before the service answers.
fn map_transport_error<E, R>(err: &SdkError<E, R>) -> Option<StoreError> {
    match err {
        SdkError::TimeoutError(_) => Some(StoreError::Unavailable(
            "Request timed out".to_string(),
        )),
        SdkError::DispatchFailure(_) => Some(StoreError::Unavailable(
            "Failed to dispatch request".to_string(),
        )),
        SdkError::ConstructionFailure(_) => Some(StoreError::Other(
            "Failed to construct request".to_string(),
        )),
        _ => None,
    }
}

/// Classify a service error the SDK does not model for this operation.
fn map_unmodeled_error(operation: &str, err: &impl ProvideErrorMetadata) -> StoreError {
    let message = err.message().unwrap_or("no message").to_string();
    match err.code() {
        Some("ThrottlingException") | Some("ProvisionedThroughputExceededException") => {
            StoreError::Throttled(message)
        }
        Some("ServiceUnavailable") | Some("InternalServerError") => {
            StoreError::Unavailable(message)
        }
        Some("ValidationException") => StoreError::Rejected(message),
        Some(code) => StoreError::Other(format!("{} failed: {}: {}", operation, code, message)),
        None => StoreError::Other(format!("{} failed: {}", operation, message)),
    }
}

/// Map a CreateTable SDK error to StoreError.
pub fn map_create_table_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<CreateTableError, R>,
    table_name: &str,
) -> StoreError {
    if let Some(mapped) = map_transport_error(&err) {
        return mapped;
    }
    match err.into_service_error() {
        CreateTableError::ResourceInUseException(_) => {
            StoreError::Rejected(format!("Table already exists: {}", table_name))
        }
        CreateTableError::LimitExceededException(_) => {
            StoreError::Throttled("Too many concurrent table operations, please retry".to_string())
        }
        CreateTableError::InternalServerError(_) => {
            StoreError::Unavailable("DynamoDB internal server error".to_string())
        }
        err => map_unmodeled_error("CreateTable", &err),
    }
}

/// Map a DescribeTable SDK error to StoreError.
pub fn map_describe_table_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DescribeTableError, R>,
    table_name: &str,
) -> StoreError {
    if let Some(mapped) = map_transport_error(&err) {
        return mapped;
    }
    match err.into_service_error() {
        DescribeTableError::ResourceNotFoundException(_) => {
            StoreError::NotFound(format!("Table not found: {}", table_name))
        }
        DescribeTableError::InternalServerError(_) => {
            StoreError::Unavailable("DynamoDB internal server error".to_string())
        }
        err => map_unmodeled_error("DescribeTable", &err),
    }
}

/// Map a PutItem SDK error to StoreError.
pub fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
    table_name: &str,
) -> StoreError {
    if let Some(mapped) = map_transport_error(&err) {
        return mapped;
    }
    match err.into_service_error() {
        PutItemError::ResourceNotFoundException(_) => {
            StoreError::NotFound(format!("Table not found: {}", table_name))
        }
        PutItemError::ProvisionedThroughputExceededException(_) => {
            StoreError::Throttled("Throughput exceeded, please retry".to_string())
        }
        PutItemError::RequestLimitExceeded(_) => {
            StoreError::Throttled("Request limit exceeded, please retry".to_string())
        }
        PutItemError::TransactionConflictException(_) => {
            StoreError::Throttled("Transaction conflict, please retry".to_string())
        }
        PutItemError::ItemCollectionSizeLimitExceededException(_) => {
            StoreError::Rejected("Item collection size limit exceeded".to_string())
        }
        PutItemError::ConditionalCheckFailedException(_) => {
            StoreError::Rejected("Conditional check failed".to_string())
        }
        PutItemError::InternalServerError(_) => {
            StoreError::Unavailable("DynamoDB internal server error".to_string())
        }
        err => map_unmodeled_error("PutItem", &err),
    }
}

/// Map a Scan SDK error to StoreError.
pub fn map_scan_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<ScanError, R>,
    table_name: &str,
) -> StoreError {
    if let Some(mapped) = map_transport_error(&err) {
        return mapped;
    }
    match err.into_service_error() {
        ScanError::ResourceNotFoundException(_) => {
            StoreError::NotFound(format!("Table not found: {}", table_name))
        }
        ScanError::ProvisionedThroughputExceededException(_) => {
            StoreError::Throttled("Throughput exceeded, please retry".to_string())
        }
        ScanError::RequestLimitExceeded(_) => {
            StoreError::Throttled("Request limit exceeded, please retry".to_string())
        }
        ScanError::InternalServerError(_) => {
            StoreError::Unavailable("DynamoDB internal server error".to_string())
        }
        err => map_unmodeled_error("Scan", &err),
    }
}
