//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to `BackendError` from `accountstore_core::storage`.

use std::fmt::Debug;

use accountstore_core::storage::BackendError;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::describe_table::DescribeTableError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use aws_sdk_dynamodb::operation::transact_write_items::TransactWriteItemsError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;

/// Cancellation reason DynamoDB reports for a failed condition inside a transaction.
const CONDITIONAL_CHECK_FAILED: &str = "ConditionalCheckFailed";

/// Map failures that happened before DynamoDB produced a response.
fn map_transport_error<E, R>(err: &SdkError<E, R>) -> Option<BackendError> {
    match err {
        SdkError::TimeoutError(_) => Some(BackendError::Timeout),
        SdkError::DispatchFailure(failure) => Some(BackendError::ConnectionFailed(format!(
            "Request dispatch failed: {:?}",
            failure
        ))),
        _ => None,
    }
}

fn throughput_exceeded() -> BackendError {
    BackendError::Throttled("Throughput exceeded, please retry".to_string())
}

fn request_limit_exceeded() -> BackendError {
    BackendError::Throttled("Request limit exceeded, please retry".to_string())
}

fn table_not_found() -> BackendError {
    BackendError::QueryFailed("Table not found".to_string())
}

fn internal_server_error() -> BackendError {
    BackendError::QueryFailed("DynamoDB internal server error".to_string())
}

/// Map a GetItem SDK error to BackendError.
pub fn map_get_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<GetItemError, R>,
) -> BackendError {
    if let Some(mapped) = map_transport_error(&err) {
        return mapped;
    }
    match err.into_service_error() {
        GetItemError::ResourceNotFoundException(_) => table_not_found(),
        GetItemError::ProvisionedThroughputExceededException(_) => throughput_exceeded(),
        GetItemError::RequestLimitExceeded(_) => request_limit_exceeded(),
        GetItemError::InternalServerError(_) => internal_server_error(),
        err => BackendError::QueryFailed(format!("GetItem failed: {:?}", err)),
    }
}

/// Map a Query SDK error to BackendError.
pub fn map_query_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<QueryError, R>,
) -> BackendError {
    if let Some(mapped) = map_transport_error(&err) {
        return mapped;
    }
    match err.into_service_error() {
        QueryError::ResourceNotFoundException(_) => table_not_found(),
        QueryError::ProvisionedThroughputExceededException(_) => throughput_exceeded(),
        QueryError::RequestLimitExceeded(_) => request_limit_exceeded(),
        QueryError::InternalServerError(_) => internal_server_error(),
        err => BackendError::QueryFailed(format!("Query failed: {:?}", err)),
    }
}

/// Map a Scan SDK error to BackendError.
pub fn map_scan_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<ScanError, R>,
) -> BackendError {
    if let Some(mapped) = map_transport_error(&err) {
        return mapped;
    }
    match err.into_service_error() {
        ScanError::ResourceNotFoundException(_) => table_not_found(),
        ScanError::ProvisionedThroughputExceededException(_) => throughput_exceeded(),
        ScanError::RequestLimitExceeded(_) => request_limit_exceeded(),
        ScanError::InternalServerError(_) => internal_server_error(),
        err => BackendError::QueryFailed(format!("Scan failed: {:?}", err)),
    }
}

/// Map a TransactWriteItems SDK error to BackendError.
///
/// A transaction cancelled because one of its conditions failed becomes
/// `ConditionFailed`.
pub fn map_transact_write_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<TransactWriteItemsError, R>,
) -> BackendError {
    if let Some(mapped) = map_transport_error(&err) {
        return mapped;
    }
    match err.into_service_error() {
        TransactWriteItemsError::TransactionCanceledException(cancelled) => {
            let condition_failed = cancelled
                .cancellation_reasons()
                .iter()
                .any(|reason| reason.code() == Some(CONDITIONAL_CHECK_FAILED));
            if condition_failed {
                BackendError::ConditionFailed
            } else {
                BackendError::Throttled(format!(
                    "Transaction cancelled, please retry: {:?}",
                    cancelled.message()
                ))
            }
        }
        TransactWriteItemsError::TransactionInProgressException(_) => {
            BackendError::Throttled("Transaction in progress, please retry".to_string())
        }
        TransactWriteItemsError::ResourceNotFoundException(_) => table_not_found(),
        TransactWriteItemsError::ProvisionedThroughputExceededException(_) => {
            throughput_exceeded()
        }
        TransactWriteItemsError::RequestLimitExceeded(_) => request_limit_exceeded(),
        TransactWriteItemsError::InternalServerError(_) => internal_server_error(),
        err => BackendError::QueryFailed(format!("TransactWriteItems failed: {:?}", err)),
    }
}

/// Map an UpdateItem SDK error to BackendError.
///
/// Updates are conditioned on the item existing, so a failed condition
/// means the record is missing.
pub fn map_update_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<UpdateItemError, R>,
    id: impl Into<String>,
) -> BackendError {
    if let Some(mapped) = map_transport_error(&err) {
        return mapped;
    }
    match err.into_service_error() {
        UpdateItemError::ConditionalCheckFailedException(_) => {
            BackendError::NotFound { id: id.into() }
        }
        UpdateItemError::ResourceNotFoundException(_) => table_not_found(),
        UpdateItemError::ProvisionedThroughputExceededException(_) => throughput_exceeded(),
        UpdateItemError::RequestLimitExceeded(_) => request_limit_exceeded(),
        UpdateItemError::ItemCollectionSizeLimitExceededException(_) => {
            BackendError::QueryFailed("Item collection size limit exceeded".to_string())
        }
        UpdateItemError::TransactionConflictException(_) => {
            BackendError::Throttled("Transaction conflict, please retry".to_string())
        }
        UpdateItemError::InternalServerError(_) => internal_server_error(),
        err => BackendError::QueryFailed(format!("UpdateItem failed: {:?}", err)),
    }
}

/// Map a DescribeTable SDK error to BackendError.
pub fn map_describe_table_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DescribeTableError, R>,
    table_name: &str,
) -> BackendError {
    if let Some(mapped) = map_transport_error(&err) {
        return mapped;
    }
    match err.into_service_error() {
        DescribeTableError::ResourceNotFoundException(_) => {
            BackendError::QueryFailed(format!("Table '{}' not found", table_name))
        }
        DescribeTableError::InternalServerError(_) => internal_server_error(),
        err => BackendError::QueryFailed(format!("DescribeTable failed: {:?}", err)),
    }
}
