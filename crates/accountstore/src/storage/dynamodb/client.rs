//! AWS SDK client setup (Imperative Shell).

use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::Client;

use accountstore_core::storage::BackendError;

use crate::config::DynamoDbConfig;

/// Creates a DynamoDB client with the given configuration.
///
/// Honors a custom endpoint (LocalStack, DynamoDB Local), a named profile and
/// the standard retry mode with the configured attempt budget. Fails when the
/// environment offers no way to obtain credentials.
pub async fn create_client(config: &DynamoDbConfig) -> Result<Client, BackendError> {
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .retry_config(RetryConfig::standard().with_max_attempts(config.max_attempts));

    if let Some(endpoint) = &config.endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }

    if let Some(profile) = &config.profile {
        loader = loader.profile_name(profile);
    }

    let sdk_config = loader.load().await;
    if sdk_config.credentials_provider().is_none() {
        return Err(BackendError::ConnectionFailed(
            "no AWS credentials provider configured".to_string(),
        ));
    }

    Ok(Client::new(&sdk_config))
}
