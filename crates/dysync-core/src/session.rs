//! Session establishment for one side of the sync.
//!
//! Each side authenticates independently: its own region, its own static
//! key pair (or the default provider chain), and optionally a role assumed
//! with those base credentials.

use aws_config::sts::AssumeRoleProvider;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_dynamodb::config::Credentials;

use dysync_types::AccountCredentials;

/// Which side of the sync a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Destination,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Source => "source",
            Side::Destination => "destination",
        }
    }

    fn session_name(&self) -> String {
        format!("dysync-{}", self.as_str())
    }
}

/// Load the base SDK configuration for a side.
async fn base_config(credentials: &AccountCredentials) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = credentials.region.as_deref().filter(|r| !r.is_empty()) {
        loader = loader.region(Region::new(region.to_string()));
    }

    if let Some((key, secret)) = credentials.static_keys() {
        loader = loader.credentials_provider(Credentials::new(
            key,
            secret,
            None, // session token
            None, // expiry
            "dysync-static",
        ));
    }

    // Applies to both the table calls and role assumption.
    if let Some(endpoint) = credentials.endpoint_url.as_deref().filter(|e| !e.is_empty()) {
        loader = loader.endpoint_url(endpoint);
    }

    loader.load().await
}

/// Build a DynamoDB client configuration for one side.
pub async fn connect(side: Side, credentials: &AccountCredentials) -> aws_sdk_dynamodb::Config {
    let base = base_config(credentials).await;
    let mut builder = aws_sdk_dynamodb::config::Builder::from(&base);

    if let Some(role_arn) = credentials.role_arn.as_deref().filter(|r| !r.is_empty()) {
        let provider = AssumeRoleProvider::builder(role_arn)
            .session_name(side.session_name())
            .configure(&base)
            .build()
            .await;
        builder = builder.credentials_provider(provider);
    }

    tracing::info!(
        side = side.as_str(),
        region = ?base.region().map(|r| r.as_ref().to_string()),
        static_keys = credentials.static_keys().is_some(),
        assume_role = credentials.role_arn.is_some(),
        endpoint = ?credentials.endpoint_url,
        "Table session configured"
    );

    builder.build()
}
