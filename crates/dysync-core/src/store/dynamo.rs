//! DynamoDB table store.

use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{AttributeValue, KeyType as DynamoKeyType};
use aws_sdk_dynamodb::Client;

use dysync_types::{Identity, ItemFilter, KeyElement, KeySchema, StoreError};

use super::{key_attributes, FilterQuery, Item, TableStore};

/// Table store backed by the DynamoDB API.
#[derive(Clone)]
pub struct DynamoTable {
    client: Client,
}

impl std::fmt::Debug for DynamoTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamoTable").finish_non_exhaustive()
    }
}

impl DynamoTable {
    /// Create a store from a fully resolved client configuration.
    pub fn new(config: aws_sdk_dynamodb::Config) -> Self {
        Self { client: Client::from_conf(config) }
    }

    /// Create from a pre-built client (for testing)
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    fn fetch_error(table: &str, operation: &str, err: impl std::error::Error) -> StoreError {
        StoreError::Fetch {
            table: table.to_string(),
            message: format!("{} failed: {}", operation, DisplayErrorContext(err)),
        }
    }

    async fn scan_pages(
        &self,
        table: &str,
        range_filter: Option<(&str, &str)>,
    ) -> Result<Vec<Item>, StoreError> {
        let mut items = Vec::new();
        let mut last_evaluated_key = None;

        loop {
            let mut request = self.client.scan().table_name(table);

            if let Some((attribute, value)) = range_filter {
                request = request
                    .filter_expression("#r = :r")
                    .expression_attribute_names("#r", attribute)
                    .expression_attribute_values(":r", AttributeValue::S(value.to_string()));
            }

            if let Some(key) = last_evaluated_key.take() {
                request = request.set_exclusive_start_key(Some(key));
            }

            let response =
                request.send().await.map_err(|e| Self::fetch_error(table, "Scan", e))?;

            items.extend_from_slice(response.items());
            tracing::debug!(table, fetched = items.len(), "scan page received");

            match response.last_evaluated_key() {
                Some(key) if !key.is_empty() => {
                    last_evaluated_key = Some(key.clone());
                },
                _ => break,
            }
        }

        Ok(items)
    }

    async fn query_partition(
        &self,
        table: &str,
        hash_attribute: &str,
        hash: &str,
    ) -> Result<Vec<Item>, StoreError> {
        let mut items = Vec::new();
        let mut last_evaluated_key = None;

        loop {
            let mut request = self
                .client
                .query()
                .table_name(table)
                .key_condition_expression("#h = :h")
                .expression_attribute_names("#h", hash_attribute)
                .expression_attribute_values(":h", AttributeValue::S(hash.to_string()));

            if let Some(key) = last_evaluated_key.take() {
                request = request.set_exclusive_start_key(Some(key));
            }

            let response =
                request.send().await.map_err(|e| Self::fetch_error(table, "Query", e))?;

            items.extend_from_slice(response.items());

            match response.last_evaluated_key() {
                Some(key) if !key.is_empty() => {
                    last_evaluated_key = Some(key.clone());
                },
                _ => break,
            }
        }

        Ok(items)
    }

    async fn get_point(
        &self,
        table: &str,
        schema: &KeySchema,
        identity: &Identity,
    ) -> Result<Vec<Item>, StoreError> {
        let key = key_attributes(schema, identity).ok_or_else(|| StoreError::Fetch {
            table: table.to_string(),
            message: format!("key ({identity}) does not match key schema {schema}"),
        })?;

        let response = self
            .client
            .get_item()
            .table_name(table)
            .set_key(Some(key))
            .consistent_read(true)
            .send()
            .await
            .map_err(|e| Self::fetch_error(table, "GetItem", e))?;

        Ok(response.item().cloned().into_iter().collect())
    }
}

#[async_trait]
impl TableStore for DynamoTable {
    async fn describe_key_schema(&self, table: &str) -> Result<Vec<KeyElement>, StoreError> {
        let describe_error = |message: String| StoreError::Describe { table: table.to_string(), message };

        let response = self
            .client
            .describe_table()
            .table_name(table)
            .send()
            .await
            .map_err(|e| describe_error(format!("{}", DisplayErrorContext(e))))?;

        let description = response
            .table()
            .ok_or_else(|| describe_error("response carried no table description".to_string()))?;

        description
            .key_schema()
            .iter()
            .map(|element| {
                let name = element.attribute_name();
                match element.key_type() {
                    DynamoKeyType::Hash => Ok(KeyElement::hash(name)),
                    DynamoKeyType::Range => Ok(KeyElement::range(name)),
                    other => Err(describe_error(format!(
                        "unsupported key type {} for attribute {}",
                        other.as_str(),
                        name
                    ))),
                }
            })
            .collect()
    }

    async fn scan_all(&self, table: &str) -> Result<Vec<Item>, StoreError> {
        self.scan_pages(table, None).await
    }

    async fn get_filtered(
        &self,
        table: &str,
        schema: &KeySchema,
        filter: &ItemFilter,
    ) -> Result<Vec<Item>, StoreError> {
        match FilterQuery::resolve(table, schema, filter)? {
            None => self.scan_all(table).await,
            Some(FilterQuery::Partition { hash }) => {
                self.query_partition(table, &schema.hash_attribute, &hash).await
            },
            Some(FilterQuery::RangeEquals { range_attribute, value }) => {
                self.scan_pages(table, Some((&range_attribute, &value))).await
            },
            Some(FilterQuery::Point(identity)) => self.get_point(table, schema, &identity).await,
        }
    }

    async fn put(&self, table: &str, item: Item) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| StoreError::Write {
                table: table.to_string(),
                message: format!("PutItem failed: {}", DisplayErrorContext(e)),
            })?;
        Ok(())
    }

    async fn delete(
        &self,
        table: &str,
        schema: &KeySchema,
        identity: &Identity,
    ) -> Result<(), StoreError> {
        let key = key_attributes(schema, identity).ok_or_else(|| StoreError::Delete {
            table: table.to_string(),
            message: format!("key ({identity}) does not match key schema {schema}"),
        })?;

        self.client
            .delete_item()
            .table_name(table)
            .set_key(Some(key))
            .send()
            .await
            .map_err(|e| StoreError::Delete {
                table: table.to_string(),
                message: format!("DeleteItem failed: {}", DisplayErrorContext(e)),
            })?;
        Ok(())
    }
}
