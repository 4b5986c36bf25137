//! DynamoDB launch table
//!
//! Sessions share one loaded SDK configuration; each session builds its
//! own client and is dropped when the query that opened it returns.
//! Predicates are rendered into a `FilterExpression`, so filtering happens
//! inside the table scan and `Limit` counts examined items.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_dynamodb::config::{Credentials, Region};
use aws_sdk_dynamodb::error::{DisplayErrorContext, SdkError};
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use launchcore_core::{CredentialSource, StoreConfig};
use launchcore_query::{
    attr, Condition, Cursor, Operand, Predicate, RawRecord, RawValue, ScanOutput, ScanRequest,
    SessionFactory, StoreError, StoreSession,
};
use std::collections::HashMap;
use tracing::debug;

const CREDENTIALS_PROVIDER: &str = "launch-api-static";

/// Opens sessions against the configured launch table
#[derive(Debug, Clone)]
pub struct DynamoSessionFactory {
    sdk_config: SdkConfig,
    table_name: String,
}

impl DynamoSessionFactory {
    /// Load the SDK configuration for a store config.
    pub async fn from_config(config: &StoreConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let Some(endpoint_url) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }
        if let CredentialSource::Static {
            access_key_id,
            secret_access_key,
        } = config.credentials()
        {
            loader = loader.credentials_provider(Credentials::new(
                access_key_id,
                secret_access_key,
                None,
                None,
                CREDENTIALS_PROVIDER,
            ));
        }

        Self {
            sdk_config: loader.load().await,
            table_name: config.table_name.clone(),
        }
    }
}

#[async_trait]
impl SessionFactory for DynamoSessionFactory {
    type Session = DynamoSession;

    async fn open(&self) -> Result<DynamoSession, StoreError> {
        Ok(DynamoSession {
            client: Client::new(&self.sdk_config),
            table_name: self.table_name.clone(),
        })
    }
}

/// One DynamoDB client bound to the launch table
#[derive(Debug)]
pub struct DynamoSession {
    client: Client,
    table_name: String,
}

#[async_trait]
impl StoreSession for DynamoSession {
    async fn scan(&self, request: ScanRequest) -> Result<ScanOutput, StoreError> {
        let limit = i32::try_from(request.limit)
            .map_err(|_| StoreError::Request(format!("limit {} too large", request.limit)))?;

        let mut scan = self
            .client
            .scan()
            .table_name(&self.table_name)
            .limit(limit);

        if let Some(cursor) = &request.start_after {
            scan = scan.exclusive_start_key(
                attr::LAUNCH_ID,
                AttributeValue::S(cursor.as_str().to_string()),
            );
        }
        if let Some(predicate) = request.predicate.as_ref().filter(|p| !p.is_empty()) {
            let filter = FilterExpression::render(predicate);
            debug!(expression = %filter.expression, "Scanning with filter");
            scan = scan
                .filter_expression(filter.expression)
                .set_expression_attribute_names(Some(filter.names))
                .set_expression_attribute_values(Some(filter.values));
        }

        let output = scan.send().await.map_err(store_error)?;

        let items = output.items().iter().map(raw_record).collect();
        let last_evaluated_key = match output.last_evaluated_key() {
            Some(key) => Some(cursor_from_key(key)?),
            None => None,
        };

        Ok(ScanOutput {
            items,
            last_evaluated_key,
        })
    }

    async fn get_item(&self, id: &str) -> Result<Option<RawRecord>, StoreError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(attr::LAUNCH_ID, AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(store_error)?;

        Ok(output.item().map(raw_record))
    }
}

fn store_error<E, R>(err: SdkError<E, R>) -> StoreError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let unreachable = matches!(
        &err,
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_)
    );
    let message = DisplayErrorContext(&err).to_string();
    if unreachable {
        StoreError::Unavailable(message)
    } else {
        StoreError::Request(message)
    }
}

fn cursor_from_key(key: &HashMap<String, AttributeValue>) -> Result<Cursor, StoreError> {
    key.get(attr::LAUNCH_ID)
        .and_then(|value| value.as_s().ok())
        .map(|id| Cursor::after(id.as_str()))
        .ok_or_else(|| {
            StoreError::MalformedResponse("LastEvaluatedKey has no string launch_id".to_string())
        })
}

fn raw_record(item: &HashMap<String, AttributeValue>) -> RawRecord {
    item.iter()
        .map(|(name, value)| (name.clone(), raw_value(value)))
        .collect()
}

fn raw_value(value: &AttributeValue) -> RawValue {
    match value {
        AttributeValue::S(s) => RawValue::String(s.clone()),
        AttributeValue::N(n) => RawValue::Number(n.clone()),
        AttributeValue::Bool(b) => RawValue::Bool(*b),
        AttributeValue::L(items) => RawValue::List(items.iter().map(raw_value).collect()),
        AttributeValue::M(fields) => RawValue::Map(
            fields
                .iter()
                .map(|(name, value)| (name.clone(), raw_value(value)))
                .collect(),
        ),
        AttributeValue::Ss(items) => {
            RawValue::List(items.iter().cloned().map(RawValue::String).collect())
        }
        AttributeValue::Ns(items) => {
            RawValue::List(items.iter().cloned().map(RawValue::Number).collect())
        }
        // binary attributes carry nothing a launch uses
        _ => RawValue::Null,
    }
}

/// A predicate rendered for the `Scan` API
#[derive(Debug, Clone, PartialEq)]
pub struct FilterExpression {
    /// Condition text, e.g. `contains(#n0, :v0) AND #n1 = :v1`
    pub expression: String,
    /// `ExpressionAttributeNames`
    pub names: HashMap<String, String>,
    /// `ExpressionAttributeValues`
    pub values: HashMap<String, AttributeValue>,
}

impl FilterExpression {
    /// Render a predicate. Attribute names always go through placeholders
    /// because `status` is a reserved word.
    pub fn render(predicate: &Predicate) -> Self {
        let mut rendered = Self {
            expression: String::new(),
            names: HashMap::new(),
            values: HashMap::new(),
        };
        let mut clauses = Vec::with_capacity(predicate.conditions().len());

        for (i, condition) in predicate.conditions().iter().enumerate() {
            let name = format!("#n{i}");
            rendered
                .names
                .insert(name.clone(), condition.attribute().to_string());

            let clause = match condition {
                Condition::Contains { needle, .. } => {
                    let v = rendered.bind(&Operand::Str(needle.clone()));
                    format!("contains({name}, {v})")
                }
                Condition::Equals { value, .. } => {
                    let v = rendered.bind(value);
                    format!("{name} = {v}")
                }
                Condition::Between { low, high, .. } => {
                    let lo = rendered.bind(low);
                    let hi = rendered.bind(high);
                    format!("{name} BETWEEN {lo} AND {hi}")
                }
                Condition::AtLeast { bound, .. } => {
                    let v = rendered.bind(bound);
                    format!("{name} >= {v}")
                }
                Condition::AtMost { bound, .. } => {
                    let v = rendered.bind(bound);
                    format!("{name} <= {v}")
                }
            };
            clauses.push(clause);
        }

        rendered.expression = clauses.join(" AND ");
        rendered
    }

    fn bind(&mut self, operand: &Operand) -> String {
        let placeholder = format!(":v{}", self.values.len());
        self.values.insert(placeholder.clone(), attribute_value(operand));
        placeholder
    }
}

fn attribute_value(operand: &Operand) -> AttributeValue {
    match operand {
        Operand::Str(s) => AttributeValue::S(s.clone()),
        Operand::Int(n) => AttributeValue::N(n.to_string()),
    }
}
