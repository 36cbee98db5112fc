use crate::domain::ports::{MintRequest, MintedTransaction, PaymentProvider};
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

/// HTTP client for the FedaPay transaction API.
///
/// Only the mint call is needed here; the provider reports outcomes through
/// the callback endpoint, not through this client.
pub struct FedapayClient {
    http: reqwest::Client,
    api_base: String,
    secret_key: String,
}

impl FedapayClient {
    /// # Arguments
    ///
    /// * `api_base` - Base URL of the FedaPay API, without a trailing slash.
    /// * `secret_key` - Bearer credential for the merchant account.
    /// * `timeout` - Per-request timeout; an expired timeout surfaces as a
    ///   provider error.
    pub fn new(
        api_base: impl Into<String>,
        secret_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_base: api_base.into(),
            secret_key: secret_key.into(),
        })
    }
}

#[derive(Serialize)]
struct CreateTransactionBody<'a> {
    // FedaPay expects the amount as a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    amount: Decimal,
    description: &'a str,
    callback_url: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateTransactionReply {
    // The API reports the transaction id as a number.
    #[serde(deserialize_with = "lenient_id")]
    id: String,
    payment_url: String,
}

fn lenient_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Num(u64),
        Str(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Num(n) => n.to_string(),
        RawId::Str(s) => s,
    })
}

#[async_trait]
impl PaymentProvider for FedapayClient {
    async fn create_transaction(&self, mint: MintRequest) -> Result<MintedTransaction> {
        let url = format!("{}/v1/transactions", self.api_base);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.secret_key)
            .json(&CreateTransactionBody {
                amount: mint.amount.value(),
                description: &mint.description,
                callback_url: &mint.callback_url,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PaymentError::Provider(format!(
                "mint call returned {status}"
            )));
        }

        let reply: CreateTransactionReply = response
            .json()
            .await
            .map_err(|err| PaymentError::Provider(format!("unparseable mint response: {err}")))?;

        Ok(MintedTransaction {
            id: reply.id,
            payment_url: reply.payment_url,
        })
    }
}
