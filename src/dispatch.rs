use anyhow::Context;
use log::debug;
use serde_json::Value;

use crate::client::{Command, MessagingClient};

/// Runs one command per recipient, strictly in order, awaiting each before the
/// next. The first failure stops the loop and the partial results are dropped.
pub async fn fan_out<F>(
    client: &dyn MessagingClient,
    recipients: &[String],
    mut build: F,
) -> anyhow::Result<Vec<Value>>
where
    F: FnMut(&str) -> Command,
{
    let mut results = Vec::with_capacity(recipients.len());
    for (position, to) in recipients.iter().enumerate() {
        debug!("Dispatching to {} ({}/{})", to, position + 1, recipients.len());
        let result = client
            .execute(build(to))
            .await
            .with_context(|| format!("send to {} failed", to))?;
        results.push(result);
    }
    Ok(results)
}
