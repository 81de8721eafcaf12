//! Database commands

use anyhow::{Context, Result};
use firelink_sdk::FirebaseApp;
use serde_json::Value;

use super::Outcome;

/// Print the stored value; a rejected read is reported, not shown as `null`
pub async fn get(app: &FirebaseApp, path: &str, pretty: bool) -> Result<Outcome> {
    let node = app.database().reference(path)?;
    let Some(body) = node.read_raw().await? else {
        return report(false, "get", path);
    };
    let value: Value = serde_json::from_str(&body)
        .with_context(|| format!("response for /{} is not valid JSON", node.path()))?;
    println!("{}", render(&value, pretty)?);
    Ok(Outcome::Done)
}

pub async fn set(app: &FirebaseApp, path: &str, json: &str) -> Result<Outcome> {
    let node = app.database().reference(path)?;
    report(node.write_raw(json).await?, "set", path)
}

pub async fn update(app: &FirebaseApp, path: &str, json: &str) -> Result<Outcome> {
    let patch = parse_object(json)?;
    let node = app.database().reference(path)?;
    report(node.update(&patch).await?, "update", path)
}

pub async fn delete(app: &FirebaseApp, path: &str) -> Result<Outcome> {
    let node = app.database().reference(path)?;
    report(node.remove().await?, "delete", path)
}

/// Print the request URL, including `auth=` when signed in
pub fn url(app: &FirebaseApp, path: &str) -> Result<Outcome> {
    let node = app.database().reference(path)?;
    println!("{}", node.request_url()?);
    Ok(Outcome::Done)
}

fn report(accepted: bool, verb: &str, path: &str) -> Result<Outcome> {
    if !accepted {
        eprintln!("{verb} rejected at /{}", path.trim_matches('/'));
    }
    Ok(Outcome::from_accepted(accepted))
}

fn render(value: &Value, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}

/// PATCH bodies must be JSON objects
fn parse_object(json: &str) -> Result<serde_json::Map<String, Value>> {
    let value: Value = serde_json::from_str(json).context("update body is not valid JSON")?;
    match value {
        Value::Object(map) => Ok(map),
        other => anyhow::bail!("update body must be a JSON object, got {other}"),
    }
}
