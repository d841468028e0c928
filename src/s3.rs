use anyhow::{Context, Result};
use aws_config::{meta::region::RegionProviderChain, BehaviorVersion};
use aws_sdk_s3::Client;

/// Everything a remote call needs to know, passed explicitly instead of
/// read from ambient process state.
#[derive(Debug, Clone)]
pub struct BucketConfig {
    pub bucket: String,
    pub prefix: Option<String>,
    pub profile: Option<String>,
}

/// Build an S3 client for the given bucket configuration.
///
/// The named profile is applied to the SDK config loader when set; the
/// region resolves via the default chain, falling back to us-east-1.
pub async fn build_client(config: &BucketConfig) -> Client {
    let mut config_loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(profile) = &config.profile {
        config_loader = config_loader.profile_name(profile);
    }

    let region_provider = RegionProviderChain::default_provider().or_else("us-east-1");
    let base_config = config_loader.region(region_provider).load().await;
    Client::new(&base_config)
}

/// List at most `max` object keys from the bucket, in listing order.
///
/// Directory placeholder keys (trailing `/`) carry no bytes and are skipped.
pub async fn list_keys(client: &Client, config: &BucketConfig, max: usize) -> Result<Vec<String>> {
    let mut keys = Vec::new();
    if max == 0 {
        return Ok(keys);
    }

    let mut continuation_token = None;

    loop {
        let mut req = client.list_objects_v2().bucket(&config.bucket);
        if let Some(p) = &config.prefix {
            req = req.prefix(p);
        }
        if let Some(token) = continuation_token.clone() {
            req = req.continuation_token(token);
        }

        let resp = req.send().await.context("Failed to list objects in bucket")?;

        if let Some(objects) = resp.contents {
            for obj in objects {
                if let Some(key) = obj.key {
                    if key.ends_with('/') {
                        continue;
                    }
                    keys.push(key);
                    if keys.len() == max {
                        return Ok(keys);
                    }
                }
            }
        }

        if resp.is_truncated.unwrap_or(false) {
            continuation_token = resp.next_continuation_token;
        } else {
            break;
        }
    }

    Ok(keys)
}

/// Fetch one object's bytes.
pub async fn fetch_object(client: &Client, bucket: &str, key: &str) -> Result<Vec<u8>> {
    let resp = client
        .get_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .with_context(|| format!("Failed to fetch object {key}"))?;
    let data = resp.body.collect().await.context("Failed to read S3 object body")?;
    Ok(data.into_bytes().to_vec())
}
