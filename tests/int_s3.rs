use anyhow::Result;
use crxscan::s3::{self, BucketConfig};

/// Lists a well-known public dataset bucket. Needs outbound network access,
/// so it stays out of the default test run.
#[tokio::test]
#[ignore = "requires network access to a public S3 bucket"]
async fn test_list_public_bucket_keys() -> Result<()> {
    let config = BucketConfig {
        bucket: "awsglue-datasets".to_string(),
        prefix: Some("examples/us-legislators/all/".to_string()),
        profile: None,
    };
    let client = s3::build_client(&config).await;

    let keys = s3::list_keys(&client, &config, 5).await?;
    assert!(!keys.is_empty(), "expected at least one object key");
    assert!(keys.len() <= 5, "listing must honor the cap");
    assert!(keys.iter().all(|k| k.starts_with("examples/us-legislators/all/")));
    Ok(())
}
