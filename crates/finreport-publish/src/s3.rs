//! S3-backed object store.

use crate::store::ObjectStore;
use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use finreport_common::{ReportError, Result};
use tracing::info;

/// Object store backed by an S3 bucket. Credentials and region come from
/// the ambient AWS configuration; bucket and region names are supplied by
/// the caller's configuration, never computed here.
pub struct S3Store {
    client: aws_sdk_s3::Client,
    bucket: String,
    region: String,
}

impl S3Store {
    /// Connects using the default AWS credential chain.
    pub async fn connect(bucket: &str, region: &str) -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;
        Self {
            client: aws_sdk_s3::Client::new(&config),
            bucket: bucket.to_string(),
            region: region.to_string(),
        }
    }

    /// Builds a store from an existing client, for tests against local
    /// S3-compatible endpoints.
    pub fn with_client(client: aws_sdk_s3::Client, bucket: &str, region: &str) -> Self {
        Self {
            client,
            bucket: bucket.to_string(),
            region: region.to_string(),
        }
    }

    fn publish_err(&self, context: &str, e: impl std::fmt::Display) -> ReportError {
        ReportError::Publish(format!("{context} (bucket {}): {e}", self.bucket))
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn ensure_bucket(&self) -> Result<()> {
        // us-east-1 must not receive a location constraint.
        let mut request = self.client.create_bucket().bucket(&self.bucket);
        if self.region != "us-east-1" {
            let constraint = BucketLocationConstraint::from(self.region.as_str());
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(constraint)
                    .build(),
            );
        }
        match request.send().await {
            Ok(_) => {
                info!("created bucket '{}' in '{}'", self.bucket, self.region);
                Ok(())
            }
            Err(e) => {
                let service_err = e.into_service_error();
                if service_err.is_bucket_already_owned_by_you()
                    || service_err.is_bucket_already_exists()
                {
                    info!("bucket '{}' already exists", self.bucket);
                    Ok(())
                } else {
                    Err(self.publish_err("create bucket", service_err))
                }
            }
        }
    }

    async fn put_object(&self, key: &str, body: Vec<u8>) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| self.publish_err(&format!("upload '{key}'"), e))?;
        info!("uploaded '{key}' to bucket '{}'", self.bucket);
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| self.publish_err(&format!("download '{key}'"), e))?;
        let bytes = response
            .body
            .collect()
            .await
            .map_err(|e| self.publish_err(&format!("read body of '{key}'"), e))?;
        Ok(bytes.into_bytes().to_vec())
    }

    async fn list_objects(&self, prefix: &str) -> Result<Vec<String>> {
        let response = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix)
            .send()
            .await
            .map_err(|e| self.publish_err("list objects", e))?;
        Ok(response
            .contents()
            .iter()
            .filter_map(|object| object.key().map(|k| k.to_string()))
            .collect())
    }
}
