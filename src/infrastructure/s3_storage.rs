use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use hmac::{Hmac, Mac};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::application::ports::{FileStorage, StorageError};
use crate::config::BucketConfig;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const SERVICE: &str = "s3";
const SIGNED_HEADERS: &str = "host;x-amz-content-sha256;x-amz-date";

/// SHA-256 of an empty payload
const EMPTY_PAYLOAD_HASH: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn hmac(key: &[u8], data: &str) -> Vec<u8> {
    let mut mac = match HmacSha256::new_from_slice(key) {
        Ok(mac) => mac,
        Err(_) => unreachable!("hmac key length is unrestricted"),
    };
    mac.update(data.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

/// Key derived from the secret for one day, region and service
pub fn signing_key(secret: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac(format!("AWS4{secret}").as_bytes(), date);
    let k_region = hmac(&k_date, region);
    let k_service = hmac(&k_region, service);
    hmac(&k_service, "aws4_request")
}

/// Percent-encode a key path, keeping `/` separators.
fn uri_encode(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for byte in path.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Headers produced by signing one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub authorization: String,
    pub amz_date: String,
    pub payload_hash: String,
}

/// S3 bucket accessed with path-style URLs and Signature V4
pub struct S3Storage {
    client: Client,
    config: BucketConfig,
}

impl S3Storage {
    pub fn new(client: Client, config: BucketConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self) -> String {
        match &self.config.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://s3.{}.amazonaws.com", self.config.region),
        }
    }

    fn host(&self) -> String {
        let endpoint = self.endpoint();
        endpoint
            .split_once("://")
            .map(|(_, host)| host.to_string())
            .unwrap_or(endpoint)
    }

    fn canonical_uri(&self, key: &str) -> String {
        uri_encode(&format!(
            "/{}/{}",
            self.config.bucket,
            key.trim_start_matches('/')
        ))
    }

    pub fn sign(
        &self,
        method: &Method,
        canonical_uri: &str,
        payload_hash: &str,
        now: DateTime<Utc>,
    ) -> Signature {
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let date = now.format("%Y%m%d").to_string();
        let scope = format!("{date}/{}/{SERVICE}/aws4_request", self.config.region);

        let canonical_request = format!(
            "{method}\n{canonical_uri}\n\nhost:{}\nx-amz-content-sha256:{payload_hash}\nx-amz-date:{amz_date}\n\n{SIGNED_HEADERS}\n{payload_hash}",
            self.host()
        );
        let string_to_sign = format!(
            "{ALGORITHM}\n{amz_date}\n{scope}\n{}",
            sha256_hex(canonical_request.as_bytes())
        );

        let key = signing_key(
            &self.config.secret_access_key,
            &date,
            &self.config.region,
            SERVICE,
        );
        let signature = hex::encode(hmac(&key, &string_to_sign));

        Signature {
            authorization: format!(
                "{ALGORITHM} Credential={}/{scope}, SignedHeaders={SIGNED_HEADERS}, Signature={signature}",
                self.config.access_key_id
            ),
            amz_date,
            payload_hash: payload_hash.to_string(),
        }
    }

    fn request(&self, method: Method, key: &str, payload_hash: &str) -> RequestBuilder {
        let canonical_uri = self.canonical_uri(key);
        let signature = self.sign(&method, &canonical_uri, payload_hash, Utc::now());

        self.client
            .request(method, format!("{}{canonical_uri}", self.endpoint()))
            .header("authorization", signature.authorization)
            .header("x-amz-date", signature.amz_date)
            .header("x-amz-content-sha256", signature.payload_hash)
    }
}

async fn rejected(response: reqwest::Response) -> StorageError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    StorageError::Rejected { status, body }
}

async fn write_body(response: reqwest::Response, destination: &Path) -> Result<u64, StorageError> {
    let mut file = File::create(destination).await?;
    let mut stream = response.bytes_stream();
    let mut written = 0u64;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}

#[async_trait]
impl FileStorage for S3Storage {
    async fn download(&self, key: &str, destination: &Path) -> Result<u64, StorageError> {
        let response = self
            .request(Method::GET, key, EMPTY_PAYLOAD_HASH)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound(key.to_string()));
        }
        if !response.status().is_success() {
            return Err(rejected(response).await);
        }

        let written = match write_body(response, destination).await {
            Ok(written) => written,
            Err(e) => {
                warn!(bucket = %self.config.bucket, key, error = %e, "download interrupted");
                let _ = tokio::fs::remove_file(destination).await;
                return Err(e);
            }
        };

        debug!(bucket = %self.config.bucket, key, bytes = written, "object downloaded");
        Ok(written)
    }

    async fn upload(
        &self,
        key: &str,
        source: &Path,
        content_type: &str,
    ) -> Result<u64, StorageError> {
        let body = tokio::fs::read(source).await?;
        let size = body.len() as u64;
        let payload_hash = sha256_hex(&body);

        let response = self
            .request(Method::PUT, key, &payload_hash)
            .header("content-type", content_type)
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(rejected(response).await);
        }

        info!(bucket = %self.config.bucket, key, bytes = size, "object uploaded");
        Ok(size)
    }
}
