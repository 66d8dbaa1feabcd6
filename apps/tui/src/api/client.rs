use std::path::Path;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde_json::{json, Value};

use super::envelope::{parse_alert_items, parse_upload_grant};
use super::error::ApiError;
use super::models::{Alert, UploadGrant};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Thin client over the two collaborator endpoints plus the storage
/// PUT. Cheap to clone; each in-flight request owns a clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// GET the alert collection, unwrapping either envelope shape.
    pub async fn fetch_alerts(&self) -> Result<Vec<Alert>, ApiError> {
        let response = self.http.get(self.endpoint("alerts")).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::status("API Error", response.status().as_u16()));
        }

        let value: Value = response.json().await?;
        parse_alert_items(value)
    }

    /// Phase one of an upload: ask the service for a pre-signed URL.
    pub async fn request_upload_url(
        &self,
        file_name: &str,
        file_type: &str,
    ) -> Result<UploadGrant, ApiError> {
        let response = self
            .http
            .post(self.endpoint("upload"))
            .json(&json!({ "fileName": file_name, "fileType": file_type }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::status(
                "Failed to get upload URL",
                response.status().as_u16(),
            ));
        }

        let value: Value = response.json().await?;
        parse_upload_grant(value)
    }

    /// Phase two: PUT the raw bytes to the granted target.
    pub async fn put_object(
        &self,
        grant: &UploadGrant,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), ApiError> {
        let response = self
            .http
            .put(&grant.upload_url)
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::status(
                "Upload failed",
                response.status().as_u16(),
            ));
        }

        Ok(())
    }

    /// Full two-phase upload. The grant request runs first; no PUT is
    /// ever attempted when it fails.
    pub async fn upload_image(
        &self,
        path: &Path,
        file_name: &str,
        content_type: &str,
    ) -> Result<(), ApiError> {
        let bytes = tokio::fs::read(path).await?;
        let grant = self.request_upload_url(file_name, content_type).await?;
        self.put_object(&grant, content_type, bytes).await
    }
}

#[cfg(test)]
mod tests {
    use super::ApiClient;
    use crate::api::error::ApiError;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Minimal HTTP responder that records the method of every request
    /// it answers. `grant_url` picks the POST response: a grant payload
    /// when set, a 500 when not. Responses close the connection so each
    /// request arrives on a fresh accept.
    fn spawn_recorder(listener: TcpListener, grant_url: Option<String>) -> Arc<Mutex<Vec<String>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&seen);
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let mut buf = vec![0_u8; 8192];
                let Ok(n) = socket.read(&mut buf).await else {
                    continue;
                };
                let request = String::from_utf8_lossy(&buf[..n]).into_owned();
                let method = request
                    .split_whitespace()
                    .next()
                    .unwrap_or_default()
                    .to_string();
                recorded.lock().unwrap().push(method.clone());

                let response = match (&grant_url, method.as_str()) {
                    (Some(url), "POST") => {
                        let body = format!("{{\"uploadUrl\":\"{url}\"}}");
                        format!(
                            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\n\
                             content-length: {}\r\nconnection: close\r\n\r\n{body}",
                            body.len()
                        )
                    }
                    (None, "POST") => {
                        "HTTP/1.1 500 Internal Server Error\r\ncontent-length: 0\r\n\
                         connection: close\r\n\r\n"
                            .to_string()
                    }
                    _ => "HTTP/1.1 200 OK\r\ncontent-length: 0\r\nconnection: close\r\n\r\n"
                        .to_string(),
                };
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });
        seen
    }

    async fn temp_image(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        tokio::fs::write(&path, b"jpeg bytes").await.unwrap();
        path
    }

    #[tokio::test]
    async fn failed_grant_request_sends_no_put() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let seen = spawn_recorder(listener, None);

        let path = temp_image("grant_refused.jpg").await;
        let client = ApiClient::new(format!("http://{addr}")).unwrap();
        let result = client
            .upload_image(&path, "grant_refused.jpg", "image/jpeg")
            .await;
        tokio::fs::remove_file(&path).await.unwrap();

        assert!(matches!(
            result,
            Err(ApiError::Status {
                context: "Failed to get upload URL",
                status: 500
            })
        ));
        // The grant request was the only HTTP traffic.
        assert_eq!(*seen.lock().unwrap(), vec!["POST".to_string()]);
    }

    #[tokio::test]
    async fn upload_puts_only_after_a_grant() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let seen = spawn_recorder(listener, Some(format!("http://{addr}/drop/scene.jpg")));

        let path = temp_image("granted_scene.jpg").await;
        let client = ApiClient::new(format!("http://{addr}")).unwrap();
        client
            .upload_image(&path, "granted_scene.jpg", "image/jpeg")
            .await
            .unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec!["POST".to_string(), "PUT".to_string()]
        );
    }
}
