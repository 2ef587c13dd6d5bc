//! HTTP Metadata Source - 通过 GET 读取静态元数据文本

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::application::ports::{MetadataError, MetadataSourcePort};
use crate::domain::metadata::MetadataTable;

pub struct HttpMetadataSource {
    client: Client,
    url: String,
}

impl HttpMetadataSource {
    pub fn new(url: impl Into<String>, timeout_secs: u64) -> Result<Self, MetadataError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| MetadataError::FetchError(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl MetadataSourcePort for HttpMetadataSource {
    async fn fetch(&self) -> Result<MetadataTable, MetadataError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| MetadataError::FetchError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MetadataError::FetchError(format!("HTTP {}", status)));
        }

        let text = response
            .text()
            .await
            .map_err(|e| MetadataError::FetchError(e.to_string()))?;

        if text.trim().is_empty() {
            return Err(MetadataError::Empty);
        }

        let table = MetadataTable::parse(&text);
        tracing::debug!(url = %self.url, records = table.len(), "Fetched metadata");
        Ok(table)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
