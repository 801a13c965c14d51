//! HTTP endpoints of the monitor server.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::core::telemetry::GpuInfo;
use crate::error::{ChartError, Result};

const MONITOR_PATH: &str = "crystools/monitor";

/// Server-side collection settings. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonitorSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    #[serde(rename = "switchCPU", skip_serializing_if = "Option::is_none")]
    pub switch_cpu: Option<bool>,
    #[serde(rename = "switchRAM", skip_serializing_if = "Option::is_none")]
    pub switch_ram: Option<bool>,
    #[serde(rename = "switchTransferSpeed", skip_serializing_if = "Option::is_none")]
    pub switch_transfer_speed: Option<bool>,
    #[serde(rename = "switchSharedGPUMemory", skip_serializing_if = "Option::is_none")]
    pub switch_shared_gpu_memory: Option<bool>,
}

impl MonitorSettings {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Per-GPU sensor switches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GpuSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utilization: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vram: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<bool>,
}

impl GpuSettings {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Serialize)]
struct SwitchRequest {
    monitor: bool,
}

#[derive(Debug, Clone)]
pub struct MonitorApi {
    client: reqwest::Client,
    base: Url,
}

impl MonitorApi {
    pub fn new(server_url: &str) -> Result<Self> {
        let mut base = Url::parse(server_url)?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ChartError::config(format!(
                "Server URL must be http or https, got '{}'",
                base.scheme()
            )));
        }
        // `join` treats the last segment as a file unless the path ends in '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("hwmon-charts/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path)?)
    }

    /// GPUs the server can report on.
    pub async fn fetch_gpus(&self) -> Result<Vec<GpuInfo>> {
        let url = self.endpoint(&format!("{}/GPU", MONITOR_PATH))?;
        let response = check(self.client.get(url).send().await?).await?;
        Ok(response.json().await?)
    }

    pub async fn push_settings(&self, settings: &MonitorSettings) -> Result<()> {
        let url = self.endpoint(MONITOR_PATH)?;
        check(self.client.patch(url).json(settings).send().await?).await?;
        Ok(())
    }

    /// Start or stop collection on the server.
    pub async fn switch_monitor(&self, monitor: bool) -> Result<()> {
        let url = self.endpoint(&format!("{}/switch", MONITOR_PATH))?;
        check(
            self.client
                .post(url)
                .json(&SwitchRequest { monitor })
                .send()
                .await?,
        )
        .await?;
        Ok(())
    }

    pub async fn push_gpu_settings(&self, index: usize, settings: &GpuSettings) -> Result<()> {
        let url = self.endpoint(&format!("{}/GPU/{}", MONITOR_PATH, index))?;
        check(self.client.patch(url).json(settings).send().await?).await?;
        Ok(())
    }

    /// Raw transfer speed measurement info, passed through as JSON.
    pub async fn transfer_speed_info(&self) -> Result<serde_json::Value> {
        let url = self.endpoint(&format!("{}/TransferSpeed", MONITOR_PATH))?;
        let response = check(self.client.get(url).send().await?).await?;
        Ok(response.json().await?)
    }

    /// GPU count for catalog initialization; failures count as zero GPUs.
    pub async fn gpu_count(&self) -> usize {
        match self.fetch_gpus().await {
            Ok(gpus) => gpus.len(),
            Err(e) => {
                log::warn!("Could not enumerate GPUs: {}", e);
                0
            }
        }
    }
}

async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ChartError::Rejected {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_keep_base_path() {
        let api = MonitorApi::new("http://127.0.0.1:8188").unwrap();
        assert_eq!(
            api.endpoint("crystools/monitor/GPU").unwrap().as_str(),
            "http://127.0.0.1:8188/crystools/monitor/GPU"
        );

        let proxied = MonitorApi::new("https://example.com/comfy").unwrap();
        assert_eq!(
            proxied.endpoint("crystools/monitor/switch").unwrap().as_str(),
            "https://example.com/comfy/crystools/monitor/switch"
        );
    }

    #[test]
    fn test_rejects_non_http_urls() {
        assert!(matches!(
            MonitorApi::new("ftp://example.com"),
            Err(ChartError::Config(_))
        ));
        assert!(matches!(MonitorApi::new("not a url"), Err(ChartError::Url(_))));
    }

    #[test]
    fn test_settings_serialize_only_set_fields() {
        let settings = MonitorSettings {
            rate: Some(0.5),
            switch_shared_gpu_memory: Some(false),
            ..Default::default()
        };
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"rate": 0.5, "switchSharedGPUMemory": false})
        );
        assert!(MonitorSettings::default().is_empty());
        assert!(!settings.is_empty());
    }

    #[test]
    fn test_gpu_settings_serialize() {
        let settings = GpuSettings {
            vram: Some(true),
            temperature: Some(false),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_string(&settings).unwrap(),
            r#"{"vram":true,"temperature":false}"#
        );
    }

    #[test]
    fn test_switch_request_body() {
        assert_eq!(
            serde_json::to_string(&SwitchRequest { monitor: true }).unwrap(),
            r#"{"monitor":true}"#
        );
    }
}
