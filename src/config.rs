use crate::backend::BackendKind;
use crate::error::{DiagError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// 設定できるファイルサイズ上限の最大値（MB）
pub const MAX_FILE_SIZE_MB_LIMIT: u64 = 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub backend: BackendKind,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub mock_delay_ms: u64,
    pub timeout_seconds: u64,
    pub max_file_size_mb: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendKind::Mock,
            endpoint: None,
            api_key: None,
            mock_delay_ms: solar_diag_common::analyzer::MOCK_DELAY_MS,
            timeout_seconds: solar_diag_common::analyzer::BACKEND_TIMEOUT_SECS,
            max_file_size_mb: solar_diag_common::types::DEFAULT_MAX_FILE_SIZE_MB,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_json(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 手編集された値の範囲チェック
    pub fn validate(&self) -> Result<()> {
        if self.max_file_size_mb == 0 || self.max_file_size_mb > MAX_FILE_SIZE_MB_LIMIT {
            return Err(DiagError::Config(format!(
                "maxFileSizeMb は 1〜{} の範囲で指定してください: {}",
                MAX_FILE_SIZE_MB_LIMIT, self.max_file_size_mb
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(DiagError::Config("timeoutSeconds は 1 以上を指定してください".into()));
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| DiagError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("solar-diag").join("config.json"))
    }

    pub fn get_api_key(&self) -> Option<String> {
        // 環境変数を優先
        std::env::var("SOLAR_DIAG_API_KEY").ok().or_else(|| self.api_key.clone())
    }

    pub fn get_endpoint(&self) -> Result<String> {
        if let Ok(endpoint) = std::env::var("SOLAR_DIAG_ENDPOINT") {
            return Ok(endpoint);
        }

        self.endpoint.clone().ok_or(DiagError::MissingEndpoint)
    }

    pub fn mock_delay(&self) -> Duration {
        Duration::from_millis(self.mock_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.api_key = Some(key);
        self.save()
    }

    pub fn set_endpoint(&mut self, endpoint: String) -> Result<()> {
        self.endpoint = Some(endpoint);
        self.save()
    }

    pub fn set_backend(&mut self, backend: BackendKind) -> Result<()> {
        self.backend = backend;
        self.save()
    }
}
