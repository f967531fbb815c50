//! 解析フローの型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - ImageClass: 画像の撮影モダリティ（RGB/サーマル/ドローン連続写真）
//! - UploadSelection: ユーザーが選んだ1枚の画像
//! - AnalysisRequest: 送信時点のスナップショット
//! - AnalysisResult: バックエンドの解析結果（健全度・故障・信頼度・推奨作業）

use crate::error::{AnalysisError, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 受け付ける画像拡張子（小文字で比較）
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tif", "tiff", "webp"];

/// スコアの上限（健全度・信頼度とも0-100）
pub const SCORE_MAX: u8 = 100;

/// 画像サイズ上限の既定値（MB）
pub const DEFAULT_MAX_FILE_SIZE_MB: u64 = 25;

/// MB をバイト数に換算（桁あふれは u64::MAX で頭打ち）
pub fn mb_to_bytes(mb: u64) -> u64 {
    mb.saturating_mul(1024 * 1024)
}

/// 画像の種類タグ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageClass {
    Rgb,
    Thermal,
    #[serde(alias = "drone-sequence", alias = "drone_sequence")]
    Drone,
}

impl ImageClass {
    pub const ALL: [ImageClass; 3] = [ImageClass::Rgb, ImageClass::Thermal, ImageClass::Drone];

    /// ワイヤ上の値
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageClass::Rgb => "rgb",
            ImageClass::Thermal => "thermal",
            ImageClass::Drone => "drone",
        }
    }

    /// 画面表示用ラベル
    pub fn label(&self) -> &'static str {
        match self {
            ImageClass::Rgb => "RGB (Regular Camera)",
            ImageClass::Thermal => "Thermal",
            ImageClass::Drone => "Drone Sequence",
        }
    }
}

impl fmt::Display for ImageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageClass {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rgb" => Ok(ImageClass::Rgb),
            "thermal" => Ok(ImageClass::Thermal),
            "drone" | "drone-sequence" | "drone_sequence" => Ok(ImageClass::Drone),
            _ => Err(format!("Unknown image type: {}. Use rgb, thermal, or drone", s)),
        }
    }
}

/// 選択中の画像
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSelection {
    pub file_name: String,
    pub byte_size: u64,

    /// 撮影日時（EXIFから取れた場合のみ）
    #[serde(default)]
    pub captured_at: Option<String>,

    #[serde(skip)]
    pub payload: Vec<u8>,
}

impl UploadSelection {
    /// 拡張子をチェックして選択を作る
    pub fn new(file_name: impl Into<String>, payload: Vec<u8>) -> std::result::Result<Self, AnalysisError> {
        let file_name = file_name.into();
        if !has_image_extension(&file_name) {
            return Err(AnalysisError::UnsupportedFileType(file_name));
        }

        Ok(Self {
            byte_size: payload.len() as u64,
            file_name,
            captured_at: None,
            payload,
        })
    }

    pub fn with_captured_at(mut self, captured_at: Option<String>) -> Self {
        self.captured_at = captured_at;
        self
    }

    /// サイズ上限（MB）を超えていないか確認
    pub fn check_size_limit(&self, max_mb: u64) -> std::result::Result<(), AnalysisError> {
        if self.byte_size > mb_to_bytes(max_mb) {
            return Err(AnalysisError::UnsupportedFileType(format!(
                "{} ({} > {} MB)",
                self.file_name,
                self.size_mb_label(),
                max_mb
            )));
        }
        Ok(())
    }

    /// "2.00 MB" 形式
    pub fn size_mb_label(&self) -> String {
        format!("{:.2} MB", self.byte_size as f64 / 1024.0 / 1024.0)
    }
}

/// ファイル名の拡張子が画像か
pub fn has_image_extension(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| {
            let ext = ext.to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// リクエスト識別子（セッション内で単調増加）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 送信されたリクエスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub id: RequestId,
    pub selection: UploadSelection,
    pub image_class: ImageClass,
}

/// 解析結果
///
/// 健全度・信頼度は0-100に収まることを構築時に保証する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawAnalysisResult")]
pub struct AnalysisResult {
    health_score: u8,
    faults: Vec<String>,
    confidence: u8,
    recommendations: Vec<String>,
}

impl AnalysisResult {
    pub fn new(
        health_score: i64,
        faults: Vec<String>,
        confidence: i64,
        recommendations: Vec<String>,
    ) -> Result<Self> {
        Ok(Self {
            health_score: check_score("healthScore", health_score)?,
            faults,
            confidence: check_score("confidence", confidence)?,
            recommendations,
        })
    }

    pub fn health_score(&self) -> u8 {
        self.health_score
    }

    pub fn faults(&self) -> &[String] {
        &self.faults
    }

    pub fn confidence(&self) -> u8 {
        self.confidence
    }

    pub fn recommendations(&self) -> &[String] {
        &self.recommendations
    }
}

fn check_score(field: &str, value: i64) -> Result<u8> {
    if (0..=SCORE_MAX as i64).contains(&value) {
        Ok(value as u8)
    } else {
        Err(Error::InvalidResult(format!("{} out of range: {}", field, value)))
    }
}

/// デシリアライズ用の検証前データ
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnalysisResult {
    health_score: i64,
    #[serde(default)]
    faults: Vec<String>,
    confidence: i64,
    #[serde(default)]
    recommendations: Vec<String>,
}

impl TryFrom<RawAnalysisResult> for AnalysisResult {
    type Error = Error;

    fn try_from(raw: RawAnalysisResult) -> Result<Self> {
        AnalysisResult::new(raw.health_score, raw.faults, raw.confidence, raw.recommendations)
    }
}
