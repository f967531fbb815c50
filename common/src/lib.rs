//! Solar Diagnostics Common Library
//!
//! CLIとWeb(WASM)で共有される型・解析セッション・サンプルデータ

pub mod types;
pub mod error;
pub mod health;
pub mod session;
pub mod parser;
pub mod payload;
pub mod analyzer;
pub mod fleet;
pub mod alerts;
pub mod export;

pub use types::{AnalysisRequest, AnalysisResult, ImageClass, RequestId, UploadSelection};
pub use error::{AnalysisError, Error, Result};
pub use health::HealthBand;
pub use session::{AnalysisPhase, PhaseKind, UploadSession};
pub use parser::{extract_json, parse_analysis_response};
pub use payload::AnalyzePayload;
pub use analyzer::{mock_score_from_unit, sample_result};
pub use fleet::{FleetSummary, PanelFilter, PanelRecord, PanelStatus, UrgencyFilter};
pub use alerts::{Alert, AlertBoard, AlertStatus, AlertSummary};
pub use export::ReportEntry;
