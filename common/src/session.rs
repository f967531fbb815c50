//! アップロード解析セッション
//!
//! 画像選択・種類タグ・解析状態を1つの状態レコードで持つ。
//! 状態は `idle → pending → complete` と、バックエンド失敗時の `failed`。
//! 結果は `Complete` の中にしか存在しないので「解析中なのに結果がある」
//! という組み合わせは作れない。
//!
//! 非同期処理はここには無い。呼び出し側（CLIのコントローラ、Webの
//! spawn_local）が `submit` で得たリクエストをバックエンドに渡し、
//! 応答を `resolve` で戻す。

use crate::error::AnalysisError;
use crate::types::{AnalysisRequest, AnalysisResult, ImageClass, RequestId, UploadSelection};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 解析状態
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AnalysisPhase {
    #[default]
    Idle,
    Pending(AnalysisRequest),
    Complete {
        request: AnalysisRequest,
        result: AnalysisResult,
    },
    Failed {
        request: AnalysisRequest,
        error: AnalysisError,
    },
}

/// 状態の種別のみ（通知・表示用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseKind {
    Idle,
    Pending,
    Complete,
    Failed,
}

impl PhaseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseKind::Idle => "idle",
            PhaseKind::Pending => "pending",
            PhaseKind::Complete => "complete",
            PhaseKind::Failed => "failed",
        }
    }

    /// 解析が終わった状態か
    pub fn is_settled(&self) -> bool {
        !matches!(self, PhaseKind::Pending)
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AnalysisPhase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            AnalysisPhase::Idle => PhaseKind::Idle,
            AnalysisPhase::Pending(_) => PhaseKind::Pending,
            AnalysisPhase::Complete { .. } => PhaseKind::Complete,
            AnalysisPhase::Failed { .. } => PhaseKind::Failed,
        }
    }

    fn pending_id(&self) -> Option<RequestId> {
        match self {
            AnalysisPhase::Pending(request) => Some(request.id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UploadSession {
    selection: Option<UploadSelection>,
    image_class: Option<ImageClass>,
    phase: AnalysisPhase,
    last_id: u64,
}

impl UploadSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// 画像を選択（ピッカーとドロップの両方がここに来る）
    ///
    /// 前の選択は置き換えられ、置き換えられた選択を返す。
    pub fn select_file(&mut self, selection: UploadSelection) -> Option<UploadSelection> {
        self.selection.replace(selection)
    }

    pub fn select_image_class(&mut self, image_class: ImageClass) {
        self.image_class = Some(image_class);
    }

    pub fn selection(&self) -> Option<&UploadSelection> {
        self.selection.as_ref()
    }

    pub fn image_class(&self) -> Option<ImageClass> {
        self.image_class
    }

    pub fn phase(&self) -> &AnalysisPhase {
        &self.phase
    }

    pub fn kind(&self) -> PhaseKind {
        self.phase.kind()
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase, AnalysisPhase::Pending(_))
    }

    /// 画像あり・タグあり・解析中でない
    pub fn can_submit(&self) -> bool {
        self.selection.is_some() && self.image_class.is_some() && !self.is_pending()
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.phase {
            AnalysisPhase::Complete { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&AnalysisError> {
        match &self.phase {
            AnalysisPhase::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    /// 解析を開始
    ///
    /// 送信できない場合は状態を変えずにエラーを返す。
    /// 開始すると前回の結果・失敗は破棄される。
    pub fn submit(&mut self) -> Result<AnalysisRequest, AnalysisError> {
        if self.is_pending() {
            return Err(AnalysisError::AlreadyPending);
        }
        let selection = self.selection.clone().ok_or(AnalysisError::NoFileSelected)?;
        let image_class = self.image_class.ok_or(AnalysisError::NoTagSelected)?;

        Ok(self.start(selection, image_class))
    }

    /// 失敗したリクエストを同じ画像・タグで再送
    pub fn retry(&mut self) -> Result<AnalysisRequest, AnalysisError> {
        match &self.phase {
            AnalysisPhase::Failed { request, .. } => {
                let selection = request.selection.clone();
                let image_class = request.image_class;
                Ok(self.start(selection, image_class))
            }
            AnalysisPhase::Pending(_) => Err(AnalysisError::AlreadyPending),
            _ => Err(AnalysisError::NothingToRetry),
        }
    }

    fn start(&mut self, selection: UploadSelection, image_class: ImageClass) -> AnalysisRequest {
        self.last_id += 1;
        let request = AnalysisRequest {
            id: RequestId(self.last_id),
            selection,
            image_class,
        };
        self.phase = AnalysisPhase::Pending(request.clone());
        request
    }

    /// バックエンドの応答を反映
    ///
    /// 解析中のリクエストと一致しない応答（キャンセル後に届いたもの等）は
    /// 無視して `false` を返す。
    pub fn resolve(&mut self, id: RequestId, outcome: Result<AnalysisResult, AnalysisError>) -> bool {
        if self.phase.pending_id() != Some(id) {
            return false;
        }

        let AnalysisPhase::Pending(request) = std::mem::take(&mut self.phase) else {
            return false;
        };
        self.phase = match outcome {
            Ok(result) => AnalysisPhase::Complete { request, result },
            Err(error) => AnalysisPhase::Failed { request, error },
        };
        true
    }

    pub fn complete(&mut self, id: RequestId, result: AnalysisResult) -> bool {
        self.resolve(id, Ok(result))
    }

    pub fn fail(&mut self, id: RequestId, error: AnalysisError) -> bool {
        self.resolve(id, Err(error))
    }

    /// 解析中のリクエストを取り消して `idle` に戻す
    pub fn cancel(&mut self) -> Option<RequestId> {
        let id = self.phase.pending_id()?;
        self.phase = AnalysisPhase::Idle;
        Some(id)
    }

    /// 結果・失敗を閉じて `idle` に戻す（解析中は何もしない）
    pub fn dismiss(&mut self) -> bool {
        match self.phase {
            AnalysisPhase::Complete { .. } | AnalysisPhase::Failed { .. } => {
                self.phase = AnalysisPhase::Idle;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::sample_result;

    fn panel_jpg() -> UploadSelection {
        UploadSelection::new("panel1.jpg", vec![0u8; 2 * 1024 * 1024]).unwrap()
    }

    fn ready_session() -> UploadSession {
        let mut session = UploadSession::new();
        session.select_file(panel_jpg());
        session.select_image_class(ImageClass::Rgb);
        session
    }

    #[test]
    fn test_can_submit_requires_file_and_tag() {
        let mut session = UploadSession::new();
        assert!(!session.can_submit());

        session.select_file(panel_jpg());
        assert!(!session.can_submit());

        session.select_image_class(ImageClass::Thermal);
        assert!(session.can_submit());

        session.submit().unwrap();
        assert!(!session.can_submit());
    }

    #[test]
    fn test_submit_without_file_is_noop() {
        let mut session = UploadSession::new();
        session.select_image_class(ImageClass::Rgb);

        assert_eq!(session.submit().unwrap_err(), AnalysisError::NoFileSelected);
        assert_eq!(session.kind(), PhaseKind::Idle);
    }

    #[test]
    fn test_submit_without_tag_is_noop() {
        let mut session = UploadSession::new();
        session.select_file(panel_jpg());

        assert_eq!(session.submit().unwrap_err(), AnalysisError::NoTagSelected);
        assert_eq!(session.kind(), PhaseKind::Idle);
    }

    #[test]
    fn test_select_file_replaces() {
        let mut session = UploadSession::new();
        assert!(session.select_file(panel_jpg()).is_none());

        let second = UploadSelection::new("panel2.png", vec![1, 2, 3]).unwrap();
        let replaced = session.select_file(second).unwrap();

        assert_eq!(replaced.file_name, "panel1.jpg");
        assert_eq!(session.selection().unwrap().file_name, "panel2.png");
    }

    #[test]
    fn test_second_submit_rejected_while_pending() {
        let mut session = ready_session();
        let first = session.submit().unwrap();

        assert_eq!(session.submit().unwrap_err(), AnalysisError::AlreadyPending);
        assert!(matches!(session.phase(), AnalysisPhase::Pending(r) if r.id == first.id));
    }

    #[test]
    fn test_complete_produces_single_result() {
        let mut session = ready_session();
        let request = session.submit().unwrap();
        assert!(session.result().is_none());

        assert!(session.complete(request.id, sample_result(75)));
        assert_eq!(session.kind(), PhaseKind::Complete);
        assert_eq!(session.result().unwrap().health_score(), 75);

        // 同じリクエストへの2回目の応答は無視
        assert!(!session.complete(request.id, sample_result(90)));
        assert_eq!(session.result().unwrap().health_score(), 75);
    }

    #[test]
    fn test_new_submit_clears_previous_result() {
        let mut session = ready_session();
        let first = session.submit().unwrap();
        session.complete(first.id, sample_result(88));

        let second = session.submit().unwrap();
        assert!(second.id > first.id);
        assert!(session.result().is_none());
        assert!(session.is_pending());
    }

    #[test]
    fn test_cancel_ignores_late_completion() {
        let mut session = ready_session();
        let request = session.submit().unwrap();

        assert_eq!(session.cancel(), Some(request.id));
        assert_eq!(session.kind(), PhaseKind::Idle);
        assert!(!session.complete(request.id, sample_result(70)));
        assert!(session.result().is_none());
        assert_eq!(session.cancel(), None);
    }

    #[test]
    fn test_failure_then_retry() {
        let mut session = ready_session();
        let request = session.submit().unwrap();
        session.fail(request.id, AnalysisError::BackendUnavailable("connection refused".into()));

        assert_eq!(session.kind(), PhaseKind::Failed);
        assert!(session.failure().unwrap().is_retryable());
        assert!(session.can_submit());

        let retried = session.retry().unwrap();
        assert_ne!(retried.id, request.id);
        assert_eq!(retried.selection.file_name, "panel1.jpg");
        assert_eq!(retried.image_class, ImageClass::Rgb);

        session.complete(retried.id, sample_result(66));
        assert_eq!(session.kind(), PhaseKind::Complete);
    }

    #[test]
    fn test_retry_uses_failed_request_not_current_selection() {
        let mut session = ready_session();
        let request = session.submit().unwrap();
        session.fail(request.id, AnalysisError::BackendRejected("bad payload".into()));

        session.select_file(UploadSelection::new("other.png", vec![9]).unwrap());
        let retried = session.retry().unwrap();
        assert_eq!(retried.selection.file_name, "panel1.jpg");
    }

    #[test]
    fn test_retry_without_failure() {
        let mut session = ready_session();
        assert_eq!(session.retry().unwrap_err(), AnalysisError::NothingToRetry);

        session.submit().unwrap();
        assert_eq!(session.retry().unwrap_err(), AnalysisError::AlreadyPending);
    }

    #[test]
    fn test_dismiss() {
        let mut session = ready_session();
        let request = session.submit().unwrap();
        assert!(!session.dismiss());

        session.complete(request.id, sample_result(92));
        assert!(session.dismiss());
        assert_eq!(session.kind(), PhaseKind::Idle);
        assert!(session.result().is_none());
        // 選択は残る
        assert!(session.can_submit());
    }
}
