//! 解析セッションの非同期ドライバ
//!
//! UploadSession をミューテックスで包み、送信ごとにバックエンド呼び出しを
//! 1タスクだけ起動する。状態の変化は watch チャネルで通知する。

use super::AnalysisBackend;
use solar_diag_common::{
    AnalysisError, AnalysisRequest, AnalysisResult, ImageClass, PhaseKind, RequestId, UploadSelection,
    UploadSession,
};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub struct AnalysisController {
    session: Arc<Mutex<UploadSession>>,
    backend: Arc<dyn AnalysisBackend>,
    timeout: Duration,
    phase_tx: Arc<watch::Sender<PhaseKind>>,
    /// 実行中タスクとそのリクエストID（セッションのロック中にだけ差し替える）
    inflight: Mutex<Option<(RequestId, JoinHandle<()>)>>,
}

/// ロック中にパニックしても状態自体は壊れないので中身を使い続ける
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl AnalysisController {
    pub fn new(backend: Arc<dyn AnalysisBackend>, timeout: Duration) -> Self {
        let (phase_tx, _) = watch::channel(PhaseKind::Idle);
        Self {
            session: Arc::new(Mutex::new(UploadSession::new())),
            backend,
            timeout,
            phase_tx: Arc::new(phase_tx),
            inflight: Mutex::new(None),
        }
    }

    pub fn select_file(&self, selection: UploadSelection) -> Option<UploadSelection> {
        lock(&self.session).select_file(selection)
    }

    pub fn select_image_class(&self, image_class: ImageClass) {
        lock(&self.session).select_image_class(image_class);
    }

    pub fn can_submit(&self) -> bool {
        lock(&self.session).can_submit()
    }

    pub fn kind(&self) -> PhaseKind {
        lock(&self.session).kind()
    }

    /// 現在のセッションの複製
    pub fn snapshot(&self) -> UploadSession {
        lock(&self.session).clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PhaseKind> {
        self.phase_tx.subscribe()
    }

    /// 解析を開始（tokioランタイム内で呼ぶこと）
    pub fn submit(&self) -> Result<RequestId, AnalysisError> {
        let mut session = lock(&self.session);
        let request = session.submit()?;
        self.phase_tx.send_replace(session.kind());
        Ok(self.dispatch(request))
    }

    /// 失敗したリクエストを再送
    pub fn retry(&self) -> Result<RequestId, AnalysisError> {
        let mut session = lock(&self.session);
        let request = session.retry()?;
        self.phase_tx.send_replace(session.kind());
        Ok(self.dispatch(request))
    }

    /// 解析中のリクエストを取り消し、バックエンド呼び出しを中断する
    pub fn cancel(&self) -> Option<RequestId> {
        let cancelled = {
            let mut session = lock(&self.session);
            let cancelled = session.cancel()?;
            self.phase_tx.send_replace(session.kind());
            if let Some((_, handle)) = lock(&self.inflight).take() {
                handle.abort();
            }
            cancelled
        };
        tracing::info!(request = %cancelled, "解析をキャンセルしました");
        Some(cancelled)
    }

    /// 解析中でなくなるまで待ち、その時点の状態種別を返す
    pub async fn wait(&self) -> PhaseKind {
        let mut rx = self.phase_tx.subscribe();
        let kind = match rx.wait_for(|kind| kind.is_settled()).await {
            Ok(kind) => *kind,
            Err(_) => self.kind(),
        };
        kind
    }

    /// 完了・失敗していればその結果
    pub fn outcome(&self) -> Option<Result<AnalysisResult, AnalysisError>> {
        let session = lock(&self.session);
        if let Some(result) = session.result() {
            return Some(Ok(result.clone()));
        }
        session.failure().map(|error| Err(error.clone()))
    }

    /// 実行中のバックエンド呼び出しのリクエストID
    pub fn inflight_request(&self) -> Option<RequestId> {
        lock(&self.inflight)
            .as_ref()
            .filter(|(_, handle)| !handle.is_finished())
            .map(|(id, _)| *id)
    }

    /// セッションのロックを持ったまま呼ぶこと
    fn dispatch(&self, request: AnalysisRequest) -> RequestId {
        let id = request.id;
        tracing::info!(
            request = %id,
            backend = self.backend.name(),
            file = %request.selection.file_name,
            class = %request.image_class,
            "解析開始"
        );

        let session = Arc::clone(&self.session);
        let backend = Arc::clone(&self.backend);
        let phase_tx = Arc::clone(&self.phase_tx);
        let timeout = self.timeout;

        let handle = tokio::spawn(async move {
            let outcome = match tokio::time::timeout(timeout, backend.analyze(&request)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(AnalysisError::BackendUnavailable(format!(
                    "no response within {}s",
                    timeout.as_secs()
                ))),
            };

            if let Err(error) = &outcome {
                tracing::warn!(request = %id, %error, "解析失敗");
            }

            // 状態変更と通知は同じロックの中で行い、通知順を状態遷移の順に揃える
            let mut session = lock(&session);
            if session.resolve(id, outcome) {
                phase_tx.send_replace(session.kind());
            } else {
                tracing::debug!(request = %id, "取り消し済みリクエストの応答を破棄");
            }
        });

        // 前回のタスクは解決済みなのでハンドルは捨ててよい
        *lock(&self.inflight) = Some((id, handle));
        id
    }
}

impl Drop for AnalysisController {
    fn drop(&mut self) {
        if let Some((_, handle)) = lock(&self.inflight).take() {
            handle.abort();
        }
    }
}
