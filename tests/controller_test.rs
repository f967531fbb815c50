//! 解析コントローラの統合テスト
//!
//! 時間を止めたtokioランタイムで、送信・完了・失敗・キャンセル・再試行の流れを検証

use async_trait::async_trait;
use solar_diag::analyzer::{AnalysisBackend, AnalysisController, MockBackend};
use solar_diag_common::{
    sample_result, AnalysisError, AnalysisRequest, AnalysisResult, ImageClass, PhaseKind,
    RequestId, UploadSelection,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Outcome = Result<AnalysisResult, AnalysisError>;

/// 呼ばれるたびに台本の (待ち時間, 結果) を順に返す
struct ScriptedBackend {
    calls: AtomicUsize,
    seen: Mutex<Vec<AnalysisRequest>>,
    script: Mutex<VecDeque<(Duration, Outcome)>>,
}

impl ScriptedBackend {
    fn new(script: Vec<(Duration, Outcome)>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
            script: Mutex::new(script.into()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalysisBackend for ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn analyze(&self, request: &AnalysisRequest) -> Outcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(request.clone());
        let step = self.script.lock().unwrap().pop_front();
        let (delay, outcome) = step.unwrap_or((
            Duration::ZERO,
            Err(AnalysisError::BackendRejected("script exhausted".into())),
        ));
        tokio::time::sleep(delay).await;
        outcome
    }
}

fn panel1_jpg() -> UploadSelection {
    UploadSelection::new("panel1.jpg", vec![0u8; 2 * 1024 * 1024]).unwrap()
}

fn controller_with(backend: Arc<dyn AnalysisBackend>) -> AnalysisController {
    AnalysisController::new(backend, Duration::from_secs(30))
}

/// panel1.jpg + thermal → 3秒後に完了
#[tokio::test(start_paused = true)]
async fn test_thermal_panel_completes_after_delay() {
    let controller = controller_with(Arc::new(MockBackend::new(Duration::from_secs(3)).with_score(85)));
    controller.select_file(panel1_jpg());
    controller.select_image_class(ImageClass::Thermal);
    assert!(controller.can_submit());

    let started = tokio::time::Instant::now();
    let id = controller.submit().unwrap();
    assert_eq!(id, RequestId(1));
    assert_eq!(controller.kind(), PhaseKind::Pending);
    assert!(!controller.can_submit());

    assert_eq!(controller.wait().await, PhaseKind::Complete);
    assert!(started.elapsed() >= Duration::from_secs(3));

    let result = controller.outcome().unwrap().unwrap();
    assert_eq!(result.health_score(), 85);
    assert_eq!(result.confidence(), 92);
    assert_eq!(result.faults(), ["Dust buildup", "Minor hotspot"]);

    // 選択は解析後も残る
    let session = controller.snapshot();
    assert_eq!(session.selection().unwrap().file_name, "panel1.jpg");
    assert_eq!(session.image_class(), Some(ImageClass::Thermal));
    assert!(controller.can_submit());
}

/// 解析中の再送信は拒否され、バックエンド呼び出しは1回だけ
#[tokio::test(start_paused = true)]
async fn test_rapid_double_submit_calls_backend_once() {
    let backend = ScriptedBackend::new(vec![(Duration::from_secs(3), Ok(sample_result(70)))]);
    let controller = controller_with(backend.clone());
    controller.select_file(panel1_jpg());
    controller.select_image_class(ImageClass::Rgb);

    assert!(controller.submit().is_ok());
    assert_eq!(controller.submit(), Err(AnalysisError::AlreadyPending));

    assert_eq!(controller.wait().await, PhaseKind::Complete);
    assert_eq!(backend.calls(), 1);
}

/// 複数タスクから同時に送信しても開始できるのは1件
#[tokio::test(start_paused = true)]
async fn test_concurrent_submits_admit_one() {
    let backend = ScriptedBackend::new(vec![(Duration::from_secs(1), Ok(sample_result(90)))]);
    let controller = Arc::new(controller_with(backend.clone()));
    controller.select_file(panel1_jpg());
    controller.select_image_class(ImageClass::Drone);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.submit() })
        })
        .collect();

    let mut accepted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(e) => assert_eq!(e, AnalysisError::AlreadyPending),
        }
    }
    assert_eq!(accepted, 1);

    controller.wait().await;
    assert_eq!(backend.calls(), 1);
}

/// 画像未選択・種別未選択では何も起きない
#[tokio::test(start_paused = true)]
async fn test_submit_without_inputs_is_noop() {
    let backend = ScriptedBackend::new(vec![]);
    let controller = controller_with(backend.clone());

    assert_eq!(controller.submit(), Err(AnalysisError::NoFileSelected));
    assert_eq!(controller.kind(), PhaseKind::Idle);

    controller.select_file(panel1_jpg());
    assert_eq!(controller.submit(), Err(AnalysisError::NoTagSelected));
    assert_eq!(controller.kind(), PhaseKind::Idle);

    tokio::task::yield_now().await;
    assert_eq!(backend.calls(), 0);
    assert!(controller.outcome().is_none());
}

/// キャンセル後は遅れて届く応答で状態が変わらない
#[tokio::test(start_paused = true)]
async fn test_cancel_ignores_late_completion() {
    let backend = ScriptedBackend::new(vec![(Duration::from_secs(3), Ok(sample_result(77)))]);
    let controller = controller_with(backend.clone());
    controller.select_file(panel1_jpg());
    controller.select_image_class(ImageClass::Thermal);

    let id = controller.submit().unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(controller.cancel(), Some(id));
    assert_eq!(controller.kind(), PhaseKind::Idle);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(controller.kind(), PhaseKind::Idle);
    assert!(controller.outcome().is_none());

    // 取り消すものが無ければ None
    assert_eq!(controller.cancel(), None);
}

/// タイムアウトは失敗扱いになり、再試行で同じ画像・種別を再送する
#[tokio::test(start_paused = true)]
async fn test_timeout_then_retry_completes() {
    let backend = ScriptedBackend::new(vec![
        (Duration::from_secs(120), Ok(sample_result(50))),
        (Duration::from_secs(2), Ok(sample_result(88))),
    ]);
    let controller = AnalysisController::new(backend.clone(), Duration::from_secs(10));
    controller.select_file(panel1_jpg());
    controller.select_image_class(ImageClass::Thermal);

    controller.submit().unwrap();
    assert_eq!(controller.wait().await, PhaseKind::Failed);
    match controller.outcome() {
        Some(Err(AnalysisError::BackendUnavailable(_))) => {}
        other => panic!("timeout failure expected, got {:?}", other),
    }

    let retry_id = controller.retry().unwrap();
    assert_eq!(retry_id, RequestId(2));
    assert_eq!(controller.wait().await, PhaseKind::Complete);
    assert_eq!(controller.outcome().unwrap().unwrap().health_score(), 88);

    let seen = backend.seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].selection.file_name, seen[1].selection.file_name);
    assert_eq!(seen[1].image_class, ImageClass::Thermal);
}

/// 拒否エラーは失敗状態になるが再試行対象ではない
#[tokio::test(start_paused = true)]
async fn test_rejected_request_fails() {
    let backend = ScriptedBackend::new(vec![(
        Duration::ZERO,
        Err(AnalysisError::BackendRejected("HTTP 400".into())),
    )]);
    let controller = controller_with(backend);
    controller.select_file(panel1_jpg());
    controller.select_image_class(ImageClass::Rgb);

    controller.submit().unwrap();
    assert_eq!(controller.wait().await, PhaseKind::Failed);

    let error = controller.outcome().unwrap().unwrap_err();
    assert!(!error.is_retryable());
    // 失敗後も新しい送信はできる
    assert!(controller.can_submit());
}

/// 完了していなければ再試行できない
#[tokio::test(start_paused = true)]
async fn test_retry_requires_failure() {
    let controller = controller_with(Arc::new(MockBackend::new(Duration::from_secs(3))));
    assert_eq!(controller.retry(), Err(AnalysisError::NothingToRetry));

    controller.select_file(panel1_jpg());
    controller.select_image_class(ImageClass::Rgb);
    controller.submit().unwrap();
    assert_eq!(controller.retry(), Err(AnalysisError::AlreadyPending));

    controller.wait().await;
    assert_eq!(controller.retry(), Err(AnalysisError::NothingToRetry));
}

/// 購読者は解析中→完了の順で通知を受ける
#[tokio::test(start_paused = true)]
async fn test_subscribers_observe_transitions() {
    let controller = controller_with(Arc::new(MockBackend::new(Duration::from_secs(3)).with_score(61)));
    let mut rx = controller.subscribe();
    assert_eq!(*rx.borrow_and_update(), PhaseKind::Idle);

    controller.select_file(panel1_jpg());
    controller.select_image_class(ImageClass::Drone);
    controller.submit().unwrap();

    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow_and_update(), PhaseKind::Pending);

    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow_and_update(), PhaseKind::Complete);
}

/// 完了後の再送信は新しいリクエストIDで結果を置き換える
#[tokio::test(start_paused = true)]
async fn test_resubmit_replaces_previous_result() {
    let backend = ScriptedBackend::new(vec![
        (Duration::from_secs(1), Ok(sample_result(95))),
        (Duration::from_secs(1), Ok(sample_result(62))),
    ]);
    let controller = controller_with(backend);
    controller.select_file(panel1_jpg());
    controller.select_image_class(ImageClass::Rgb);

    assert_eq!(controller.submit().unwrap(), RequestId(1));
    controller.wait().await;
    assert_eq!(controller.outcome().unwrap().unwrap().health_score(), 95);

    controller.select_file(UploadSelection::new("panel2.png", vec![1u8; 512]).unwrap());
    assert_eq!(controller.submit().unwrap(), RequestId(2));
    // 解析中は前回の結果を見せない
    assert!(controller.outcome().is_none());

    controller.wait().await;
    assert_eq!(controller.outcome().unwrap().unwrap().health_score(), 62);
}

/// 応答しないバックエンド。呼び出しの開始数と中断（drop）数を数える
#[derive(Default)]
struct HangingBackend {
    started: Arc<AtomicUsize>,
    dropped: Arc<AtomicUsize>,
}

struct DropCounter(Arc<AtomicUsize>);

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl AnalysisBackend for HangingBackend {
    fn name(&self) -> &'static str {
        "hanging"
    }

    async fn analyze(&self, _request: &AnalysisRequest) -> Outcome {
        self.started.fetch_add(1, Ordering::SeqCst);
        let _guard = DropCounter(Arc::clone(&self.dropped));
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Err(AnalysisError::BackendUnavailable("unreachable".into()))
    }
}

/// 別スレッドから送信とキャンセルが交錯しても、キャンセルで止まらない呼び出しは残らない
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_cross_thread_cancel_aborts_every_backend_call() {
    let backend = Arc::new(HangingBackend::default());
    let started = Arc::clone(&backend.started);
    let dropped = Arc::clone(&backend.dropped);
    let controller = Arc::new(AnalysisController::new(backend, Duration::from_secs(600)));
    controller.select_file(panel1_jpg());
    controller.select_image_class(ImageClass::Thermal);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move {
                for _ in 0..50 {
                    let _ = controller.submit();
                    tokio::task::yield_now().await;
                    let _ = controller.cancel();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }
    controller.cancel();

    let id = controller.submit().unwrap();
    assert_eq!(controller.inflight_request(), Some(id));
    assert_eq!(controller.cancel(), Some(id));
    assert_eq!(controller.inflight_request(), None);

    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while dropped.load(Ordering::SeqCst) < started.load(Ordering::SeqCst)
        && tokio::time::Instant::now() < deadline
    {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(dropped.load(Ordering::SeqCst), started.load(Ordering::SeqCst));
    assert_eq!(controller.kind(), PhaseKind::Idle);
}
