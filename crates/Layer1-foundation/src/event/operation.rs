//! Operation - 진행 상황을 보고하는 장기 실행 작업
//!
//! 호출자가 publish 전에 관찰자를 붙이고, 처리 구독자는 같은 publish 안에서
//! `progress`를 0회 이상 호출한 뒤 `complete` 또는 `fail` 중 하나를 호출합니다.
//!
//! - 종료 신호(완료/실패)는 전체에서 한 번만 유효합니다. 먼저 온 쪽이 이깁니다.
//! - 종료 이후의 `progress`/`complete`/`fail`은 no-op (false 반환).
//! - 관찰자는 신호가 발생한 순서 그대로 호출됩니다.
//!
//! ```text
//! caller                 EventBus                 handler
//!   │ Operation::new(p)     │                        │
//!   │  .on_progress(..)     │                        │
//!   │  .on_completed(..)    │                        │
//!   │── publish(op) ───────▶│── handle(op) ─────────▶│
//!   │◀──────────── progress("Reading", 5) ───────────│
//!   │◀──────────── progress("Done", 100) ────────────│
//!   │◀──────────── complete() ───────────────────────│
//!   │◀── Ok(report) ────────│                        │
//! ```

use super::types::Event;
use parking_lot::{Mutex, ReentrantMutex};
use tokio::sync::mpsc;
use tracing::trace;

// ============================================================================
// Signals
// ============================================================================

/// 진행 상황 한 틱
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub message: String,
    /// 0..=100
    pub percent: Option<u8>,
}

impl Progress {
    pub fn new(message: impl Into<String>, percent: impl Into<Option<u8>>) -> Self {
        Self {
            message: message.into(),
            percent: percent.into().map(|p| p.min(100)),
        }
    }
}

/// 종료 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutcome {
    Completed,
    Failed(String),
}

impl OperationOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// 관찰된 신호 (OperationTracker가 순서대로 기록)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationSignal {
    Progress(Progress),
    Completed,
    Failed(String),
}

type ProgressObserver = Box<dyn Fn(&Progress) + Send + Sync>;
type CompletedObserver = Box<dyn Fn() + Send + Sync>;
type FailedObserver = Box<dyn Fn(&str) + Send + Sync>;

#[derive(Default)]
struct Observers {
    progress: Vec<ProgressObserver>,
    completed: Vec<CompletedObserver>,
    failed: Vec<FailedObserver>,
}

#[derive(Default)]
struct OperationState {
    outcome: Option<OperationOutcome>,
    progress_count: usize,
}

// ============================================================================
// Operation
// ============================================================================

/// Operation 봉투 - 불변 payload + 진행/종료 신호
pub struct Operation<P> {
    payload: P,
    observers: Observers,
    state: Mutex<OperationState>,
    /// 관찰자 호출 직렬화. 관찰자 안에서 같은 Operation을 다시 호출할 수 있도록 재진입 허용
    signal: ReentrantMutex<()>,
}

impl<P: Send + Sync + 'static> Operation<P> {
    pub fn new(payload: P) -> Self {
        Self {
            payload,
            observers: Observers::default(),
            state: Mutex::new(OperationState::default()),
            signal: ReentrantMutex::new(()),
        }
    }

    /// 모든 신호를 채널로 기록하는 Operation 생성
    pub fn tracked(payload: P) -> (Self, OperationTracker) {
        let (tx, rx) = mpsc::unbounded_channel();
        let progress_tx = tx.clone();
        let completed_tx = tx.clone();
        let failed_tx = tx;

        let operation = Self::new(payload)
            .on_progress(move |p| {
                let _ = progress_tx.send(OperationSignal::Progress(p.clone()));
            })
            .on_completed(move || {
                let _ = completed_tx.send(OperationSignal::Completed);
            })
            .on_failed(move |reason| {
                let _ = failed_tx.send(OperationSignal::Failed(reason.to_string()));
            });

        (operation, OperationTracker { receiver: rx })
    }

    // ========================================================================
    // 관찰자 등록 (publish 전)
    // ========================================================================

    pub fn on_progress(mut self, observer: impl Fn(&Progress) + Send + Sync + 'static) -> Self {
        self.observers.progress.push(Box::new(observer));
        self
    }

    pub fn on_completed(mut self, observer: impl Fn() + Send + Sync + 'static) -> Self {
        self.observers.completed.push(Box::new(observer));
        self
    }

    pub fn on_failed(mut self, observer: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.observers.failed.push(Box::new(observer));
        self
    }
}

impl<P> Operation<P> {
    /// payload
    pub fn payload(&self) -> &P {
        &self.payload
    }

    // ========================================================================
    // 처리 구독자용 신호
    // ========================================================================

    /// 진행 상황 보고. 종료 후에는 무시되고 false
    pub fn progress(&self, message: impl Into<String>, percent: impl Into<Option<u8>>) -> bool {
        let progress = Progress::new(message, percent);

        // state 잠금은 기록까지만, 관찰자는 signal 잠금 아래에서 호출
        let _signal = self.signal.lock();
        {
            let mut state = self.state.lock();
            if state.outcome.is_some() {
                trace!(message = %progress.message, "Progress after terminal outcome ignored");
                return false;
            }
            state.progress_count += 1;
        }

        for observer in &self.observers.progress {
            observer(&progress);
        }
        true
    }

    /// 성공 완료. 첫 종료 신호일 때만 true
    pub fn complete(&self) -> bool {
        let _signal = self.signal.lock();
        if !self.finish(OperationOutcome::Completed) {
            return false;
        }

        for observer in &self.observers.completed {
            observer();
        }
        true
    }

    /// 실패 표시. 첫 종료 신호일 때만 true
    pub fn fail(&self, reason: impl Into<String>) -> bool {
        let reason = reason.into();
        let _signal = self.signal.lock();
        if !self.finish(OperationOutcome::Failed(reason.clone())) {
            return false;
        }

        for observer in &self.observers.failed {
            observer(&reason);
        }
        true
    }

    /// 종료 결과 기록. 이미 종료됐으면 false
    fn finish(&self, outcome: OperationOutcome) -> bool {
        let mut state = self.state.lock();
        if state.outcome.is_some() {
            return false;
        }
        state.outcome = Some(outcome);
        true
    }

    // ========================================================================
    // 상태 조회
    // ========================================================================

    pub fn outcome(&self) -> Option<OperationOutcome> {
        self.state.lock().outcome.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.state.lock().outcome.is_some()
    }

    /// 관찰자에게 전달된 progress 수
    pub fn progress_count(&self) -> usize {
        self.state.lock().progress_count
    }
}

impl<P: Send + Sync + 'static> Event for Operation<P> {}

// ============================================================================
// OperationTracker
// ============================================================================

/// `Operation::tracked`가 돌려주는 신호 수신기
pub struct OperationTracker {
    receiver: mpsc::UnboundedReceiver<OperationSignal>,
}

impl OperationTracker {
    /// 다음 신호 (Operation이 drop되고 남은 신호가 없으면 None)
    pub async fn next(&mut self) -> Option<OperationSignal> {
        self.receiver.recv().await
    }

    /// 지금까지 도착한 신호 전부
    pub fn drain(&mut self) -> Vec<OperationSignal> {
        let mut signals = Vec::new();
        while let Ok(signal) = self.receiver.try_recv() {
            signals.push(signal);
        }
        signals
    }

    /// 종료 신호까지 대기. 종료 없이 Operation이 사라지면 None
    pub async fn wait_outcome(&mut self) -> Option<OperationOutcome> {
        while let Some(signal) = self.receiver.recv().await {
            match signal {
                OperationSignal::Progress(_) => continue,
                OperationSignal::Completed => return Some(OperationOutcome::Completed),
                OperationSignal::Failed(reason) => return Some(OperationOutcome::Failed(reason)),
            }
        }
        None
    }
}
