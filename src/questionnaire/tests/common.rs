use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use axum::response::Response;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{json, Value};

use crate::questionnaire::access_code::AccessCode;
use crate::questionnaire::catalog::DimensionId;
use crate::questionnaire::notify::{DeliveryError, Mailer, NotificationMessage};
use crate::questionnaire::responses::RawResponses;
use crate::questionnaire::scoring::ScoreSheet;
use crate::questionnaire::service::{QuestionnaireService, QuestionnaireSubmission};
use crate::questionnaire::storage::{ReportArtifacts, ReportStore, StoreError, StoredReport};

pub(super) fn answers_for_total(total: i64) -> Vec<Value> {
    let base = total / 10;
    let remainder = total % 10;
    (0..10)
        .map(|index| json!(if index < remainder { base + 1 } else { base }))
        .collect()
}

/// Responses whose dimension totals equal `totals`, in catalog order.
pub(super) fn raw_with_totals(totals: [i64; 8]) -> RawResponses {
    DimensionId::ordered()
        .into_iter()
        .zip(totals)
        .map(|(dimension, total)| (dimension.code().to_string(), answers_for_total(total)))
        .collect()
}

pub(super) fn raw_uniform(value: i64) -> RawResponses {
    raw_with_totals([value * 10; 8])
}

pub(super) fn sheet(totals: [i64; 8]) -> ScoreSheet {
    let totals: BTreeMap<_, _> = DimensionId::ordered().into_iter().zip(totals).collect();
    ScoreSheet::from_totals(&totals).expect("valid totals")
}

pub(super) fn submission(patient: &str, responses: RawResponses) -> QuestionnaireSubmission {
    QuestionnaireSubmission {
        patient: patient.to_string(),
        responses,
    }
}

pub(super) fn submitted_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 2)
        .and_then(|date| date.and_hms_opt(14, 5, 0))
        .expect("valid timestamp")
}

pub(super) fn build_service() -> (
    QuestionnaireService<MemoryStore, RecordingMailer>,
    Arc<MemoryStore>,
    Arc<RecordingMailer>,
) {
    let store = Arc::new(MemoryStore::default());
    let mailer = Arc::new(RecordingMailer::default());
    let service = QuestionnaireService::new(store.clone(), mailer.clone());
    (service, store, mailer)
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    reports: Arc<Mutex<HashMap<AccessCode, ReportArtifacts>>>,
}

impl MemoryStore {
    pub(super) fn codes(&self) -> Vec<AccessCode> {
        self.reports
            .lock()
            .expect("store mutex poisoned")
            .keys()
            .cloned()
            .collect()
    }

    pub(super) fn get(&self, code: &AccessCode) -> Option<ReportArtifacts> {
        self.reports
            .lock()
            .expect("store mutex poisoned")
            .get(code)
            .cloned()
    }

    pub(super) fn insert_raw(&self, code: &str, scores_csv: &str) {
        let code = AccessCode::parse(code).expect("valid code");
        self.reports.lock().expect("store mutex poisoned").insert(
            code.clone(),
            ReportArtifacts {
                code,
                markdown: String::new(),
                scores_csv: scores_csv.to_string(),
                radar_svg: String::new(),
            },
        );
    }
}

impl ReportStore for MemoryStore {
    fn save(&self, artifacts: &ReportArtifacts) -> Result<(), StoreError> {
        let mut guard = self.reports.lock().expect("store mutex poisoned");
        if guard.contains_key(&artifacts.code) {
            return Err(StoreError::Conflict);
        }
        guard.insert(artifacts.code.clone(), artifacts.clone());
        Ok(())
    }

    fn load(&self, code: &AccessCode) -> Result<Option<StoredReport>, StoreError> {
        let guard = self.reports.lock().expect("store mutex poisoned");
        Ok(guard.get(code).map(|artifacts| StoredReport {
            code: artifacts.code.clone(),
            markdown: Some(artifacts.markdown.clone()),
            scores_csv: artifacts.scores_csv.clone(),
            radar_svg: Some(artifacts.radar_svg.clone()),
        }))
    }
}

/// Reports a collision for the first `conflicts` saves, then stores normally.
pub(super) struct CollidingStore {
    conflicts: AtomicUsize,
    attempts: Mutex<Vec<AccessCode>>,
    inner: MemoryStore,
}

impl CollidingStore {
    pub(super) fn new(conflicts: usize) -> Self {
        Self {
            conflicts: AtomicUsize::new(conflicts),
            attempts: Mutex::new(Vec::new()),
            inner: MemoryStore::default(),
        }
    }

    pub(super) fn attempts(&self) -> Vec<AccessCode> {
        self.attempts.lock().expect("attempts mutex poisoned").clone()
    }

    pub(super) fn stored_codes(&self) -> Vec<AccessCode> {
        self.inner.codes()
    }
}

impl ReportStore for CollidingStore {
    fn save(&self, artifacts: &ReportArtifacts) -> Result<(), StoreError> {
        self.attempts
            .lock()
            .expect("attempts mutex poisoned")
            .push(artifacts.code.clone());

        let remaining = self.conflicts.load(Ordering::SeqCst);
        if remaining > 0 {
            self.conflicts.store(remaining - 1, Ordering::SeqCst);
            return Err(StoreError::Conflict);
        }
        self.inner.save(artifacts)
    }

    fn load(&self, code: &AccessCode) -> Result<Option<StoredReport>, StoreError> {
        self.inner.load(code)
    }
}

pub(super) struct UnavailableStore;

impl ReportStore for UnavailableStore {
    fn save(&self, _artifacts: &ReportArtifacts) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("volume offline".to_string()))
    }

    fn load(&self, _code: &AccessCode) -> Result<Option<StoredReport>, StoreError> {
        Err(StoreError::Unavailable("volume offline".to_string()))
    }
}

/// Every load waits for a release signal and fails if none arrives within a
/// second. Nothing is ever stored.
pub(super) struct GatedStore {
    release: Mutex<mpsc::Receiver<()>>,
}

impl GatedStore {
    pub(super) fn new() -> (Self, mpsc::Sender<()>) {
        let (sender, receiver) = mpsc::channel();
        (
            Self {
                release: Mutex::new(receiver),
            },
            sender,
        )
    }
}

impl ReportStore for GatedStore {
    fn save(&self, _artifacts: &ReportArtifacts) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("read-only".to_string()))
    }

    fn load(&self, _code: &AccessCode) -> Result<Option<StoredReport>, StoreError> {
        self.release
            .lock()
            .expect("gate mutex poisoned")
            .recv_timeout(Duration::from_secs(1))
            .map_err(|_| StoreError::Unavailable("gate never opened".to_string()))?;
        Ok(None)
    }
}

#[derive(Default, Clone)]
pub(super) struct RecordingMailer {
    sent: Arc<Mutex<Vec<NotificationMessage>>>,
}

impl RecordingMailer {
    pub(super) fn sent(&self) -> Vec<NotificationMessage> {
        self.sent.lock().expect("mailer mutex poisoned").clone()
    }
}

impl Mailer for RecordingMailer {
    fn send(&self, message: &NotificationMessage) -> Result<(), DeliveryError> {
        self.sent
            .lock()
            .expect("mailer mutex poisoned")
            .push(message.clone());
        Ok(())
    }
}

pub(super) struct FailingMailer;

impl Mailer for FailingMailer {
    fn send(&self, _message: &NotificationMessage) -> Result<(), DeliveryError> {
        Err(DeliveryError::Transport("connection refused".to_string()))
    }
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    serde_json::from_slice(&read_body(response).await).expect("json payload")
}
