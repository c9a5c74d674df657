//! In-memory collaborators for unit and handler tests.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::attachments::{object_key, AttachmentError, AttachmentStore, NewUpload};
use crate::cv::document::{Attachment, CvDocument};
use crate::cv::progress::{ProgressError, ProgressStore};
use crate::cv::repository::{CvRepository, RepositoryError, StoredCv};
use crate::cv::step::WizardStep;
use crate::state::AppState;

#[derive(Default)]
pub struct MemoryCvRepository {
    rows: Mutex<HashMap<Uuid, StoredCv>>,
    fail_saves: bool,
}

impl MemoryCvRepository {
    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    pub fn get(&self, user_id: Uuid) -> Option<StoredCv> {
        self.rows.lock().unwrap().get(&user_id).cloned()
    }
}

#[async_trait]
impl CvRepository for MemoryCvRepository {
    async fn fetch(&self, user_id: Uuid) -> Result<Option<StoredCv>, RepositoryError> {
        Ok(self.get(user_id))
    }

    async fn save(
        &self,
        user_id: Uuid,
        document: &CvDocument,
        current_step: WizardStep,
    ) -> Result<(), RepositoryError> {
        if self.fail_saves {
            return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        }
        self.rows.lock().unwrap().insert(
            user_id,
            StoredCv {
                document: document.clone(),
                current_step,
                updated_at: Utc::now(),
            },
        );
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryProgressStore {
    sets: Mutex<HashMap<Uuid, BTreeSet<WizardStep>>>,
    fail_reads: bool,
    fail_writes: AtomicBool,
    /// Reads always see an empty set, like a save racing another one.
    stale_reads: bool,
}

impl MemoryProgressStore {
    pub fn failing() -> Self {
        Self {
            fail_reads: true,
            fail_writes: AtomicBool::new(true),
            ..Self::default()
        }
    }

    pub fn stale_reads() -> Self {
        Self {
            stale_reads: true,
            ..Self::default()
        }
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn reported(&self, user_id: Uuid) -> BTreeSet<WizardStep> {
        self.sets
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }
}

fn connection_refused() -> ProgressError {
    redis::RedisError::from((redis::ErrorKind::IoError, "connection refused")).into()
}

#[async_trait]
impl ProgressStore for MemoryProgressStore {
    async fn reported_steps(&self, user_id: Uuid) -> Result<BTreeSet<WizardStep>, ProgressError> {
        if self.fail_reads {
            return Err(connection_refused());
        }
        if self.stale_reads {
            return Ok(BTreeSet::new());
        }
        Ok(self.reported(user_id))
    }

    async fn record_completed(
        &self,
        user_id: Uuid,
        steps: &[WizardStep],
    ) -> Result<Vec<WizardStep>, ProgressError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(connection_refused());
        }
        let mut sets = self.sets.lock().unwrap();
        let set = sets.entry(user_id).or_default();
        Ok(steps.iter().copied().filter(|step| set.insert(*step)).collect())
    }
}

#[derive(Default)]
pub struct MemoryAttachmentStore {
    uploads: Mutex<Vec<NewUpload>>,
}

impl MemoryAttachmentStore {
    pub fn uploads(&self) -> Vec<NewUpload> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl AttachmentStore for MemoryAttachmentStore {
    async fn upload(&self, upload: NewUpload) -> Result<Attachment, AttachmentError> {
        let key = object_key(upload.user_id, upload.category, &upload.file_name);
        self.uploads.lock().unwrap().push(upload);
        Ok(Attachment {
            url: format!("https://files.test/{key}"),
            key,
        })
    }
}

pub struct TestContext {
    pub state: AppState,
    pub cvs: Arc<MemoryCvRepository>,
    pub progress: Arc<MemoryProgressStore>,
    pub attachments: Arc<MemoryAttachmentStore>,
}

pub fn test_context() -> TestContext {
    test_context_with(MemoryCvRepository::default())
}

pub fn test_context_with(cvs: MemoryCvRepository) -> TestContext {
    let cvs = Arc::new(cvs);
    let progress = Arc::new(MemoryProgressStore::default());
    let attachments = Arc::new(MemoryAttachmentStore::default());
    TestContext {
        state: AppState {
            cvs: cvs.clone(),
            progress: progress.clone(),
            attachments: attachments.clone(),
        },
        cvs,
        progress,
        attachments,
    }
}
