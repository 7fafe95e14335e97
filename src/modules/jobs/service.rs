use tracing::{error, info};
use uuid::Uuid;

use super::dto::{FileDownload, StatusResponse, UploadedFile};
use super::error::JobError;
use super::events::JobMessage;
use super::model::{Job, JobStatus};
use super::validation::{validate_audio, validate_media, FileKind};
use crate::infrastructure::storage::StorageError;
use crate::state::AppState;

/// Fixed output key convention shared with the processing worker.
pub const OUTPUT_FILENAME: &str = "output.mp4";

pub fn output_key(uuid: Uuid) -> String {
    format!("{uuid}/{OUTPUT_FILENAME}")
}

pub struct JobService;

impl JobService {
    /// Runs the submission pipeline: validates both filenames, uploads both
    /// files, registers the job, then publishes the queue message.
    /// Short-circuits on the first failure; earlier steps are never rolled
    /// back, so a late failure can leave orphaned blobs or a stuck-pending
    /// job behind.
    pub async fn submit(
        state: AppState,
        media: UploadedFile,
        audio: UploadedFile,
    ) -> Result<Uuid, JobError> {
        validate_media(&media.filename)?;
        validate_audio(&audio.filename)?;

        let uuid = Uuid::new_v4();
        let media_key = format!("{}/{}", uuid, media.filename);
        let audio_key = format!("{}/{}", uuid, audio.filename);

        info!(%uuid, media = %media.filename, audio = %audio.filename, "submitting job");

        state
            .storage
            .put(&media_key, &media.content_type, media.data)
            .await
            .map_err(|source| {
                error!(%uuid, %source, "failed to upload media");
                JobError::StorageUpload {
                    file: FileKind::Media,
                    source,
                }
            })?;

        state
            .storage
            .put(&audio_key, &audio.content_type, audio.data)
            .await
            .map_err(|source| {
                error!(%uuid, %source, "failed to upload audio");
                JobError::StorageUpload {
                    file: FileKind::Audio,
                    source,
                }
            })?;

        let job = Job::new(uuid, media_key.clone(), audio_key.clone());
        state.jobs.create(job).await.inspect_err(|err| {
            error!(%uuid, %err, "failed to register job");
        })?;

        let message = JobMessage {
            uuid,
            media: media_key,
            audio: audio_key,
            bucket: state.config.storage_bucket.clone(),
        };
        state.queue.publish(&message).await.inspect_err(|err| {
            error!(%uuid, %err, "failed to publish job");
        })?;

        info!(%uuid, "job created and published");
        Ok(uuid)
    }

    /// Resolves the current status. The registry holds the last-known status,
    /// but presence of the output artifact in storage is authoritative: once
    /// the worker has written it, the job is `ready` no matter what is stored.
    pub async fn status(state: AppState, uuid: Uuid) -> Result<StatusResponse, JobError> {
        let job = state.jobs.get(uuid).await.map_err(|_| JobError::NotFound)?;

        let exists = state
            .storage
            .exists(&output_key(uuid))
            .await
            .map_err(JobError::StorageRead)?;

        if exists {
            return Ok(StatusResponse {
                uuid,
                status: JobStatus::Ready,
                url: Some(format!(
                    "{}/download/{}/{}",
                    state.config.base_url, uuid, OUTPUT_FILENAME
                )),
            });
        }

        Ok(StatusResponse {
            uuid,
            status: job.status,
            url: None,
        })
    }

    /// Fetches the output artifact for streaming. Goes straight to storage
    /// without consulting the registry, mirroring the status existence check.
    pub async fn download(state: AppState, uuid: Uuid) -> Result<FileDownload, JobError> {
        let object = state
            .storage
            .get(&output_key(uuid))
            .await
            .map_err(|err| match err {
                StorageError::NotFound(_) => JobError::NotFound,
                other => JobError::StorageRead(other),
            })?;

        Ok(FileDownload {
            stream: object.stream,
            size: object.size,
            content_type: object.content_type,
            filename: OUTPUT_FILENAME.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use bytes::Bytes;
    use futures_util::StreamExt;

    use super::*;
    use crate::config::settings::AppConfig;
    use crate::infrastructure::queue::{JobQueue, QueueError};
    use crate::infrastructure::storage::{ObjectStorage, StoredObject};
    use crate::modules::jobs::repository::JobRepository;

    #[derive(Default)]
    struct MemoryStorage {
        objects: Mutex<HashMap<String, (String, Bytes)>>,
        puts: AtomicUsize,
        // Fail the nth put (1-based); 0 disables.
        fail_on_put: usize,
    }

    impl MemoryStorage {
        fn failing_on_put(n: usize) -> Self {
            Self {
                fail_on_put: n,
                ..Self::default()
            }
        }

        fn object_count(&self) -> usize {
            self.objects.lock().unwrap().len()
        }

        fn insert(&self, key: &str, content_type: &str, data: Bytes) {
            self.objects
                .lock()
                .unwrap()
                .insert(key.to_string(), (content_type.to_string(), data));
        }

        fn data(&self, key: &str) -> Option<Bytes> {
            self.objects
                .lock()
                .unwrap()
                .get(key)
                .map(|(_, data)| data.clone())
        }

        fn first_key(&self) -> Option<String> {
            self.objects.lock().unwrap().keys().next().cloned()
        }
    }

    #[async_trait]
    impl ObjectStorage for MemoryStorage {
        async fn put(
            &self,
            key: &str,
            content_type: &str,
            body: Bytes,
        ) -> Result<(), StorageError> {
            let n = self.puts.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail_on_put != 0 && n >= self.fail_on_put {
                return Err(StorageError::Upload("connection reset".to_string()));
            }
            self.insert(key, content_type, body);
            Ok(())
        }

        async fn get(&self, key: &str) -> Result<StoredObject, StorageError> {
            let (content_type, data) = self
                .objects
                .lock()
                .unwrap()
                .get(key)
                .cloned()
                .ok_or_else(|| StorageError::NotFound(key.to_string()))?;
            Ok(StoredObject {
                size: data.len() as i64,
                content_type,
                stream: Box::pin(futures_util::stream::once(async move { Ok(data) })),
            })
        }

        async fn exists(&self, key: &str) -> Result<bool, StorageError> {
            Ok(self.objects.lock().unwrap().contains_key(key))
        }

        async fn delete(&self, key: &str) -> Result<(), StorageError> {
            self.objects.lock().unwrap().remove(key);
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingQueue {
        messages: Mutex<Vec<JobMessage>>,
    }

    impl RecordingQueue {
        fn published(&self) -> Vec<JobMessage> {
            self.messages.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl JobQueue for RecordingQueue {
        async fn publish(&self, message: &JobMessage) -> Result<(), QueueError> {
            self.messages.lock().unwrap().push(message.clone());
            Ok(())
        }

        async fn close(&self) -> Result<(), QueueError> {
            Ok(())
        }
    }

    struct BrokenQueue;

    #[async_trait]
    impl JobQueue for BrokenQueue {
        async fn publish(&self, _message: &JobMessage) -> Result<(), QueueError> {
            let encode_err = serde_json::from_str::<serde_json::Value>("").unwrap_err();
            Err(QueueError::Encode(encode_err))
        }

        async fn close(&self) -> Result<(), QueueError> {
            Ok(())
        }
    }

    fn test_state(storage: Arc<MemoryStorage>, queue: Arc<dyn JobQueue>) -> AppState {
        AppState::new(AppConfig::from_env(), JobRepository::new(), storage, queue)
    }

    fn media_file() -> UploadedFile {
        UploadedFile {
            filename: "photo.PNG".to_string(),
            content_type: "image/png".to_string(),
            data: Bytes::from_static(b"png bytes"),
        }
    }

    fn audio_file() -> UploadedFile {
        UploadedFile {
            filename: "track.mp3".to_string(),
            content_type: "audio/mpeg".to_string(),
            data: Bytes::from_static(b"mp3 bytes"),
        }
    }

    #[tokio::test]
    async fn submit_uploads_registers_and_publishes() {
        let storage = Arc::new(MemoryStorage::default());
        let queue = Arc::new(RecordingQueue::default());
        let state = test_state(storage.clone(), queue.clone());

        let uuid = JobService::submit(state.clone(), media_file(), audio_file())
            .await
            .unwrap();

        // Both blobs are stored under identifier-scoped keys, bytes unchanged.
        assert_eq!(
            storage.data(&format!("{uuid}/photo.PNG")).unwrap(),
            Bytes::from_static(b"png bytes")
        );
        assert_eq!(
            storage.data(&format!("{uuid}/track.mp3")).unwrap(),
            Bytes::from_static(b"mp3 bytes")
        );

        let job = state.jobs.get(uuid).await.unwrap();
        assert_eq!(job.status, JobStatus::Pending);

        let published = queue.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].uuid, uuid);
        assert_eq!(published[0].media, format!("{uuid}/photo.PNG"));
        assert_eq!(published[0].audio, format!("{uuid}/track.mp3"));
        assert_eq!(published[0].bucket, state.config.storage_bucket);
    }

    #[tokio::test]
    async fn submit_invalid_media_has_no_side_effects() {
        let storage = Arc::new(MemoryStorage::default());
        let queue = Arc::new(RecordingQueue::default());
        let state = test_state(storage.clone(), queue.clone());

        let media = UploadedFile {
            filename: "doc.pdf".to_string(),
            ..media_file()
        };
        let err = JobService::submit(state, media, audio_file())
            .await
            .unwrap_err();

        assert!(matches!(err, JobError::Validation(_)));
        assert_eq!(storage.object_count(), 0);
        assert!(queue.published().is_empty());
    }

    #[tokio::test]
    async fn submit_invalid_audio_uploads_nothing() {
        let storage = Arc::new(MemoryStorage::default());
        let queue = Arc::new(RecordingQueue::default());
        let state = test_state(storage.clone(), queue.clone());

        let audio = UploadedFile {
            filename: "notes.txt".to_string(),
            ..audio_file()
        };
        let err = JobService::submit(state, media_file(), audio)
            .await
            .unwrap_err();

        // Both filenames are validated before the first upload starts.
        assert!(matches!(err, JobError::Validation(_)));
        assert_eq!(storage.object_count(), 0);
        assert!(queue.published().is_empty());
    }

    #[tokio::test]
    async fn media_upload_failure_registers_and_publishes_nothing() {
        let storage = Arc::new(MemoryStorage::failing_on_put(1));
        let queue = Arc::new(RecordingQueue::default());
        let state = test_state(storage.clone(), queue.clone());

        let err = JobService::submit(state, media_file(), audio_file())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            JobError::StorageUpload {
                file: FileKind::Media,
                ..
            }
        ));
        assert!(queue.published().is_empty());
    }

    #[tokio::test]
    async fn audio_upload_failure_names_the_audio_file() {
        let storage = Arc::new(MemoryStorage::failing_on_put(2));
        let queue = Arc::new(RecordingQueue::default());
        let state = test_state(storage.clone(), queue.clone());

        let err = JobService::submit(state, media_file(), audio_file())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            JobError::StorageUpload {
                file: FileKind::Audio,
                ..
            }
        ));
        // The media blob is already durable; nothing cleans it up.
        assert_eq!(storage.object_count(), 1);
        assert!(queue.published().is_empty());
    }

    #[tokio::test]
    async fn publish_failure_leaves_stuck_pending_job() {
        let storage = Arc::new(MemoryStorage::default());
        let state = test_state(storage.clone(), Arc::new(BrokenQueue));

        let err = JobService::submit(state.clone(), media_file(), audio_file())
            .await
            .unwrap_err();
        assert!(matches!(err, JobError::Publish(_)));

        // Storage and registry both reflect the job, but no worker will ever
        // see it: the stuck-pending orphan is the documented behavior.
        assert_eq!(storage.object_count(), 2);
        let key = storage.first_key().unwrap();
        let uuid: Uuid = key.split('/').next().unwrap().parse().unwrap();
        let stuck = state.jobs.get(uuid).await.unwrap();
        assert_eq!(stuck.status, JobStatus::Pending);
    }

    #[tokio::test]
    async fn status_unknown_job_is_not_found() {
        let state = test_state(
            Arc::new(MemoryStorage::default()),
            Arc::new(RecordingQueue::default()),
        );
        let err = JobService::status(state, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, JobError::NotFound));
    }

    #[tokio::test]
    async fn status_without_artifact_reports_stored_status() {
        let storage = Arc::new(MemoryStorage::default());
        let queue = Arc::new(RecordingQueue::default());
        let state = test_state(storage, queue);

        let uuid = JobService::submit(state.clone(), media_file(), audio_file())
            .await
            .unwrap();

        let resp = JobService::status(state, uuid).await.unwrap();
        assert_eq!(resp.status, JobStatus::Pending);
        assert!(resp.url.is_none());
    }

    #[tokio::test]
    async fn artifact_presence_overrides_stored_status() {
        let storage = Arc::new(MemoryStorage::default());
        let queue = Arc::new(RecordingQueue::default());
        let state = test_state(storage.clone(), queue);

        let uuid = JobService::submit(state.clone(), media_file(), audio_file())
            .await
            .unwrap();
        // Worker writes the artifact; the registry still says pending.
        storage.insert(&output_key(uuid), "video/mp4", Bytes::from_static(b"out"));
        assert_eq!(state.jobs.get(uuid).await.unwrap().status, JobStatus::Pending);

        let resp = JobService::status(state, uuid).await.unwrap();
        assert_eq!(resp.status, JobStatus::Ready);
        let url = resp.url.unwrap();
        assert!(url.contains(&uuid.to_string()));
        assert!(url.ends_with("/output.mp4"));
    }

    #[tokio::test]
    async fn status_is_repeatable_without_state_change() {
        let storage = Arc::new(MemoryStorage::default());
        let queue = Arc::new(RecordingQueue::default());
        let state = test_state(storage, queue);

        let uuid = JobService::submit(state.clone(), media_file(), audio_file())
            .await
            .unwrap();

        let first = JobService::status(state.clone(), uuid).await.unwrap();
        let second = JobService::status(state, uuid).await.unwrap();
        assert_eq!(first.status, second.status);
        assert_eq!(first.url, second.url);
    }

    #[tokio::test]
    async fn download_missing_artifact_is_not_found() {
        let state = test_state(
            Arc::new(MemoryStorage::default()),
            Arc::new(RecordingQueue::default()),
        );
        let err = JobService::download(state, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, JobError::NotFound));
    }

    #[tokio::test]
    async fn download_streams_the_artifact_with_exact_length() {
        let storage = Arc::new(MemoryStorage::default());
        let state = test_state(storage.clone(), Arc::new(RecordingQueue::default()));

        let uuid = Uuid::new_v4();
        let artifact = Bytes::from_static(b"final render bytes");
        storage.insert(&output_key(uuid), "video/mp4", artifact.clone());

        let download = JobService::download(state, uuid).await.unwrap();
        assert_eq!(download.size, artifact.len() as i64);
        assert_eq!(download.content_type, "video/mp4");
        assert_eq!(download.filename, OUTPUT_FILENAME);

        let mut body = Vec::new();
        let mut stream = download.stream;
        while let Some(chunk) = stream.next().await {
            body.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(Bytes::from(body), artifact);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_submits_yield_distinct_resolvable_jobs() {
        let storage = Arc::new(MemoryStorage::default());
        let queue = Arc::new(RecordingQueue::default());
        let state = test_state(storage, queue.clone());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let state = state.clone();
                tokio::spawn(async move {
                    let media = UploadedFile {
                        filename: format!("clip_{i}.mp4"),
                        content_type: "video/mp4".to_string(),
                        data: Bytes::from(vec![i as u8; 16]),
                    };
                    JobService::submit(state, media, audio_file()).await
                })
            })
            .collect();

        let mut uuids = Vec::new();
        for handle in handles {
            uuids.push(handle.await.unwrap().unwrap());
        }

        let mut deduped = uuids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), uuids.len());

        for uuid in uuids {
            let resp = JobService::status(state.clone(), uuid).await.unwrap();
            assert_eq!(resp.status, JobStatus::Pending);
        }
        assert_eq!(queue.published().len(), 8);
    }
}
