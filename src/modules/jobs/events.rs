use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Handoff payload consumed by the processing worker. The field names are the
/// wire contract; the worker resolves `media` and `audio` inside `bucket`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobMessage {
    pub uuid: Uuid,
    pub media: String,
    pub audio: String,
    pub bucket: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_exact_wire_field_names() {
        let message = JobMessage {
            uuid: Uuid::new_v4(),
            media: "abc/clip.mp4".to_string(),
            audio: "abc/track.mp3".to_string(),
            bucket: "uploads".to_string(),
        };

        let value = serde_json::to_value(&message).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 4);
        assert_eq!(object["uuid"], message.uuid.to_string());
        assert_eq!(object["media"], "abc/clip.mp4");
        assert_eq!(object["audio"], "abc/track.mp3");
        assert_eq!(object["bucket"], "uploads");
    }
}
