use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One persisted question/answer pair. The response may come from the
/// Gemini API or the offline synthesizer; storage does not distinguish.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatExchange {
    pub id: i64,
    pub user_id: i64,
    pub message: String,
    pub response: String,
    pub has_image: bool,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}
