//! Conversation controller for the Spendly client.
//!
//! The controller owns one chat view's state: session identity, the
//! selected advisory intent, the structured loan fields, the ordered chat
//! ledger and the in-flight request flags. It orchestrates uploads and
//! message turns against a [`TransportClient`] and drives the progressive
//! reveal of assistant replies.

pub mod reveal;

use crate::reveal::RevealEffect;
use spendly_core::chat::{ChatEntry, Intent, LoanDetails, SpendingBreakdown};
use spendly_core::config::ClientConfig;
use spendly_transport::{FileUpload, MessagePayload, TransportClient};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Fixed message appended when an upload fails.
const UPLOAD_FAILED_MESSAGE: &str = "Upload failed. Please try again.";
/// Fixed message shown in place of a reply when a chat turn fails.
const SEND_FAILED_MESSAGE: &str = "Error connecting to Spendly backend. Please try again.";
/// Fallback reply when the backend omits a summary.
const EMPTY_REPLY_FALLBACK: &str = "No response";

/// Manages one chat view's conversation with the Spendly backend.
///
/// All methods take `&self`; shared state lives behind `RwLock`s and
/// atomics so overlapping operations are possible. Overlap is deliberately
/// unguarded to match the documented protocol: the reference last to
/// complete wins on the stored file path unless
/// [`ClientConfig::guard_stale_uploads`] is enabled.
pub struct ConversationController {
    /// Session identifier generated at construction, sent with every turn.
    session_id: String,
    config: ClientConfig,
    transport: Arc<dyn TransportClient>,
    /// The advisory mode used for the next turn.
    intent: RwLock<Intent>,
    /// Structured loan fields; transmitted only on loan turns.
    loan_details: RwLock<LoanDetails>,
    /// Server-assigned reference of the most recent successful upload.
    file_path: RwLock<Option<String>>,
    /// Ordered, append-only conversation ledger.
    entries: Arc<RwLock<Vec<ChatEntry>>>,
    /// Latest category breakdown from a spending-plan reply.
    spending_data: RwLock<Option<SpendingBreakdown>>,
    /// Draft message text, consumed by `send`.
    input: RwLock<String>,
    uploading: Arc<AtomicBool>,
    sending: Arc<AtomicBool>,
    /// Monotonic upload generation, used by the stale-upload guard.
    upload_generation: AtomicU64,
}

impl ConversationController {
    /// Creates a controller with a fresh session identity.
    ///
    /// # Arguments
    ///
    /// * `config` - Backend origin and reveal cadence
    /// * `transport` - The network boundary used for uploads and turns
    pub fn new(config: ClientConfig, transport: Arc<dyn TransportClient>) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            config,
            transport,
            intent: RwLock::new(Intent::default()),
            loan_details: RwLock::new(LoanDetails::default()),
            file_path: RwLock::new(None),
            entries: Arc::new(RwLock::new(Vec::new())),
            spending_data: RwLock::new(None),
            input: RwLock::new(String::new()),
            uploading: Arc::new(AtomicBool::new(false)),
            sending: Arc::new(AtomicBool::new(false)),
            upload_generation: AtomicU64::new(0),
        }
    }

    /// Returns the session identifier.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Returns the currently selected intent.
    pub async fn intent(&self) -> Intent {
        *self.intent.read().await
    }

    /// Selects the advisory intent for subsequent turns.
    ///
    /// Pure state update: previously entered loan values are kept and fall
    /// silent until a loan turn uses them again.
    pub async fn select_intent(&self, intent: Intent) {
        *self.intent.write().await = intent;
    }

    /// Stores the CIBIL score.
    pub async fn set_cibil_score(&self, score: u32) {
        self.loan_details.write().await.cibil_score = Some(score);
    }

    /// Stores the monthly income.
    pub async fn set_monthly_income(&self, income: f64) {
        self.loan_details.write().await.monthly_income = Some(income);
    }

    /// Stores the existing EMI total.
    pub async fn set_existing_emi(&self, emi: f64) {
        self.loan_details.write().await.existing_emi = Some(emi);
    }

    /// Replaces the draft message text.
    pub async fn set_input(&self, text: impl Into<String>) {
        *self.input.write().await = text.into();
    }

    /// Returns the current draft message text.
    pub async fn input(&self) -> String {
        self.input.read().await.clone()
    }

    /// Returns a snapshot of the conversation ledger.
    pub async fn entries(&self) -> Vec<ChatEntry> {
        self.entries.read().await.clone()
    }

    /// Returns the stored upload reference, if any.
    pub async fn file_path(&self) -> Option<String> {
        self.file_path.read().await.clone()
    }

    /// Returns the latest spending-plan category breakdown, if any.
    pub async fn spending_data(&self) -> Option<SpendingBreakdown> {
        self.spending_data.read().await.clone()
    }

    /// True while an upload is outstanding.
    pub fn is_uploading(&self) -> bool {
        self.uploading.load(Ordering::SeqCst)
    }

    /// True while a turn (including its reveal) is outstanding.
    pub fn is_sending(&self) -> bool {
        self.sending.load(Ordering::SeqCst)
    }

    /// Uploads a document and stores the server-assigned reference.
    ///
    /// `None` is a validation miss and a silent no-op. On failure the
    /// stored reference is left unchanged and a fixed assistant entry is
    /// appended; transport detail goes to the log only. Overlapping uploads
    /// are permitted: the reference last to complete wins, unless the
    /// stale-upload guard is enabled.
    pub async fn start_upload(&self, file: Option<FileUpload>) {
        let Some(file) = file else {
            return;
        };

        self.uploading.store(true, Ordering::SeqCst);
        let generation = self.upload_generation.fetch_add(1, Ordering::SeqCst) + 1;

        match self.transport.upload_file(&file).await {
            Ok(response) => {
                if self.config.guard_stale_uploads
                    && self.upload_generation.load(Ordering::SeqCst) != generation
                {
                    tracing::debug!(path = %response.path, "discarding superseded upload reference");
                } else {
                    *self.file_path.write().await = Some(response.path);
                }
                self.uploading.store(false, Ordering::SeqCst);
            }
            Err(err) => {
                tracing::warn!(error = %err, "upload failed");
                self.uploading.store(false, Ordering::SeqCst);
                self.append_entry(ChatEntry::assistant(UPLOAD_FAILED_MESSAGE)).await;
            }
        }
    }

    /// Sends the drafted message as one conversational turn.
    ///
    /// An input that trims to empty is a silent no-op. Otherwise the user
    /// entry and the empty placeholder assistant entry are both appended
    /// before the request is issued, so the view can show the pending turn
    /// immediately. On success the reply is revealed into the placeholder;
    /// on failure the placeholder is overwritten with a fixed message and
    /// the sending flag drops at once.
    pub async fn send(&self) {
        let raw = self.input.read().await.clone();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return;
        }
        let message = trimmed.to_string();

        self.append_entry(ChatEntry::user(message.clone())).await;
        self.sending.store(true, Ordering::SeqCst);
        let target = self.append_entry(ChatEntry::placeholder()).await;

        let intent = self.intent().await;
        let mut payload = MessagePayload::new(self.session_id.clone(), message, intent)
            .with_file_path(self.file_path().await);
        if intent == Intent::Loan {
            payload = payload.with_loan_details(&*self.loan_details.read().await);
        }

        // The draft is consumed regardless of outcome.
        self.input.write().await.clear();

        match self.transport.send_message(&payload).await {
            Ok(response) => {
                let reply = response
                    .summary
                    .unwrap_or_else(|| EMPTY_REPLY_FALLBACK.to_string());

                if intent == Intent::SpendingPlan {
                    if let Some(breakdown) =
                        response.data.and_then(|data| data.category_percent)
                    {
                        *self.spending_data.write().await = Some(breakdown);
                    }
                }

                let done = RevealEffect::new(
                    Arc::clone(&self.entries),
                    target,
                    &reply,
                    self.config.reveal_tick(),
                )
                .spawn();

                let sending = Arc::clone(&self.sending);
                tokio::spawn(async move {
                    let _ = done.await;
                    sending.store(false, Ordering::SeqCst);
                });
            }
            Err(err) => {
                tracing::warn!(error = %err, "chat turn failed");
                let mut entries = self.entries.write().await;
                if let Some(entry) = entries.get_mut(target) {
                    entry.content = SEND_FAILED_MESSAGE.to_string();
                }
                drop(entries);
                self.sending.store(false, Ordering::SeqCst);
            }
        }
    }

    /// Appends an entry and returns its index in the ledger.
    async fn append_entry(&self, entry: ChatEntry) -> usize {
        let mut entries = self.entries.write().await;
        entries.push(entry);
        entries.len() - 1
    }
}
