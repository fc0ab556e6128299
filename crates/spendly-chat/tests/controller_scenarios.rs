//! End-to-end scenarios for the conversation controller against a scripted
//! transport.

use async_trait::async_trait;
use spendly_chat::ConversationController;
use spendly_core::chat::{ChatRole, Intent};
use spendly_core::config::ClientConfig;
use spendly_core::{Result, SpendlyError};
use spendly_transport::{
    ChatData, ChatResponse, FileUpload, MessagePayload, TransportClient, UploadResponse,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Transport that replays a scripted reply and records outgoing payloads.
struct ScriptedTransport {
    reply: Option<ChatResponse>,
    fail_uploads: bool,
    payloads: Mutex<Vec<MessagePayload>>,
}

impl ScriptedTransport {
    fn replying(reply: ChatResponse) -> Self {
        Self {
            reply: Some(reply),
            fail_uploads: false,
            payloads: Mutex::new(Vec::new()),
        }
    }

    fn broken_uploads() -> Self {
        Self {
            reply: None,
            fail_uploads: true,
            payloads: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TransportClient for ScriptedTransport {
    async fn upload_file(&self, file: &FileUpload) -> Result<UploadResponse> {
        if self.fail_uploads {
            return Err(SpendlyError::transport("connection reset by peer"));
        }
        Ok(UploadResponse {
            file_id: "f-1".to_string(),
            filename: file.file_name.clone(),
            path: format!("/uploads/{}", file.file_name),
        })
    }

    async fn send_message(&self, payload: &MessagePayload) -> Result<ChatResponse> {
        self.payloads.lock().unwrap().push(payload.clone());
        self.reply
            .clone()
            .ok_or_else(|| SpendlyError::transport("connection reset by peer"))
    }
}

async fn wait_until_idle(controller: &ConversationController) {
    while controller.is_sending() || controller.is_uploading() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
}

#[tokio::test(start_paused = true)]
async fn spending_plan_turn_reveals_summary_and_updates_breakdown() {
    let reply = ChatResponse {
        session_id: None,
        messages: Vec::new(),
        summary: Some("You're on track".to_string()),
        data: Some(ChatData {
            category_percent: Some(HashMap::from([
                ("rent".to_string(), 40.0),
                ("food".to_string(), 20.0),
            ])),
            extra: HashMap::new(),
        }),
    };
    let transport = Arc::new(ScriptedTransport::replying(reply));
    let controller = ConversationController::new(ClientConfig::default(), Arc::clone(&transport) as _);

    controller.set_input("How am I doing?").await;
    controller.send().await;
    wait_until_idle(&controller).await;

    let entries = controller.entries().await;
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].role, ChatRole::User);
    assert_eq!(entries[0].content, "How am I doing?");
    assert_eq!(entries[1].role, ChatRole::Assistant);
    assert_eq!(entries[1].content, "You're on track");

    let breakdown = controller.spending_data().await.unwrap();
    assert_eq!(breakdown.len(), 2);
    assert_eq!(breakdown.get("rent"), Some(&40.0));
    assert_eq!(breakdown.get("food"), Some(&20.0));
}

#[tokio::test(start_paused = true)]
async fn loan_turn_transmits_the_entered_fields() {
    let reply = ChatResponse {
        session_id: None,
        messages: Vec::new(),
        summary: Some("Looks feasible".to_string()),
        data: None,
    };
    let transport = Arc::new(ScriptedTransport::replying(reply));
    let controller = ConversationController::new(ClientConfig::default(), Arc::clone(&transport) as _);

    controller.select_intent(Intent::Loan).await;
    controller.set_cibil_score(720).await;
    controller.set_monthly_income(50_000.0).await;
    controller.set_existing_emi(5_000.0).await;

    controller.set_input("Can I get a loan?").await;
    controller.send().await;
    wait_until_idle(&controller).await;

    let payloads = transport.payloads.lock().unwrap();
    let payload = &payloads[0];
    assert_eq!(payload.session_id, controller.session_id());
    assert_eq!(payload.message, "Can I get a loan?");
    assert_eq!(payload.intent, Intent::Loan);
    assert_eq!(payload.cibil_score, Some(720));
    assert_eq!(payload.monthly_income, Some(50_000.0));
    assert_eq!(payload.existing_emi, Some(5_000.0));

    let fields = payload.form_fields();
    assert!(fields.contains(&("cibil_score", "720".to_string())));
    assert!(fields.contains(&("monthly_income", "50000".to_string())));
    assert!(fields.contains(&("existing_emi", "5000".to_string())));
}

#[tokio::test]
async fn failed_upload_surfaces_fixed_message_and_resets_flag() {
    let transport = Arc::new(ScriptedTransport::broken_uploads());
    let controller = ConversationController::new(ClientConfig::default(), transport as _);

    controller
        .start_upload(Some(FileUpload::new("statement.csv", b"x".to_vec())))
        .await;

    assert!(!controller.is_uploading());
    assert!(controller.file_path().await.is_none());

    let entries = controller.entries().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].role, ChatRole::Assistant);
    assert_eq!(entries[0].content, "Upload failed. Please try again.");
}
