use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::json;
use trapscan_core::client::decode_response;
use trapscan_core::render::html::render_fragment;
use trapscan_core::render::SectionBody;
use trapscan_core::{
    AnalysisClient, AnalysisRequest, AnalysisResponse, Event, FindingCategory, Notice, Phase,
    RecordingSurface, Transition, TransportError, UploadController, UploadedFile, Verdict,
};

/// Replays a canned HTTP response through the real decoder.
struct CannedClient {
    status: u16,
    body: String,
    calls: AtomicUsize,
}

impl CannedClient {
    fn json(value: serde_json::Value) -> Self {
        Self {
            status: 200,
            body: value.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalysisClient for CannedClient {
    async fn analyze(
        &self,
        _request: AnalysisRequest,
    ) -> Result<AnalysisResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        decode_response(self.status, self.body.as_bytes())
    }
}

fn docx(name: &str) -> UploadedFile {
    UploadedFile::new(name, b"PK\x03\x04".to_vec())
}

#[tokio::test(flavor = "current_thread")]
async fn docx_with_hidden_text_is_flagged() {
    let client = CannedClient::json(json!({
        "verdict": "high",
        "filename": "secret_prompt_injection_attempt_file.docx",
        "file_type": "docx",
        "hidden_text": [{"paragraph": 3, "property": "vanish"}],
        "white_text": []
    }));
    let mut controller = UploadController::new(RecordingSurface::default());

    let transition = controller
        .run(docx("secret_prompt_injection_attempt_file.docx"), &client)
        .await;
    assert_eq!(transition, Transition::Displayed);
    assert_eq!(controller.phase(), Phase::Displaying);
    assert_eq!(client.calls(), 1);

    let surface = controller.surface();
    assert!(!surface.busy);
    let view = surface.results.as_ref().expect("results shown");
    assert_eq!(view.banner.verdict, Verdict::High);
    assert_eq!(view.banner.title, "TRAP DETECTED!");
    assert_eq!(view.filename.display, "secret_prompt_inj...");
    assert_eq!(view.filename.full, "secret_prompt_injection_attempt_file.docx");
    assert_eq!(view.sections.len(), 2);

    let hidden = view.section(FindingCategory::HiddenText).unwrap();
    assert!(hidden.expanded);
    assert_eq!(hidden.count, 1);
    let SectionBody::Items { items } = &hidden.body else {
        panic!("hidden text should list findings");
    };
    assert_eq!(items[0].location.as_deref(), Some("Paragraph 3"));
    assert_eq!(items[0].tags, vec!["vanish".to_string()]);

    let white = view.section(FindingCategory::WhiteText).unwrap();
    assert!(!white.expanded);
    assert_eq!(white.count, 0);
    assert!(matches!(&white.body, SectionBody::NoneDetected { message } if message.contains("detected")));

    for absent in [
        FindingCategory::InvisibleChars,
        FindingCategory::SmallText,
        FindingCategory::HiddenLayers,
    ] {
        assert!(view.section(absent).is_none());
    }
}

#[tokio::test(flavor = "current_thread")]
async fn server_error_restores_intake() {
    let client = CannedClient::json(json!({"error": "corrupted file"}));
    let mut controller = UploadController::new(RecordingSurface::default());

    let transition = controller
        .run(UploadedFile::new("scan.pdf", b"%PDF".to_vec()), &client)
        .await;
    assert_eq!(transition, Transition::AnalysisFailed("corrupted file".into()));
    assert_eq!(controller.phase(), Phase::Idle);

    let surface = controller.surface();
    assert!(surface.intake_visible);
    assert!(!surface.busy);
    assert!(surface.results.is_none());
    assert_eq!(surface.notices.len(), 1);
    assert!(surface.notices[0].to_string().contains("corrupted file"));
}

#[tokio::test(flavor = "current_thread")]
async fn unsupported_files_never_reach_the_client() {
    let client = CannedClient::json(json!({"verdict": "clean", "filename": "x", "file_type": "x"}));
    let mut controller = UploadController::new(RecordingSurface::default());

    for name in ["installer.exe", "notes.txt", "README"] {
        let transition = controller.run(UploadedFile::new(name, vec![0]), &client).await;
        assert!(matches!(transition, Transition::Rejected(_)));
        assert_eq!(controller.phase(), Phase::Idle);
    }
    assert_eq!(client.calls(), 0);
    assert_eq!(
        controller.surface().notices,
        vec![Notice::UnsupportedFileType; 3]
    );
}

#[tokio::test(flavor = "current_thread")]
async fn malformed_payload_is_a_transport_failure() {
    let client = CannedClient::json(json!({"verdict": "low", "filename": "a.pdf"}));
    let mut controller = UploadController::new(RecordingSurface::default());

    let transition = controller
        .run(UploadedFile::new("a.pdf", vec![]), &client)
        .await;
    assert_eq!(transition, Transition::TransportFailed);
    assert_eq!(controller.phase(), Phase::Failed);
    assert_eq!(controller.surface().notices, vec![Notice::TransportFailure]);
    assert!(!controller.surface().busy);

    assert_eq!(controller.dispatch(Event::Acknowledge), Transition::Reset);
    let transition = controller
        .run(UploadedFile::new("a.pdf", vec![]), &client)
        .await;
    assert_eq!(transition, Transition::TransportFailed);
    assert_eq!(client.calls(), 2);
}

#[tokio::test(flavor = "current_thread")]
async fn rescanning_rebuilds_identical_output() {
    let client = CannedClient::json(json!({
        "verdict": "medium",
        "filename": "brief.pdf",
        "file_type": "PDF",
        "white_text": [{"page": 1, "text": "<script>alert(1)</script>", "color": "rgb(255,255,255)", "font_size": 11.5, "char_count": 25}],
        "small_text": [{"page": 2, "text": "tiny", "font_size": 0}]
    }));
    let mut controller = UploadController::new(RecordingSurface::default());

    controller.run(UploadedFile::new("brief.pdf", vec![]), &client).await;
    let first = render_fragment(controller.view().unwrap()).unwrap();
    controller.dispatch(Event::ToggleSection(FindingCategory::SmallText));
    controller.dispatch(Event::ScanAgain);
    controller.run(UploadedFile::new("brief.pdf", vec![]), &client).await;
    let second = render_fragment(controller.view().unwrap()).unwrap();

    assert_eq!(first, second);
    assert!(first.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(!first.contains("<script>"));
    assert!(first.contains("<span class=\"finding-tag\">0pt</span>"));
    assert!(first.contains("📍 Page 1 • 25 characters"));
}
