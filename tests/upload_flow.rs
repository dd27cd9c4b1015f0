mod common;

use common::{harness, millis, pump_for, Reply};
use repwatch::api::{AnalysisReport, SelectedVideo};
use repwatch::upload::{MAX_UPLOAD_BYTES, NO_FILE_LABEL};
use repwatch::view::NoticeKind;

fn video(size: u64) -> SelectedVideo {
    SelectedVideo {
        path: "squats.mp4".into(),
        file_name: "squats.mp4".into(),
        size,
    }
}

fn upload_notice(dash: &repwatch::dashboard::Dashboard) -> Option<(String, NoticeKind)> {
    dash.view()
        .upload_notice
        .as_ref()
        .map(|n| (n.text.clone(), n.kind))
}

#[tokio::test(start_paused = true)]
async fn oversized_file_is_rejected_without_a_request() {
    let (backend, mut dash, mut rx) = harness();
    dash.set_selected_video(video(150_000_000));

    dash.submit_video();
    pump_for(&mut dash, &mut rx, millis(1500)).await;

    assert_eq!(
        upload_notice(&dash),
        Some((
            "File size too large. Maximum size is 100MB.".to_string(),
            NoticeKind::Error
        ))
    );
    assert!(!dash.view().upload.progress_visible);
    assert_eq!(backend.calls.total(), 0);
}

#[tokio::test(start_paused = true)]
async fn file_at_limit_is_sent() {
    let (backend, mut dash, mut rx) = harness();
    dash.set_selected_video(video(MAX_UPLOAD_BYTES));

    dash.submit_video();
    pump_for(&mut dash, &mut rx, millis(200)).await;

    assert_eq!(backend.calls.analyze(), 1);
}

#[tokio::test(start_paused = true)]
async fn submitting_without_a_file_asks_for_one() {
    let (backend, mut dash, mut rx) = harness();
    assert_eq!(dash.view().upload.file_label, NO_FILE_LABEL);

    dash.submit_video();
    pump_for(&mut dash, &mut rx, millis(200)).await;

    assert_eq!(
        upload_notice(&dash),
        Some(("Please select a video file.".to_string(), NoticeKind::Error))
    );
    assert_eq!(backend.calls.total(), 0);
}

#[tokio::test(start_paused = true)]
async fn successful_analysis_completes_progress_and_refreshes_history() {
    let (backend, mut dash, mut rx) = harness();
    dash.set_selected_video(video(2_048));
    assert_eq!(dash.view().upload.file_label, "squats.mp4");

    dash.submit_video();
    assert!(dash.view().upload.progress_visible);
    assert_eq!(dash.view().upload.progress, 0);

    pump_for(&mut dash, &mut rx, millis(500)).await;
    assert!(dash.view().upload.progress_visible);
    assert_eq!(dash.view().upload.progress, 100);
    assert_eq!(
        upload_notice(&dash),
        Some(("Workout completed\nReps: 10".to_string(), NoticeKind::Success))
    );
    assert_eq!(backend.calls.analyze(), 1);
    assert_eq!(backend.calls.history(), 1);

    pump_for(&mut dash, &mut rx, millis(1000)).await;
    assert!(!dash.view().upload.progress_visible);
    assert!(dash.view().upload_notice.is_some());

    pump_for(&mut dash, &mut rx, millis(4000)).await;
    assert!(dash.view().upload_notice.is_none());
}

#[tokio::test(start_paused = true)]
async fn server_error_text_is_shown() {
    let (backend, mut dash, mut rx) = harness();
    *backend.analyze.lock().unwrap() = Reply::Status(400, Some("Invalid file type"));
    dash.set_selected_video(video(10));

    dash.submit_video();
    pump_for(&mut dash, &mut rx, millis(200)).await;

    assert_eq!(
        upload_notice(&dash),
        Some(("Invalid file type".to_string(), NoticeKind::Error))
    );
    assert!(!dash.view().upload.progress_visible);
    assert_eq!(backend.calls.history(), 0);
}

#[tokio::test(start_paused = true)]
async fn failures_without_server_text_use_defaults() {
    let cases = [
        (Reply::Status(500, None), "Failed to analyze video"),
        (Reply::Rejected(None), "Analysis failed"),
        (Reply::Transport, "Error analyzing video. Please try again."),
    ];

    for (reply, expected) in cases {
        let (backend, mut dash, mut rx) = harness();
        *backend.analyze.lock().unwrap() = reply;
        dash.set_selected_video(video(10));

        dash.submit_video();
        pump_for(&mut dash, &mut rx, millis(200)).await;

        assert_eq!(
            upload_notice(&dash),
            Some((expected.to_string(), NoticeKind::Error))
        );
    }
}

#[tokio::test(start_paused = true)]
async fn upload_does_not_touch_live_session() {
    let (backend, mut dash, mut rx) = harness();
    *backend.analyze.lock().unwrap() = Reply::Ok(AnalysisReport {
        message: "Analysis done".into(),
        ..Default::default()
    });

    dash.start_workout();
    dash.set_selected_video(video(10));
    dash.submit_video();
    pump_for(&mut dash, &mut rx, millis(500)).await;

    assert!(dash.session().is_recording());
    assert!(dash.view().live.stop_visible());
    assert_eq!(
        upload_notice(&dash).map(|(text, _)| text),
        Some("Analysis done".to_string())
    );
    assert_eq!(
        dash.view().live_notice.as_ref().map(|n| n.kind),
        Some(NoticeKind::Success)
    );
}

#[tokio::test(start_paused = true)]
async fn selecting_a_real_file_reads_its_size() {
    let (backend, mut dash, mut rx) = harness();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lunges.mov");
    std::fs::write(&path, vec![0u8; 4096]).unwrap();

    assert!(dash.select_video(&path));
    assert_eq!(dash.view().upload.file_label, "lunges.mov");
    assert_eq!(dash.selected_video().map(|v| v.size), Some(4096));

    dash.submit_video();
    pump_for(&mut dash, &mut rx, millis(200)).await;
    assert_eq!(backend.calls.analyze(), 1);
}
