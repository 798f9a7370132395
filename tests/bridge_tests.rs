use hvac_duct_organizer::core::MemoryAssetResolver;
use hvac_duct_organizer::{AppState, Bridge, DocumentSnapshot};

const PLAN: &str = r#"{
    "name": "ground-floor",
    "layers": [
        { "name": "Ductwork", "entities": [
            { "kind": "path", "name": "Trunk", "points": [
                { "anchor": [0.0, 0.0], "left_direction": [0.0, 0.0], "right_direction": [0.0, 0.0] },
                { "anchor": [0.0, 40.0], "left_direction": [0.0, 40.0], "right_direction": [0.0, 40.0] },
                { "anchor": [30.0, 40.0], "left_direction": [30.0, 40.0], "right_direction": [30.0, 40.0] }
            ] }
        ] },
        { "name": "Square Registers", "locked": true, "entities": [
            { "kind": "path", "points": [
                { "anchor": [35.0, 60.0], "left_direction": [35.0, 60.0], "right_direction": [35.0, 60.0] }
            ] }
        ] },
        { "name": "Layer 1", "entities": [
            { "kind": "asset", "file": "sketch.png", "position": [100.0, 100.0], "native_size": [8.0, 8.0] }
        ] }
    ]
}"#;

fn bridge() -> Bridge {
    let document = DocumentSnapshot::from_json(PLAN)
        .expect("Snapshot sollte gültiges JSON sein")
        .into_document()
        .expect("Dokument sollte aufbaubar sein");
    let state = AppState::new()
        .with_assets(
            MemoryAssetResolver::new()
                .with("assets/Square Registers.png", glam::Vec2::splat(8.0)),
        )
        .with_document(document);
    Bridge::new(state).expect("Bridge sollte erstellt werden")
}

#[test]
fn test_wire_synthesis_reports_summary_text() {
    let mut bridge = bridge();

    let reply = bridge.handle_line("runRegisterWireSynthesis(true)");

    assert_eq!(
        reply,
        "Swapped 0 asset(s), placed 1 register asset(s), created 1 wire(s)."
    );
    let reply = bridge.handle_line("runRegisterWireSynthesis(false)");
    assert_eq!(
        reply,
        "Swapped 0 asset(s), placed 0 register asset(s), wire creation disabled."
    );
}

#[test]
fn test_ignore_flow_over_bridge() {
    let mut bridge = bridge();

    assert_eq!(bridge.handle_line("applyIgnoreToCurrent()"), "NO_SELECTION");
    assert_eq!(bridge.handle_line("setIgnoreMode(true)"), "true");
    assert_eq!(bridge.handle_line("setIgnoreMode(true)"), "true");
    // Trunk ist das erste Element (ID 1)
    assert_eq!(bridge.handle_line("hostSetSelection([1])"), "OK");
    assert_eq!(bridge.handle_line("ignoreModeStatus()"), "active:Trunk");
    assert_eq!(bridge.handle_line("applyIgnoreToCurrent()"), "IGNORE_ADDED");
    assert_eq!(bridge.handle_line("toggleIgnoreMode()"), "false");
    assert_eq!(bridge.handle_line("ignoreModeStatus()"), "inactive");

    let reply = bridge.handle_line("runRegisterWireSynthesis(true)");
    assert!(reply.contains("created 0 wire(s)"), "Antwort: {reply}");
    assert!(reply.contains("1 endpoint(s) ignored"), "Antwort: {reply}");
}

#[test]
fn test_move_from_scratch_layer_is_skipped() {
    let mut bridge = bridge();
    let summary = bridge.handle_line("layerSummary()");
    assert!(summary.contains(r#""name":"Layer 1","kind":"scratch""#), "Antwort: {summary}");

    // Asset auf "Layer 1" hat ID 3
    bridge.handle_line("hostSetSelection([3])");
    let reply = bridge.handle_line(r#"moveSelectionToLayer({"layerName":"Units","fileBaseName":""})"#);

    assert_eq!(reply, r#"{"itemsMoved":0,"anchorsMoved":0,"itemsSkipped":1}"#);
    let reply = bridge.handle_line(r#"moveSelectionToLayer({"layerName":"Units"})"#);
    assert_eq!(
        reply,
        r#"{"itemsMoved":0,"anchorsMoved":0,"itemsSkipped":0,"reason":"no-selection"}"#
    );
}

#[test]
fn test_invalid_requests_become_error_strings() {
    let mut bridge = bridge();

    assert_eq!(
        bridge.handle_line(r#"moveSelectionToLayer({"layerName":"Layer 1"})"#),
        "ERROR:Invalid input: 'Layer 1' is not a category layer"
    );
    assert!(bridge
        .handle_line("moveSelectionToLayer(42)")
        .starts_with("ERROR:Invalid input"));
    assert!(bridge.handle_line("explode()").starts_with("ERROR:"));
}

#[test]
fn test_shutdown_removes_preview() {
    let mut bridge = bridge();
    bridge.handle_line("hostSetSelection([1])");
    bridge.handle_line("toggleIgnoreMode()");
    assert!(bridge
        .state()
        .document
        .as_ref()
        .and_then(|doc| doc.layer_by_name("__ignore_preview__"))
        .is_some());

    let state = bridge.shutdown();

    let doc = state.document.as_ref().expect("Dokument bleibt offen");
    assert!(doc.layer_by_name("__ignore_preview__").is_none());
    assert_eq!(doc.subscriber_count(), 0);
}
