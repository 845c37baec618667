use crate::auth::StaticCredential;
use crate::graph::ApplicationPatch;
use crate::test_support::{FakeDirectory, app};
use crate::tui_shell::EditAction;

use super::*;

struct Fixture {
    app: App,
    fake: Arc<FakeDirectory>,
    _dir: tempfile::TempDir,
}

fn fixture(token: &str) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let fake = Arc::new(FakeDirectory::new(vec![
        app("b", "Beta"),
        app("a", "Alpha"),
    ]));
    let credentials = Arc::new(StaticCredential::new(token).with_tenant("tenant-1"));
    let store = SettingsStore::at(dir.path().join("settings.json"));
    let app = App::new(fake.clone(), credentials, store);
    Fixture {
        app,
        fake,
        _dir: dir,
    }
}

fn event_name(event: &UiEvent) -> &'static str {
    match event {
        UiEvent::Prompt(_) => "prompt",
        UiEvent::Busy { .. } => "busy",
        UiEvent::Restore { .. } => "restore",
        UiEvent::Copy { .. } => "copy",
        UiEvent::Notice { .. } => "notice",
        UiEvent::Initialized { .. } => "initialized",
        UiEvent::SignedIn(_) => "signed-in",
        UiEvent::Rendered(_) => "rendered",
        UiEvent::Expanded { .. } => "expanded",
        UiEvent::ApplicationLoaded { .. } => "application",
        UiEvent::JobDone { .. } => "job-done",
    }
}

/// Handle worker events until one named `name` has been applied.
fn until(app: &mut App, name: &str) {
    for _ in 0..20 {
        let event = app
            .rx
            .recv_timeout(Duration::from_secs(5))
            .expect("worker event");
        let seen = event_name(&event);
        app.handle_event(event);
        if seen == name {
            return;
        }
    }
    panic!("never saw {}", name);
}

fn started(token: &str) -> Fixture {
    let mut f = fixture(token);
    f.app.start();
    until(&mut f.app, "rendered");
    f
}

fn root_labels(app: &App) -> Vec<String> {
    app.tree.roots().iter().map(|n| n.label.clone()).collect()
}

fn key(app: &mut App, code: KeyCode) {
    event_loop::handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        key(app, KeyCode::Char(c));
    }
}

#[test]
fn startup_lists_applications_by_name() {
    let f = started("token");
    assert_eq!(root_labels(&f.app), ["Alpha", "Beta"]);
    assert!(!f.app.rendering);
    assert!(f.app.session().is_authenticated());
}

#[test]
fn startup_without_a_token_shows_the_sign_in_node() {
    let f = started("");
    assert_eq!(f.app.tree.roots()[0].kind, NodeKind::SignIn);
    assert!(f.fake.calls().is_empty());
}

#[test]
fn expanding_a_lazy_group_fetches_it_once() {
    let mut f = started("token");
    key(&mut f.app, KeyCode::Right);
    assert!(f.app.tree.node(&[0]).unwrap().expanded);

    key(&mut f.app, KeyCode::End);
    key(&mut f.app, KeyCode::Up);
    assert_eq!(f.app.tree.selected().unwrap().kind, NodeKind::Owners);
    key(&mut f.app, KeyCode::Right);
    key(&mut f.app, KeyCode::Right);
    assert_eq!(f.app.loading.len(), 1);

    until(&mut f.app, "expanded");
    assert!(f.app.loading.is_empty());
    let owner_calls = f
        .fake
        .calls()
        .iter()
        .filter(|c| c.starts_with("list_owners"))
        .count();
    assert_eq!(owner_calls, 1);
}

#[test]
fn rename_prompts_in_a_modal_and_re_renders() {
    let mut f = started("token");
    f.app.run_command(Command::Edit(EditAction::Rename));

    until(&mut f.app, "prompt");
    f.app.open_pending_modal();
    assert!(f.app.modal.is_some());
    event_loop::handle_key(
        &mut f.app,
        KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL),
    );
    type_text(&mut f.app, "Gamma");
    key(&mut f.app, KeyCode::Enter);
    assert!(f.app.modal.is_none());

    until(&mut f.app, "job-done");
    assert!(f.app.busy.is_empty());
    assert!(f.app.rendering);
    until(&mut f.app, "rendered");
    assert_eq!(
        f.fake.patches(),
        [("a".to_string(), ApplicationPatch::DisplayName("Gamma".to_string()))]
    );
}

#[test]
fn dismissing_a_prompt_reports_cancelled() {
    let mut f = started("token");
    f.app.run_command(Command::Edit(EditAction::Rename));
    until(&mut f.app, "prompt");
    f.app.open_pending_modal();
    key(&mut f.app, KeyCode::Esc);

    until(&mut f.app, "job-done");
    let last = f.app.last_result.clone().unwrap();
    assert_eq!(last.level, Level::Info);
    assert_eq!(last.text, "Cancelled");
    assert_eq!(f.fake.mutation_count(), 0);
}

#[test]
fn manifest_opens_a_viewer() {
    let mut f = started("token");
    f.app.run_command(Command::Edit(EditAction::Manifest));
    until(&mut f.app, "job-done");
    f.app.open_pending_modal();
    let modal = f.app.modal.as_ref().unwrap();
    assert_eq!(modal.title, "Manifest: Alpha");
    assert!(modal.lines.iter().any(|l| l.contains("\"appId\": \"client-a\"")));
}

#[test]
fn setting_a_value_persists_and_repopulates() {
    let mut f = started("token");
    f.app.run_command(Command::Set {
        key: SettingKey::MaximumResults,
        value: "25".to_string(),
    });
    assert_eq!(
        f.app.last_result.clone().unwrap().text,
        "maximumResults = 25"
    );
    assert_eq!(f.app.store.read().unwrap().maximum_results, 25);
    assert!(f.app.rendering);
    until(&mut f.app, "rendered");
}

#[test]
fn invalid_setting_values_are_refused() {
    let mut f = started("token");
    f.app.run_command(Command::Set {
        key: SettingKey::MaximumResults,
        value: "many".to_string(),
    });
    assert_eq!(f.app.last_result.clone().unwrap().level, Level::Warn);
    assert_eq!(f.app.settings.maximum_results, Settings::default().maximum_results);
    assert!(!f.app.rendering);
}

#[test]
fn logout_shows_the_sign_in_node() {
    let mut f = started("token");
    f.app.run_command(Command::Logout);
    until(&mut f.app, "rendered");
    assert_eq!(f.app.tree.roots()[0].kind, NodeKind::SignIn);
}

#[test]
fn losing_the_credential_retries_once_then_signs_out_quietly() {
    let mut f = started("token");
    f.fake.state().signed_out = true;
    f.app.refresh_all();

    until(&mut f.app, "rendered");
    until(&mut f.app, "initialized");
    until(&mut f.app, "rendered");
    until(&mut f.app, "rendered");
    assert_eq!(f.app.tree.roots()[0].kind, NodeKind::SignIn);
    assert!(f.app.last_result.is_none());
}

#[test]
fn typed_commands_run_on_enter() {
    let mut f = started("token");
    type_text(&mut f.app, "frobnicate");
    key(&mut f.app, KeyCode::Enter);
    assert_eq!(f.app.last_command.as_deref(), Some("frobnicate"));
    assert_eq!(
        f.app.last_result.clone().unwrap().text,
        "unknown command: frobnicate"
    );
    assert!(f.app.input.buf.is_empty());
}

#[test]
fn tab_completes_the_best_suggestion() {
    let mut f = started("token");
    type_text(&mut f.app, "manif");
    assert_eq!(f.app.suggestions[0].name, "manifest");
    key(&mut f.app, KeyCode::Tab);
    assert_eq!(f.app.input.buf, "manifest ");
    assert!(f.app.suggestions.is_empty());
}

#[test]
fn q_quits_only_with_an_empty_prompt() {
    let mut f = started("token");
    type_text(&mut f.app, "sq");
    assert!(!f.app.quit);
    key(&mut f.app, KeyCode::Esc);
    key(&mut f.app, KeyCode::Char('q'));
    assert!(f.app.quit);
}

#[test]
fn filter_requires_eventual_consistency() {
    let mut f = started("token");
    f.app.run_command(Command::Filter);
    until(&mut f.app, "job-done");
    assert_eq!(
        f.app.last_result.clone().unwrap().text,
        services::FILTER_NEEDS_EVENTUAL
    );
}

#[test]
fn skipped_refresh_keeps_the_spinner_until_the_running_render_lands() {
    let mut f = started("token");
    let (entered, release) = f.fake.hold_listing();
    f.app.refresh_all();
    entered.recv_timeout(Duration::from_secs(5)).unwrap();

    f.app.refresh_all();
    until(&mut f.app, "rendered");
    assert!(f.app.rendering);

    release.send(()).unwrap();
    until(&mut f.app, "rendered");
    assert!(!f.app.rendering);
    assert_eq!(root_labels(&f.app), ["Alpha", "Beta"]);
}
