use std::io::Write;

use super::*;
use crate::model::PasswordCredential;
use crate::test_support::{Answer, FeedbackEvent, Harness, NOW, app};

fn secrets_group(h: &Harness) -> TreeNode {
    h.node("a", NodeKind::CredentialGroup(CredentialKind::Password))
}

#[test]
fn add_password_sends_description_and_rfc3339_expiry() {
    let h = Harness::new(vec![app("a", "apple")])
        .answers([Answer::text("ci deploy"), Answer::text("90")]);
    let out = add_password(&h.ctx(), &secrets_group(&h)).unwrap();
    assert!(matches!(out, EditOutcome::Applied(_)));

    assert_eq!(h.fake.calls(), ["add_password:a"]);
    let stored = h.fake.app("a").passwords().to_vec();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].display_name.as_deref(), Some("ci deploy"));
    assert_eq!(
        stored[0].end_date_time.as_deref(),
        Some("2026-08-30T12:00:00Z")
    );
    assert_eq!(h.feedback.copied(), ["s3cr3t-value"]);
}

#[test]
fn expiry_defaults_to_ninety_days() {
    let h = Harness::new(vec![app("a", "apple")])
        .answers([Answer::text(""), Answer::text("90")]);
    add_password(&h.ctx(), &secrets_group(&h)).unwrap();
    let inputs = h.prompter.inputs.lock().unwrap().clone();
    assert_eq!(inputs[1].value, DEFAULT_EXPIRY_DAYS.to_string());
    assert_eq!(expiry(NOW, 90).unwrap(), "2026-08-30T12:00:00Z");
    assert_eq!(expiry(NOW, 730).unwrap(), "2028-05-31T12:00:00Z");
}

#[test]
fn expiry_outside_range_reprompts() {
    let h = Harness::new(vec![app("a", "apple")]).answers([
        Answer::text("x"),
        Answer::text("731"),
        Answer::text("0"),
        Answer::text("30"),
    ]);
    add_password(&h.ctx(), &secrets_group(&h)).unwrap();
    assert_eq!(h.prompter.errors().len(), 2);
    assert_eq!(
        h.fake.app("a").passwords()[0].end_date_time.as_deref(),
        Some("2026-07-01T12:00:00Z")
    );
}

#[test]
fn failed_add_restores_and_never_touches_the_clipboard() {
    let h = Harness::new(vec![app("a", "apple")])
        .answers([Answer::text("ci"), Answer::text("90")]);
    h.fake.fail("add_password");
    assert!(add_password(&h.ctx(), &secrets_group(&h)).is_err());
    assert!(h.feedback.copied().is_empty());
    assert!(h.feedback.restored());
}

#[test]
fn cancelled_add_makes_no_calls() {
    let h = Harness::new(vec![app("a", "apple")]).answers([Answer::text("ci"), Answer::Dismiss]);
    assert_eq!(
        add_password(&h.ctx(), &secrets_group(&h)).unwrap(),
        EditOutcome::Cancelled
    );
    assert!(h.fake.calls().is_empty());
    assert!(h.feedback.events().is_empty());
}

#[test]
fn clipboard_failure_still_shows_the_secret_once() {
    let mut h = Harness::new(vec![app("a", "apple")])
        .answers([Answer::text("ci"), Answer::text("90")]);
    h.feedback.clipboard_broken = true;
    add_password(&h.ctx(), &secrets_group(&h)).unwrap();
    let events = h.feedback.events();
    assert!(matches!(events[1], FeedbackEvent::Warn(_)));
    assert_eq!(events[2], FeedbackEvent::Info("Secret value: s3cr3t-value".to_string()));
}

#[test]
fn delete_password_targets_the_key_id() {
    let mut a = app("a", "apple");
    a.password_credentials = Some(vec![
        PasswordCredential {
            key_id: "k1".to_string(),
            display_name: Some("one".to_string()),
            ..PasswordCredential::default()
        },
        PasswordCredential {
            key_id: "k2".to_string(),
            display_name: Some("two".to_string()),
            ..PasswordCredential::default()
        },
    ]);
    let h = Harness::new(vec![a]).answers([Answer::Confirm(true)]);
    let node = h.child(
        "a",
        NodeKind::CredentialGroup(CredentialKind::Password),
        |n| n.label == "two",
    );
    delete_password(&h.ctx(), &node).unwrap();
    assert_eq!(h.fake.calls(), ["remove_password:k2"]);
    let left: Vec<String> = h
        .fake
        .app("a")
        .passwords()
        .iter()
        .map(|p| p.key_id.clone())
        .collect();
    assert_eq!(left, ["k1"]);
}

const PEM: &str = "-----BEGIN CERTIFICATE-----\nAAEC\nAwQ=\n-----END CERTIFICATE-----\n";

#[test]
fn pem_and_der_bodies_are_normalized_to_base64_der() {
    assert_eq!(certificate_body(PEM.as_bytes()).unwrap(), "AAECAwQ=");
    assert_eq!(certificate_body(&[0x30, 0x82, 0xff, 0x00]).unwrap(), "MIL/AA==");
    assert!(certificate_body(b"-----BEGIN CERTIFICATE-----\nAAEC").is_err());
    assert!(certificate_body(b"  \n").is_err());
}

#[test]
fn upload_appends_a_verify_key_and_keeps_existing_ones() {
    let mut a = app("a", "apple");
    a.key_credentials = Some(vec![KeyCredential {
        key_id: Some("old".to_string()),
        display_name: Some("CN=old".to_string()),
        ..KeyCredential::default()
    }]);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(PEM.as_bytes()).unwrap();
    let path = file.path().to_string_lossy().to_string();

    let h = Harness::new(vec![a]).answers([Answer::Text(path), Answer::text("CN=new")]);
    let group = h.node("a", NodeKind::CredentialGroup(CredentialKind::Certificate));
    upload_certificate(&h.ctx(), &group).unwrap();

    let (_, patch) = h.fake.patches().pop().unwrap();
    let ApplicationPatch::KeyCredentials(keys) = patch else {
        panic!("expected a key credential patch");
    };
    assert_eq!(keys.len(), 2);
    assert_eq!(keys[0].key_id.as_deref(), Some("old"));
    assert_eq!(keys[1].key.as_deref(), Some("AAECAwQ="));
    assert_eq!(keys[1].usage.as_deref(), Some("Verify"));
    assert_eq!(keys[1].key_type.as_deref(), Some("AsymmetricX509Cert"));
    assert_eq!(keys[1].display_name.as_deref(), Some("CN=new"));
}

#[test]
fn missing_certificate_file_reprompts() {
    let h = Harness::new(vec![app("a", "apple")])
        .answers([Answer::text("/definitely/not/here.pem"), Answer::Dismiss]);
    let group = h.node("a", NodeKind::CredentialGroup(CredentialKind::Certificate));
    assert_eq!(
        upload_certificate(&h.ctx(), &group).unwrap(),
        EditOutcome::Cancelled
    );
    assert!(h.prompter.errors()[0].contains("is not a file"));
}

#[test]
fn delete_certificate_removes_by_key_id() {
    let mut a = app("a", "apple");
    a.key_credentials = Some(vec![
        KeyCredential {
            key_id: Some("k1".to_string()),
            display_name: Some("CN=one".to_string()),
            ..KeyCredential::default()
        },
        KeyCredential {
            key_id: Some("k2".to_string()),
            display_name: Some("CN=two".to_string()),
            ..KeyCredential::default()
        },
    ]);
    let h = Harness::new(vec![a]).answers([Answer::Confirm(true)]);
    let node = h.child(
        "a",
        NodeKind::CredentialGroup(CredentialKind::Certificate),
        |n| n.label == "CN=one",
    );
    delete_certificate(&h.ctx(), &node).unwrap();
    let left: Vec<Option<String>> = h
        .fake
        .app("a")
        .certificates()
        .iter()
        .map(|k| k.key_id.clone())
        .collect();
    assert_eq!(left, [Some("k2".to_string())]);
}
