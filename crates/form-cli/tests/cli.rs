use assert_cmd::Command;
use assert_fs::prelude::*;
use serde_json::{Value, json};

const DOCUMENT: &str = r#"{
  "id": "contact",
  "title": "Contact",
  "blocks": [
    { "id": "email", "type": "email", "content": "Email", "required": true },
    { "id": "topic", "type": "dropdown", "options": ["Sales", "Support"], "required": true },
    { "id": "break", "type": "page-break" },
    {
      "id": "ticket",
      "type": "short-answer",
      "content": "Ticket number",
      "required": true,
      "conditionalRules": [
        { "fieldId": "topic", "operator": "equals", "value": "support", "action": "show" }
      ]
    }
  ]
}"#;

fn workspace(answers: Value) -> (assert_fs::TempDir, String, String) {
    let temp = assert_fs::TempDir::new().unwrap();
    let document = temp.child("document.json");
    document.write_str(DOCUMENT).unwrap();
    let answers_file = temp.child("answers.json");
    answers_file.write_str(&answers.to_string()).unwrap();
    let document_path = document.path().display().to_string();
    let answers_path = answers_file.path().display().to_string();
    (temp, document_path, answers_path)
}

fn formkit() -> Command {
    Command::cargo_bin("formkit").unwrap()
}

#[test]
fn validate_accepts_complete_answers() {
    let (_temp, document, answers) = workspace(json!({ "email": "a@b.com", "topic": "Sales" }));
    let output = formkit()
        .args(["validate", "--document", &document, "--answers", &answers])
        .output()
        .unwrap();
    assert!(output.status.success());
    let outcome: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(outcome["isValid"], json!(true));
    assert_eq!(outcome["errors"], json!({}));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Validation result: valid"));
}

#[test]
fn validate_reports_visible_errors() {
    let (_temp, document, answers) = workspace(json!({ "email": "nope", "topic": "Support" }));
    let output = formkit()
        .args(["validate", "--document", &document, "--answers", &answers])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let outcome: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(outcome["isValid"], json!(false));
    assert_eq!(outcome["errors"]["email"], "Enter a valid email.");
    assert_eq!(outcome["errors"]["ticket"], "This field is required.");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("email (Email) - Enter a valid email."));
    assert!(stderr.contains("ticket (Ticket number) - This field is required."));
}

#[test]
fn validate_single_page() {
    let (_temp, document, answers) = workspace(json!({ "email": "a@b.com", "topic": "Support" }));
    formkit()
        .args(["validate", "--document", &document, "--answers", &answers, "--page", "0"])
        .assert()
        .success();
    formkit()
        .args(["validate", "--document", &document, "--answers", &answers, "--page", "1"])
        .assert()
        .failure();
}

#[test]
fn schema_answers_flag_needs_a_document() {
    let (_temp, _document, answers) = workspace(json!({}));
    formkit()
        .args(["schema", "--answers", &answers])
        .assert()
        .failure();
}

#[test]
fn visibility_prints_block_states() {
    let (_temp, document, answers) = workspace(json!({ "topic": "Sales" }));
    let output = formkit()
        .args(["visibility", "--document", &document, "--answers", &answers])
        .output()
        .unwrap();
    assert!(output.status.success());
    let states: Value = serde_json::from_slice(&output.stdout).unwrap();
    let ticket = states
        .as_array()
        .unwrap()
        .iter()
        .find(|state| state["id"] == "ticket")
        .unwrap();
    assert_eq!(ticket["visible"], json!(false));
}

#[test]
fn pages_lists_labels() {
    let (_temp, document, _answers) = workspace(json!({}));
    let output = formkit()
        .args(["pages", "--document", &document])
        .output()
        .unwrap();
    assert!(output.status.success());
    let pages: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(pages.as_array().unwrap().len(), 2);
    assert_eq!(pages[0]["blocks"][1]["label"], "Question");
    assert_eq!(pages[1]["blocks"][0]["type"], "short-answer");
}

#[test]
fn lint_flags_dangling_rules() {
    let temp = assert_fs::TempDir::new().unwrap();
    let document = temp.child("document.json");
    document
        .write_str(
            r#"[{ "id": "q", "type": "number",
                 "conditionalRules": [{ "fieldId": "gone", "operator": "is_empty", "action": "hide" }] }]"#,
        )
        .unwrap();
    let output = formkit()
        .args(["lint", "--document", &document.path().display().to_string()])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("references missing block 'gone'"));
}

#[test]
fn schema_prints_answers_schema() {
    let (_temp, document, answers) = workspace(json!({ "topic": "Support" }));
    let output = formkit()
        .args(["schema", "--answers-for", &document, "--answers", &answers])
        .output()
        .unwrap();
    assert!(output.status.success());
    let schema: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(schema["properties"].get("ticket").is_some());
    assert_eq!(schema["properties"]["topic"]["enum"], json!(["Sales", "Support"]));
}
