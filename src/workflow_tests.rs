use super::{enrichment_target, generate, non_blank, GenerateOptions};
use crate::error::{DocumentWriteError, PipelineError};
use crate::github::ProjectSource;
use crate::model::{Project, ResumeData};
use crate::pdf::PdfEngine;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

const JANE_DOE_YAML: &str = r#"
personal_info:
  name: Jane Doe
  email: jane@example.com
  phone: "555 0100"
  location: Berlin
  social:
    github: https://github.com/janedoe
about:
  summary: Builds reliable systems.
experience:
  corporate:
    - company: Acme
      positions:
        - title: Staff Engineer
          duration: 2021 - Present
          location: Remote
          type: Full-time
          responsibilities: [R1, R2, R3, R4, R5, R6, R7, R8]
  other: []
"#;

#[derive(Default)]
struct RecordingSource {
    projects: Vec<Project>,
    calls: RefCell<Vec<String>>,
    tokens: RefCell<Vec<Option<String>>>,
}

impl ProjectSource for RecordingSource {
    fn fetch_projects(&self, identifier: &str, token: Option<&str>) -> Vec<Project> {
        self.calls.borrow_mut().push(identifier.to_string());
        self.tokens.borrow_mut().push(token.map(str::to_string));
        self.projects.clone()
    }
}

#[derive(Default)]
struct CapturingEngine {
    fail: bool,
    html: RefCell<Option<String>>,
}

impl PdfEngine for CapturingEngine {
    fn convert(&self, html_path: &Path, pdf_path: &Path) -> Result<(), DocumentWriteError> {
        let html = std::fs::read_to_string(html_path).expect("read staged html");
        *self.html.borrow_mut() = Some(html);
        if self.fail {
            return Err(DocumentWriteError::Conversion {
                engine: "capture".to_string(),
                detail: "refused".to_string(),
            });
        }
        std::fs::write(pdf_path, b"%PDF-1.7\n%%EOF\n").expect("write fake pdf");
        Ok(())
    }
}

impl CapturingEngine {
    fn rendered(&self) -> String {
        self.html.borrow().clone().expect("engine was called")
    }
}

struct Workspace {
    _dir: tempfile::TempDir,
    options: GenerateOptions,
}

fn workspace(yaml: &str) -> Workspace {
    let dir = tempfile::tempdir().expect("create temp dir");
    let data_path = dir.path().join("resume_data.yaml");
    std::fs::write(&data_path, yaml).expect("write resume data");
    let options = GenerateOptions {
        data_path,
        out_path: dir.path().join("html").join("cv.pdf"),
        skip_enrichment: false,
        github_token: None,
    };
    Workspace { _dir: dir, options }
}

fn project(name: &str) -> Project {
    Project {
        name: name.to_string(),
        language: "Rust".to_string(),
        stars: 3,
        ..Project::default()
    }
}

#[test]
fn jane_doe_job_lists_first_six_responsibilities() {
    let ws = workspace(JANE_DOE_YAML);
    let engine = CapturingEngine::default();

    let report = generate(&ws.options, &RecordingSource::default(), &engine).expect("generate");

    let html = engine.rendered();
    assert!(html.contains("<h1>Jane Doe</h1>"));
    assert_eq!(html.matches("<li>").count(), 6);
    assert!(html.contains("<li>R6</li>"));
    assert!(!html.contains("<li>R7</li>"));
    assert_eq!(report.output_path, ws.options.out_path);
    assert!(report.bytes_written > 0);
    assert!(ws.options.out_path.is_file());
}

#[test]
fn missing_projects_with_github_enriches_exactly_once() {
    let ws = workspace(JANE_DOE_YAML);
    let source = RecordingSource {
        projects: vec![project("first-tool"), project("second")],
        ..RecordingSource::default()
    };
    let engine = CapturingEngine::default();

    let report = generate(&ws.options, &source, &engine).expect("generate");

    assert_eq!(*source.calls.borrow(), ["https://github.com/janedoe"]);
    assert_eq!(report.projects_added, Some(2));
    let html = engine.rendered();
    assert!(html.contains("Featured Projects"));
    assert!(html.contains(">First-Tool</div>"));
}

#[test]
fn empty_enrichment_result_is_not_an_error() {
    let ws = workspace(JANE_DOE_YAML);
    let source = RecordingSource::default();
    let engine = CapturingEngine::default();

    let report = generate(&ws.options, &source, &engine).expect("generate");

    assert_eq!(source.calls.borrow().len(), 1);
    assert_eq!(report.projects_added, Some(0));
    assert!(!engine.rendered().contains("Featured Projects"));
}

#[test]
fn existing_projects_disable_enrichment_regardless_of_count() {
    let yaml = format!("{JANE_DOE_YAML}projects:\n  - name: only-one\n    stars: 1\n");
    let ws = workspace(&yaml);
    let source = RecordingSource {
        projects: vec![project("unused")],
        ..RecordingSource::default()
    };
    let engine = CapturingEngine::default();

    let report = generate(&ws.options, &source, &engine).expect("generate");

    assert!(source.calls.borrow().is_empty());
    assert_eq!(report.projects_added, None);
    let html = engine.rendered();
    assert!(html.contains(">Only-One</div>"));
    assert!(!html.contains("Unused"));
}

#[test]
fn empty_projects_without_github_skip_enrichment_and_section() {
    let ws = workspace("personal_info:\n  name: Jane Doe\nprojects: []\n");
    let source = RecordingSource {
        projects: vec![project("unused")],
        ..RecordingSource::default()
    };
    let engine = CapturingEngine::default();

    let report = generate(&ws.options, &source, &engine).expect("generate");

    assert!(source.calls.borrow().is_empty());
    assert_eq!(report.projects_added, None);
    assert!(!engine.rendered().contains("Featured Projects"));
}

#[test]
fn skip_enrichment_never_contacts_the_source() {
    let mut ws = workspace(JANE_DOE_YAML);
    ws.options.skip_enrichment = true;
    let source = RecordingSource {
        projects: vec![project("unused")],
        ..RecordingSource::default()
    };

    let report =
        generate(&ws.options, &source, &CapturingEngine::default()).expect("generate");

    assert!(source.calls.borrow().is_empty());
    assert_eq!(report.projects_added, None);
}

#[test]
fn load_failure_stops_before_enrichment_and_writing() {
    let ws = workspace(JANE_DOE_YAML);
    let options = GenerateOptions {
        data_path: PathBuf::from("/nonexistent/resume_data.yaml"),
        ..ws.options.clone()
    };
    let source = RecordingSource::default();
    let engine = CapturingEngine::default();

    let err = generate(&options, &source, &engine).expect_err("should fail");

    assert!(matches!(err, PipelineError::Load(_)), "got {err:?}");
    assert!(source.calls.borrow().is_empty());
    assert!(engine.html.borrow().is_none());
    assert!(!options.out_path.exists());
}

#[test]
fn write_failure_is_propagated() {
    let ws = workspace(JANE_DOE_YAML);
    let engine = CapturingEngine {
        fail: true,
        ..CapturingEngine::default()
    };

    let err = generate(&ws.options, &RecordingSource::default(), &engine)
        .expect_err("should fail");

    assert!(
        matches!(err, PipelineError::Write(DocumentWriteError::Conversion { .. })),
        "got {err:?}"
    );
    assert!(!ws.options.out_path.exists());
}

#[test]
fn enrichment_target_requires_identifier_and_no_projects() {
    let mut data = ResumeData::default();
    assert_eq!(enrichment_target(&data), None);

    data.personal_info.social.github = "   ".to_string();
    assert_eq!(enrichment_target(&data), None);

    data.personal_info.social.github = "janedoe".to_string();
    assert_eq!(enrichment_target(&data), Some("janedoe"));

    data.projects.push(Project::default());
    assert_eq!(enrichment_target(&data), None);
}

#[test]
fn github_token_is_forwarded_to_the_source() {
    let mut ws = workspace(JANE_DOE_YAML);
    ws.options.github_token = Some("ghp_secret".to_string());
    let source = RecordingSource::default();

    generate(&ws.options, &source, &CapturingEngine::default()).expect("generate");

    assert_eq!(*source.tokens.borrow(), [Some("ghp_secret".to_string())]);
}

#[test]
fn absent_token_reaches_the_source_as_none() {
    let ws = workspace(JANE_DOE_YAML);
    let source = RecordingSource::default();

    generate(&ws.options, &source, &CapturingEngine::default()).expect("generate");

    assert_eq!(*source.tokens.borrow(), [None]);
}

#[test]
fn blank_tokens_are_treated_as_absent() {
    assert_eq!(non_blank(None), None);
    assert_eq!(non_blank(Some(String::new())), None);
    assert_eq!(non_blank(Some("  \t".to_string())), None);
    assert_eq!(non_blank(Some("ghp_x".to_string())), Some("ghp_x".to_string()));
}
