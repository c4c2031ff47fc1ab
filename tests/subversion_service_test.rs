//! Tests for the Subversion session against a recording command runner
#![cfg(unix)]

use std::io;
use std::os::unix::process::ExitStatusExt;
use std::process::{ExitStatus, Output};
use std::sync::{Arc, Mutex};

use rsvn::application::ApplicationError;
use rsvn::config::Settings;
use rsvn::domain::{GlobalOptions, Revision, Subcommand};
use rsvn::infrastructure::di::ServiceContainer;
use rsvn::infrastructure::traits::CommandRunner;
use rsvn::util::testing;
use rsvn::{CallArguments, Subversion};

/// Mock runner that records every invocation and replies with canned output
struct MockCommandRunner {
    calls: Mutex<Vec<(String, Vec<String>)>>,
    exit_code: i32,
    stdout: String,
    stderr: String,
    spawn_fails: bool,
}

impl MockCommandRunner {
    fn succeeding(stdout: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            exit_code: 0,
            stdout: stdout.to_string(),
            stderr: String::new(),
            spawn_fails: false,
        }
    }

    fn failing(exit_code: i32, stderr: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            exit_code,
            stdout: "partial output".to_string(),
            stderr: stderr.to_string(),
            spawn_fails: false,
        }
    }

    fn unspawnable() -> Self {
        Self {
            spawn_fails: true,
            ..Self::succeeding("")
        }
    }

    fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }

    fn last_argv(&self) -> Vec<String> {
        self.calls().last().expect("no svn call recorded").1.clone()
    }
}

impl CommandRunner for MockCommandRunner {
    fn run(&self, cmd: &str, args: &[&str]) -> io::Result<Output> {
        self.calls.lock().unwrap().push((
            cmd.to_string(),
            args.iter().map(|s| s.to_string()).collect(),
        ));
        if self.spawn_fails {
            return Err(io::Error::new(io::ErrorKind::NotFound, "svn: not found"));
        }
        Ok(Output {
            status: ExitStatus::from_raw(self.exit_code << 8),
            stdout: self.stdout.clone().into_bytes(),
            stderr: self.stderr.clone().into_bytes(),
        })
    }
}

fn session(mock: &Arc<MockCommandRunner>) -> Subversion {
    testing::init_test_setup();
    Subversion::with_runner(
        mock.clone(),
        "svn",
        GlobalOptions::with_credentials("u", "p"),
    )
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn contains_pair(argv: &[String], flag: &str, value: &str) -> bool {
    argv.windows(2).any(|w| w[0] == flag && w[1] == value)
}

fn contains_run(argv: &[String], run: &[&str]) -> bool {
    argv.windows(run.len()).any(|w| w == run)
}

// ============================================================
// dispatch
// ============================================================

#[test]
fn given_successful_process_when_invoke_then_returns_stdout() {
    // Arrange
    let mock = Arc::new(MockCommandRunner::succeeding("Path: Doc\n"));
    let svn = session(&mock);

    // Act
    let text = svn.info("./Doc", None).unwrap();

    // Assert
    assert_eq!(text, "Path: Doc\n");
}

#[test]
fn given_failing_process_when_invoke_then_returns_stderr() {
    // Arrange
    let mock = Arc::new(MockCommandRunner::failing(
        1,
        "svn: E155007: '/tmp/x' is not a working copy\n",
    ));
    let svn = session(&mock);

    // Act
    let text = svn.info("/tmp/x", None).unwrap();

    // Assert
    assert_eq!(text, "svn: E155007: '/tmp/x' is not a working copy\n");
}

#[test]
fn given_failing_process_when_run_then_reports_exit_code_and_both_streams() {
    let mock = Arc::new(MockCommandRunner::failing(1, "boom"));
    let svn = session(&mock);

    let output = svn
        .run(Subcommand::Cleanup, CallArguments::from("./Doc"))
        .unwrap();

    assert!(!output.success);
    assert_eq!(output.exit_code, Some(1));
    assert_eq!(output.stdout, "partial output");
    assert_eq!(output.stderr, "boom");
}

#[test]
fn given_missing_executable_when_invoke_then_operation_failed() {
    let mock = Arc::new(MockCommandRunner::unspawnable());
    let svn = session(&mock);

    let result = svn.list("./Doc");

    assert!(matches!(
        result,
        Err(ApplicationError::OperationFailed { .. })
    ));
}

#[test]
fn given_any_call_when_invoke_then_subcommand_first_and_executable_used() {
    let mock = Arc::new(MockCommandRunner::succeeding(""));
    let svn = Subversion::with_runner(mock.clone(), "/opt/svn/bin/svn", GlobalOptions::default());

    svn.cleanup("./Doc").unwrap();

    let calls = mock.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "/opt/svn/bin/svn");
    assert_eq!(calls[0].1.first().map(String::as_str), Some("cleanup"));
    assert_eq!(calls[0].1.last().map(String::as_str), Some("./Doc"));
}

#[test]
fn given_credentials_when_every_operation_then_username_and_password_sent() {
    let mock = Arc::new(MockCommandRunner::succeeding(""));
    let svn = session(&mock);
    let paths = strings(&["a.txt"]);
    let old = Revision::from(1u64);

    svn.checkout("https://svn.example.com/repo", None, None).unwrap();
    svn.add("a.txt").unwrap();
    svn.commit(&paths, "msg").unwrap();
    svn.cat("a.txt", None).unwrap();
    svn.info("a.txt", None).unwrap();
    svn.update(&paths, None).unwrap();
    svn.log(&paths, None).unwrap();
    svn.diff("a.txt", false, &old, None).unwrap();
    svn.list("a.txt").unwrap();
    svn.cleanup(".").unwrap();

    let calls = mock.calls();
    assert_eq!(calls.len(), Subcommand::ALL.len());
    for ((_, argv), subcommand) in calls.iter().zip(Subcommand::ALL) {
        assert_eq!(argv[0], subcommand.as_str());
        assert!(contains_pair(argv, "--username", "u"), "{:?}", argv);
        assert!(contains_pair(argv, "--password", "p"), "{:?}", argv);
        assert!(argv.contains(&"--non-interactive".to_string()));
    }
}

#[test]
fn given_session_when_with_credentials_then_original_unchanged() {
    let mock = Arc::new(MockCommandRunner::succeeding(""));
    let original = session(&mock);

    let other = original.with_credentials("v", "q");
    original.list(".").unwrap();
    other.list(".").unwrap();

    let calls = mock.calls();
    assert!(contains_pair(&calls[0].1, "--username", "u"));
    assert!(contains_pair(&calls[1].1, "--username", "v"));
    assert!(contains_pair(&calls[1].1, "--password", "q"));
    assert_eq!(original.options().username.as_deref(), Some("u"));
    assert_eq!(other.options().config_option, original.options().config_option);
}

#[test]
fn given_session_when_shared_across_threads_then_each_call_recorded() {
    let mock = Arc::new(MockCommandRunner::succeeding(""));
    let svn = session(&mock);

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let svn = svn.clone();
            std::thread::spawn(move || svn.cat(&format!("f{i}.txt"), None).unwrap())
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(mock.calls().len(), 4);
}

// ============================================================
// argument shapes
// ============================================================

#[test]
fn given_commit_when_invoke_then_message_precedes_paths_in_order() {
    let mock = Arc::new(MockCommandRunner::succeeding(""));
    let svn = session(&mock);

    svn.commit(&strings(&["a.txt", "b.txt"]), "msg").unwrap();

    let argv = mock.last_argv();
    assert!(contains_run(
        &argv,
        &["--force-log", "--message", "msg", "a.txt", "b.txt"]
    ));
    assert_eq!(argv.last().map(String::as_str), Some("b.txt"));
}

#[test]
fn given_no_paths_when_commit_then_svn_runs_with_message_last() {
    let mock = Arc::new(MockCommandRunner::succeeding("Committed revision 7."));
    let svn = session(&mock);

    let result = svn.commit(&[], "msg").unwrap();

    assert_eq!(result, "Committed revision 7.");
    assert_eq!(mock.calls().len(), 1);
    let argv = mock.last_argv();
    assert_eq!(argv[0], "commit");
    assert_eq!(&argv[argv.len() - 3..], &["--force-log", "--message", "msg"]);
}

#[test]
fn given_both_revisions_and_summarize_when_diff_then_contains_targets() {
    let mock = Arc::new(MockCommandRunner::succeeding(""));
    let svn = session(&mock);

    svn.diff(
        "./Doc",
        true,
        &Revision::from(100u64),
        Some(&Revision::from(101u64)),
    )
    .unwrap();

    let argv = mock.last_argv();
    assert!(argv.contains(&"--git".to_string()));
    assert!(contains_pair(&argv, "--old", "./Doc@100"));
    assert!(contains_pair(&argv, "--new", "./Doc@101"));
    assert!(argv.contains(&"--summarize".to_string()));
}

#[test]
fn given_no_new_revision_when_diff_then_new_target_is_bare_path() {
    let mock = Arc::new(MockCommandRunner::succeeding(""));
    let svn = session(&mock);

    svn.diff("./Doc", false, &Revision::from(52982u64), None)
        .unwrap();

    let argv = mock.last_argv();
    assert!(contains_pair(&argv, "--old", "./Doc@52982"));
    assert!(contains_pair(&argv, "--new", "./Doc"));
    assert!(!argv.contains(&"--summarize".to_string()));
}

#[test]
fn given_path_and_revision_when_checkout_then_url_path_revision() {
    let mock = Arc::new(MockCommandRunner::succeeding(""));
    let svn = session(&mock);

    svn.checkout(
        "https://svn.example.com/Project/MyProject",
        Some("Src"),
        Some(Revision::from(350_994u64)),
    )
    .unwrap();

    let argv = mock.last_argv();
    let tail = &argv[argv.len() - 4..];
    assert_eq!(
        tail,
        &[
            "https://svn.example.com/Project/MyProject",
            "Src",
            "--revision",
            "350994"
        ]
    );
}

#[test]
fn given_add_when_invoke_then_forced() {
    let mock = Arc::new(MockCommandRunner::succeeding(""));
    let svn = session(&mock);

    svn.add("./Doc/Readme.md").unwrap();

    let argv = mock.last_argv();
    assert_eq!(&argv[argv.len() - 2..], &["--force", "./Doc/Readme.md"]);
}

#[test]
fn given_revision_when_log_then_xml_revision_then_paths() {
    let mock = Arc::new(MockCommandRunner::succeeding("<log/>"));
    let svn = session(&mock);

    let text = svn
        .log(&strings(&["a", "b"]), Some(Revision::head()))
        .unwrap();

    assert_eq!(text, "<log/>");
    let argv = mock.last_argv();
    assert!(contains_run(&argv, &["--xml", "--revision", "HEAD", "a", "b"]));
}

#[test]
fn given_no_revision_when_update_then_only_paths_follow_global_options() {
    let mock = Arc::new(MockCommandRunner::succeeding(""));
    let svn = session(&mock);
    let global_len = svn.options().to_option_set().serialize().len();

    svn.update(&strings(&["./Doc/Readme.md", "./Doc/Readme.txt"]), None)
        .unwrap();

    let argv = mock.last_argv();
    assert_eq!(argv.len(), 1 + global_len + 2);
    assert_eq!(
        &argv[1 + global_len..],
        &["./Doc/Readme.md", "./Doc/Readme.txt"]
    );
    assert!(!argv.iter().any(|t| t.is_empty()));
}

#[test]
fn given_revision_when_cat_then_path_then_revision() {
    let mock = Arc::new(MockCommandRunner::succeeding("content"));
    let svn = session(&mock);

    svn.cat("./Doc/Readme.md", Some(Revision::from(52983u64)))
        .unwrap();

    let argv = mock.last_argv();
    assert!(contains_run(
        &argv,
        &["./Doc/Readme.md", "--revision", "52983"]
    ));
}

// ============================================================
// wiring
// ============================================================

#[test]
fn given_settings_when_container_builds_session_then_uses_configured_options() {
    let mock = Arc::new(MockCommandRunner::succeeding(""));
    let settings = Settings {
        executable: "svn-1.14".to_string(),
        username: Some("ci".to_string()),
        password: None,
        trust_server_cert: false,
        config_option: Some(String::new()),
        ..Settings::default()
    };
    let container = ServiceContainer::with_deps(settings, mock.clone());

    container.subversion().list("https://svn.example.com/repo").unwrap();

    let (cmd, argv) = mock.calls().remove(0);
    assert_eq!(cmd, "svn-1.14");
    assert!(contains_pair(&argv, "--username", "ci"));
    assert!(!argv.contains(&"--password".to_string()));
    assert!(!argv.contains(&"--trust-server-cert".to_string()));
    assert!(!argv.contains(&"--config-option".to_string()));
}
