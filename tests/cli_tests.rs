use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Copy a fixture into a fresh directory so config discovery only sees what the test writes.
fn workspace(name: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join(name);
    fs::copy(fixture(name), &dest).unwrap();
    (dir, dest)
}

fn run(args: &[&str], envs: &[(&str, &Path)]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_protoc-gen-grpc-agent"));
    cmd.args(args).env_remove("GRPC_AGENT_GOFMT_BIN");
    for (key, value) in envs {
        cmd.env(key, value);
    }
    cmd.output().expect("run cli")
}

#[test]
fn test_cli_generate_writes_agent_source() {
    let (dir, descriptor) = workspace("echo.yaml");
    let out = dir.path().join("gen");
    let output = run(
        &[
            "generate",
            "--descriptor",
            descriptor.to_str().unwrap(),
            "--out",
            out.to_str().unwrap(),
        ],
        &[],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let generated = out.join("echo").join("v1").join("echo.pb.agent.go");
    let content = fs::read_to_string(generated).unwrap();
    assert!(content.contains("func EchoClientAgent(client interface{}"));
}

#[test]
fn test_cli_dry_run_writes_nothing() {
    let (dir, descriptor) = workspace("echo.yaml");
    let out = dir.path().join("gen");
    let output = run(
        &[
            "generate",
            "-d",
            descriptor.to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
            "--dry-run",
        ],
        &[],
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("echo.pb.agent.go"), "{stdout}");
    assert!(!out.exists());
}

#[test]
fn test_cli_config_file_and_flag_override() {
    let (dir, descriptor) = workspace("echo.yaml");
    fs::write(
        dir.path().join("grpc-agent.toml"),
        "register_func_suffix = \"FromFile\"\n",
    )
    .unwrap();
    let out = dir.path().join("gen");
    let generated = out.join("echo").join("v1").join("echo.pb.agent.go");

    let base = [
        "generate",
        "-d",
        descriptor.to_str().unwrap(),
        "-o",
        out.to_str().unwrap(),
    ];
    assert!(run(&base, &[]).status.success());
    assert!(fs::read_to_string(&generated)
        .unwrap()
        .contains("func EchoClientAgentFromFile("));

    let mut with_flag = base.to_vec();
    with_flag.extend(["--register-func-suffix", "V2"]);
    assert!(run(&with_flag, &[]).status.success());
    assert!(fs::read_to_string(&generated)
        .unwrap()
        .contains("func EchoClientAgentV2("));
}

#[test]
fn test_cli_generate_aborts_on_lint_errors() {
    let (dir, descriptor) = workspace("broken.yaml");
    let out = dir.path().join("gen");
    let args = [
        "generate",
        "-d",
        descriptor.to_str().unwrap(),
        "-o",
        out.to_str().unwrap(),
    ];
    let output = run(&args, &[]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("unknown_message_type"));
    assert!(!out.exists());

    let mut skipped = args.to_vec();
    skipped.push("--skip-lint");
    assert!(run(&skipped, &[]).status.success());
    assert!(out.join("broken.pb.agent.go").exists());
}

#[test]
fn test_cli_lint_fail_on_error() {
    let broken = fixture("broken.yaml");
    let output = run(&["lint", "-d", broken.to_str().unwrap()], &[]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Lint Results"));

    let output = run(
        &["lint", "-d", broken.to_str().unwrap(), "--fail-on-error"],
        &[],
    );
    assert!(!output.status.success());

    let echo = fixture("echo.yaml");
    let output = run(
        &["lint", "-d", echo.to_str().unwrap(), "--fail-on-error", "--errors-only"],
        &[],
    );
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("No lint issues found"));
}

#[test]
fn test_cli_format_uses_gofmt_override() {
    let (dir, descriptor) = workspace("echo.yaml");
    let stub = dir.path().join("gofmt");
    fs::write(&stub, "#!/bin/sh\necho '// formatted'\ncat\n").unwrap();
    let mut perms = fs::metadata(&stub).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&stub, perms).unwrap();

    let out = dir.path().join("gen");
    let output = run(
        &[
            "generate",
            "-d",
            descriptor.to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
            "--format",
        ],
        &[("GRPC_AGENT_GOFMT_BIN", stub.as_path())],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let content =
        fs::read_to_string(out.join("echo").join("v1").join("echo.pb.agent.go")).unwrap();
    assert!(content.starts_with("// formatted\n"));
}

#[test]
fn test_cli_rejects_source_names_outside_out_dir() {
    let dir = TempDir::new().unwrap();
    let escape = dir.path().join("escape").join("echo.proto");
    let out = dir.path().join("gen");
    let echo = fs::read_to_string(fixture("echo.yaml")).unwrap();

    for name in [escape.to_str().unwrap(), "../escape/echo.proto"] {
        let descriptor = dir.path().join("named.yaml");
        fs::write(
            &descriptor,
            echo.replacen("name: echo/v1/echo.proto", &format!("name: {name}"), 1),
        )
        .unwrap();
        let output = run(
            &[
                "generate",
                "-d",
                descriptor.to_str().unwrap(),
                "-o",
                out.to_str().unwrap(),
            ],
            &[],
        );
        assert!(!output.status.success(), "{name} was accepted");
        assert!(String::from_utf8_lossy(&output.stderr).contains("escapes the output directory"));
    }
    assert!(!dir.path().join("escape").exists());
    assert!(!out.exists());
}
