use anyhow::Context;
use std::io::Write;
use std::process::{Command, Stdio};

/// Environment variable overriding the `gofmt` binary.
pub const GOFMT_BIN_ENV: &str = "GRPC_AGENT_GOFMT_BIN";

/// Run generated Go source through `gofmt` and return the formatted text.
pub fn format_source(source: &str) -> anyhow::Result<String> {
    // Allow tests to override the gofmt binary path without mutating PATH
    let gofmt_bin = std::env::var(GOFMT_BIN_ENV).unwrap_or_else(|_| "gofmt".to_string());

    let mut child = Command::new(&gofmt_bin)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("Failed to spawn {gofmt_bin}"))?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(source.as_bytes())
            .context("Failed to write generated source to gofmt")?;
    }
    let output = child
        .wait_with_output()
        .context("Failed to wait for gofmt")?;
    if !output.status.success() {
        anyhow::bail!(
            "gofmt failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    String::from_utf8(output.stdout).context("gofmt produced invalid UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::sync::{Mutex, OnceLock};

    // Serialize environment mutations to avoid test races
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn with_stub<F: FnOnce() -> R, R>(script: &str, f: F) -> R {
        let dir = tempfile::tempdir().unwrap();
        let stub = dir.path().join("gofmt");
        fs::write(&stub, script).unwrap();
        let mut perms = fs::metadata(&stub).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&stub, perms).unwrap();

        let _guard = ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        let old_bin = env::var(GOFMT_BIN_ENV).ok();
        env::set_var(GOFMT_BIN_ENV, &stub);
        let result = f();
        match old_bin {
            Some(v) => env::set_var(GOFMT_BIN_ENV, v),
            None => env::remove_var(GOFMT_BIN_ENV),
        }
        result
    }

    #[test]
    fn test_format_source_passthrough() {
        let out = with_stub("#!/bin/sh\ncat\n", || format_source("package x\n"));
        assert_eq!(out.unwrap(), "package x\n");
    }

    #[test]
    fn test_format_source_error() {
        let out = with_stub(
            "#!/bin/sh\ncat > /dev/null\necho 'expected declaration' >&2\nexit 2\n",
            || format_source("package x\nfunc {"),
        );
        let err = out.unwrap_err().to_string();
        assert!(err.contains("expected declaration"), "{err}");
    }
}
