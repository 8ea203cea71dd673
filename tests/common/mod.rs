// Shared test helpers for integration tests
#![allow(dead_code)]

use lazy_static::lazy_static;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

lazy_static! {
    /// The version axis used by most scenarios: the middle version is the
    /// one the scenarios force to fail.
    pub static ref DEFAULT_VERSIONS: Vec<&'static str> = vec!["2020", "2022", "2023"];
}

/// Which versions the stub engine forces to fail, per stage. Everything
/// not listed succeeds.
#[derive(Default)]
pub struct StubBehavior {
    pub fail_pull: Vec<&'static str>,
    pub fail_setup: Vec<&'static str>,
    pub fail_test: Vec<&'static str>,
    /// Versions whose test stage sleeps far past any sane cell timeout.
    pub hang_test: Vec<&'static str>,
}

/// Writes an executable shell script that mimics the docker CLI surface the
/// orchestrator drives: `image inspect`, `pull`, `run`, `exec`, `rm`.
/// Container names embed the version identifier, which is how the script
/// decides which cells to fail.
#[cfg(unix)]
pub fn write_stub_engine(dir: &Path, behavior: &StubBehavior) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let mut script = String::from(
        r#"#!/bin/sh
# Stub container engine: pretends to be a docker-compatible CLI.
case "$1" in
  image)
    # Nothing is ever cached locally; force the pull path.
    exit 1
    ;;
  pull)
"#,
    );

    script.push_str("    case \"$2\" in\n");
    for version in &behavior.fail_pull {
        writeln!(
            script,
            "      *:{version}) echo \"manifest for $2 not found\"; exit 1 ;;"
        )
        .unwrap();
    }
    script.push_str("      *) : ;;\n    esac\n    exit 0\n    ;;\n");

    script.push_str(
        r#"  run)
    echo "stub-container-id"
    exit 0
    ;;
  exec)
    name="$2"
    shift 2
    stage=test
    for arg in "$@"; do
      case "$arg" in
        ensurepip|pip) stage=setup ;;
      esac
    done
"#,
    );

    script.push_str("    if [ \"$stage\" = setup ]; then\n      case \"$name\" in\n");
    for version in &behavior.fail_setup {
        writeln!(
            script,
            "        maya-matrix-{version}-*) echo \"pip install failed\"; exit 1 ;;"
        )
        .unwrap();
    }
    script.push_str("        *) : ;;\n      esac\n    else\n      case \"$name\" in\n");
    for version in &behavior.hang_test {
        writeln!(script, "        maya-matrix-{version}-*) sleep 30 ;;").unwrap();
    }
    for version in &behavior.fail_test {
        writeln!(
            script,
            "        maya-matrix-{version}-*) echo \"1 test failed\"; exit 1 ;;"
        )
        .unwrap();
    }
    script.push_str(
        r#"        *) : ;;
      esac
    fi
    exit 0
    ;;
  rm)
    exit 0
    ;;
esac
exit 0
"#,
    );

    let path = dir.join("stub-engine.sh");
    fs::write(&path, script).expect("Failed to write stub engine");
    let mut perms = fs::metadata(&path).expect("Failed to stat stub engine").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("Failed to chmod stub engine");
    path
}

/// Writes a matrix configuration that points at the stub engine and uses
/// the temp directory itself as the mounted workspace.
pub fn write_matrix_config(dir: &Path, engine: &Path, versions: &[&str]) -> PathBuf {
    write_matrix_config_with_timeout(dir, engine, versions, 60)
}

/// Same as [`write_matrix_config`], with an explicit per-cell timeout.
pub fn write_matrix_config_with_timeout(
    dir: &Path,
    engine: &Path,
    versions: &[&str],
    timeout_secs: u64,
) -> PathBuf {
    let version_list = versions
        .iter()
        .map(|v| format!("\"{}\"", v))
        .collect::<Vec<_>>()
        .join(", ");

    let content = format!(
        r#"language = "en"
engine = "{engine}"
image = "stub/mayabase"
versions = [{version_list}]
workspace = "{workspace}"
timeout_secs = {timeout_secs}
"#,
        engine = engine.display(),
        workspace = dir.display(),
    );

    let path = dir.join("MayaMatrix.toml");
    fs::write(&path, content).expect("Failed to write matrix config");
    path
}
