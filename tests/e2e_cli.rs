
use std::fs;
use std::path::PathBuf;

use tempfile::tempdir;

use support_server::{run_smokesweep, spawn_http_server_or_skip};

fn write_suite(dir: &tempfile::TempDir, url: &str, endpoints: &str) -> Result<PathBuf, String> {
    let path = dir.path().join("suite.yaml");
    let content = format!("url: \"{}\"\nendpoints:\n{}", url, endpoints);
    fs::write(&path, content).map_err(|err| format!("write suite failed: {}", err))?;
    Ok(path)
}

fn describe(output: &std::process::Output) -> String {
    format!(
        "stdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

#[test]
fn e2e_run_passing_suite() -> Result<(), String> {
    let Some((url, _server)) = spawn_http_server_or_skip()? else {
        return Ok(());
    };
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let suite = write_suite(
        &dir,
        &url,
        "  - path: /health\n    expected-status: 200\n  - path: /status/204\n    expected-status: 204\n",
    )?;

    let output = run_smokesweep(["--no-color".into(), "run".into(), suite.into_os_string()])?;
    if !output.status.success() {
        return Err(describe(&output));
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.contains("[SUCCESS]") || !stdout.contains("2/2 checks passed") {
        return Err(describe(&output));
    }
    Ok(())
}

#[test]
fn e2e_run_failing_suite_exits_non_zero() -> Result<(), String> {
    let Some((url, _server)) = spawn_http_server_or_skip()? else {
        return Ok(());
    };
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let suite = write_suite(
        &dir,
        &url,
        "  - path: /status/500\n    expected-status: 200\n",
    )?;

    let output = run_smokesweep(["--no-color".into(), "run".into(), suite.into_os_string()])?;
    if output.status.success() {
        return Err(describe(&output));
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.contains("[FAILED]") {
        return Err(describe(&output));
    }
    Ok(())
}

#[test]
fn e2e_run_prints_unreachable_targets() -> Result<(), String> {
    let Some((url, _server)) = spawn_http_server_or_skip()? else {
        return Ok(());
    };
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let suite = write_suite(
        &dir,
        &url,
        "  - path: /ok\n    expected-status: 200\n  - path: /drop\n    expected-status: 200\n",
    )?;

    let output = run_smokesweep(["--no-color".into(), "run".into(), suite.into_os_string()])?;
    if output.status.success() {
        return Err(describe(&output));
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    let unreachable_line = format!("[UNREACHABLE] Failed to reach target {}/drop", url);
    if !stdout.contains(&unreachable_line)
        || !stdout.contains("1/1 checks passed")
        || !stdout.contains("1 unreachable targets left out of the report")
    {
        return Err(describe(&output));
    }
    Ok(())
}

#[test]
fn e2e_run_fail_fast_reports_error() -> Result<(), String> {
    let Some((url, _server)) = spawn_http_server_or_skip()? else {
        return Ok(());
    };
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let suite = write_suite(
        &dir,
        &url,
        "  - path: /status/404\n    expected-status: 200\n",
    )?;

    let output = run_smokesweep([
        "--no-color".into(),
        "run".into(),
        suite.into_os_string(),
        "--fail-fast".into(),
    ])?;
    if output.status.success() {
        return Err(describe(&output));
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.contains("expected HTTP 200 but got 404") {
        return Err(describe(&output));
    }
    Ok(())
}

#[test]
fn e2e_ping_live_target() -> Result<(), String> {
    let Some((url, _server)) = spawn_http_server_or_skip()? else {
        return Ok(());
    };
    let output = run_smokesweep(["--no-color", "ping", url.as_str(), "--timeout", "2s"])?;
    if !output.status.success() {
        return Err(describe(&output));
    }
    if !String::from_utf8_lossy(&output.stdout).contains("[LIVE]") {
        return Err(describe(&output));
    }
    Ok(())
}

#[test]
fn e2e_init_writes_loadable_suite() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("starter.toml");

    let output = run_smokesweep(["init".into(), path.clone().into_os_string()])?;
    if !output.status.success() {
        return Err(describe(&output));
    }
    let content = fs::read_to_string(&path).map_err(|err| format!("read failed: {}", err))?;
    if !content.contains("expected-status") {
        return Err(format!("unexpected starter content: {}", content));
    }

    let again = run_smokesweep(["init".into(), path.into_os_string()])?;
    if again.status.success() {
        return Err("init overwrote an existing file without --force".to_owned());
    }
    Ok(())
}
