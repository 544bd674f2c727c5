mod support;

use tempfile::TempDir;

fn write_config(base_url: &str) -> Result<(TempDir, String), String> {
    let dir = tempfile::tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("moya.toml");
    let content = format!(
        r#"
base_url = "{base_url}"
headers = ["X-Client: cli-test"]

[routes.zen]
path = "/zen"
description = "Fetch a proverb"
sample_data = "Stubbed wisdom."

[routes.echo]
path = "/echo/{{{{name}}}}"
parameters = {{ q = "{{{{query}}}}" }}

[routes.broken]
path = "/status/503"
validation = "success"
"#
    );
    std::fs::write(&path, content).map_err(|err| format!("write config failed: {}", err))?;
    Ok((dir, path.display().to_string()))
}

fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn route_body_is_printed() -> Result<(), String> {
    let server = support::spawn_http_server()?;
    let (_dir, config) = write_config(&server.url)?;

    let output = support::run_moya([
        "--config",
        config.as_str(),
        "zen",
    ])?;

    if !output.status.success() {
        return Err(format!(
            "moya failed: {}",
            String::from_utf8_lossy(&output.stderr)
        ));
    }
    if stdout_of(&output) != "Keep it logically awesome.\n" {
        return Err(format!("Unexpected stdout: {:?}", stdout_of(&output)));
    }
    Ok(())
}

#[test]
fn variables_and_headers_reach_the_server() -> Result<(), String> {
    let server = support::spawn_http_server()?;
    let (_dir, config) = write_config(&server.url)?;

    let output = support::run_moya([
        "--config",
        config.as_str(),
        "--var",
        "name=ash",
        "--var",
        "query=rust",
        "-H",
        "X-Extra: yes",
        "echo",
    ])?;

    if !output.status.success() {
        return Err(format!(
            "moya failed: {}",
            String::from_utf8_lossy(&output.stderr)
        ));
    }
    let echo: serde_json::Value = serde_json::from_slice(&output.stdout)
        .map_err(|err| format!("stdout was not JSON: {}", err))?;
    let field = |pointer: &str| {
        echo.pointer(pointer)
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_owned()
    };
    if field("/path") != "/echo/ash" || field("/query") != "q=rust" {
        return Err(format!("Unexpected echo: {}", echo));
    }
    if field("/headers/x-client") != "cli-test" || field("/headers/x-extra") != "yes" {
        return Err(format!("Missing headers: {}", echo));
    }
    Ok(())
}

#[test]
fn stub_flag_skips_the_network() -> Result<(), String> {
    let (_dir, config) = write_config("http://127.0.0.1:9")?;

    let output = support::run_moya([
        "--config",
        config.as_str(),
        "--stub",
        "zen",
    ])?;

    if !output.status.success() {
        return Err(format!(
            "moya failed: {}",
            String::from_utf8_lossy(&output.stderr)
        ));
    }
    if stdout_of(&output) != "Stubbed wisdom.\n" {
        return Err(format!("Unexpected stdout: {:?}", stdout_of(&output)));
    }
    Ok(())
}

#[test]
fn list_prints_every_route() -> Result<(), String> {
    let (_dir, config) = write_config("http://127.0.0.1:9")?;

    let output = support::run_moya(["--config", config.as_str(), "--list"])?;

    if !output.status.success() {
        return Err(format!(
            "moya failed: {}",
            String::from_utf8_lossy(&output.stderr)
        ));
    }
    let stdout = stdout_of(&output);
    for needle in ["broken\tGET /status/503", "echo\tGET", "zen\tGET /zen\tFetch a proverb"] {
        if !stdout.contains(needle) {
            return Err(format!("Missing '{}' in {:?}", needle, stdout));
        }
    }
    Ok(())
}

#[test]
fn unknown_route_fails() -> Result<(), String> {
    let (_dir, config) = write_config("http://127.0.0.1:9")?;

    let output = support::run_moya([
        "--config",
        config.as_str(),
        "missing",
    ])?;

    if output.status.success() {
        return Err("Expected failure for an unknown route".to_owned());
    }
    Ok(())
}

#[test]
fn rejected_status_fails() -> Result<(), String> {
    let server = support::spawn_http_server()?;
    let (_dir, config) = write_config(&server.url)?;

    let output = support::run_moya([
        "--config",
        config.as_str(),
        "broken",
    ])?;

    if output.status.success() {
        return Err("Expected failure for a 503 response".to_owned());
    }
    Ok(())
}
