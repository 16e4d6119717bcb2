use serde_json::Value;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

const TEMPLATE_ID: &str = "426912bd-39b0-4daa-ad21-0c6933230b50";

const LEGACY_FLAVOR_PART: &str = r#"{
  "signed_flavors": [
    {
      "flavor": {
        "meta": {
          "vendor": "INTEL",
          "description": { "flavor_part": "PLATFORM", "tpm_version": "2.0" }
        },
        "pcrs": {
          "SHA256": { "pcr_0": { "value": "abc123" } }
        }
      },
      "signature": "c2lnbmF0dXJl"
    }
  ]
}"#;

const PLATFORM_TEMPLATE: &str = r#"{
  "id": "426912bd-39b0-4daa-ad21-0c6933230b50",
  "label": "default-platform",
  "condition": ["//host_info/tpm_version//*[text()='2.0']"],
  "flavor_parts": {
    "PLATFORM": {
      "pcr_rules": [
        { "pcr": { "index": 0, "bank": "SHA256" }, "pcr_matches": true }
      ]
    }
  }
}"#;

struct TempDirGuard {
    path: PathBuf,
}

impl TempDirGuard {
    fn new(prefix: &str) -> Self {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "flavor-migrate-cli-{prefix}-{}-{unique}",
            std::process::id()
        ));
        fs::create_dir_all(&path).expect("temp dir should be created");
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDirGuard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Lays out `legacy.json` and a `templates/` library under `root`.
fn write_workspace(root: &Path, templates: &[(&str, &str)]) -> (PathBuf, PathBuf) {
    let input = root.join("legacy.json");
    fs::write(&input, LEGACY_FLAVOR_PART).expect("legacy flavor part should write");

    let template_dir = root.join("templates");
    fs::create_dir_all(&template_dir).expect("template dir should be created");
    for (name, body) in templates {
        fs::write(template_dir.join(name), body).expect("template should write");
    }
    (input, template_dir)
}

fn run_flavor_migrate<I, S>(args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    run_flavor_migrate_logged(args, "off")
}

fn run_flavor_migrate_logged<I, S>(args: I, log_filter: &str) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = env!("CARGO_BIN_EXE_flavor-migrate");
    Command::new(bin)
        .args(args)
        .env("RUST_LOG", log_filter)
        .output()
        .expect("flavor-migrate command should execute")
}

fn assert_success(output: &Output) {
    if !output.status.success() {
        panic!(
            "command failed with status {:?}\nstdout:\n{}\nstderr:\n{}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn parse_json_stdout(output: &Output) -> Value {
    serde_json::from_slice::<Value>(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout should be valid json: {e}\nstdout:\n{}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

#[test]
fn convert_prints_and_writes_collection() {
    let tmp = TempDirGuard::new("convert");
    let (input, template_dir) =
        write_workspace(tmp.path(), &[("default-platform.json", PLATFORM_TEMPLATE)]);
    let output_path = tmp.path().join("out").join("newflavorpart.json");

    let output = run_flavor_migrate([
        OsStr::new("convert"),
        input.as_os_str(),
        OsStr::new("--template-dir"),
        template_dir.as_os_str(),
        OsStr::new("--output"),
        output_path.as_os_str(),
    ]);
    assert_success(&output);

    let printed = parse_json_stdout(&output);
    let written: Value = serde_json::from_slice(
        &fs::read(&output_path).expect("output file should be written"),
    )
    .expect("output file should be valid json");
    assert_eq!(printed, written);

    let flavor = &printed[0]["flavor"];
    assert_eq!(printed[0]["signature"], "");
    assert!(flavor.get("pcrs").is_none());
    assert_eq!(
        flavor["meta"]["description"]["flavor_template_ids"],
        serde_json::json!([TEMPLATE_ID])
    );
    assert_eq!(flavor["pcr_logs"][0]["measurement"], "abc123");
    assert_eq!(flavor["pcr_logs"][0]["pcr"]["bank"], "SHA256");
}

#[test]
fn convert_no_write_quiet_produces_nothing() {
    let tmp = TempDirGuard::new("quiet");
    let (input, template_dir) =
        write_workspace(tmp.path(), &[("default-platform.json", PLATFORM_TEMPLATE)]);
    let output_path = tmp.path().join("newflavorpart.json");

    let output = run_flavor_migrate([
        OsStr::new("convert"),
        input.as_os_str(),
        OsStr::new("--template-dir"),
        template_dir.as_os_str(),
        OsStr::new("--output"),
        output_path.as_os_str(),
        OsStr::new("--no-write"),
        OsStr::new("--quiet"),
    ]);
    assert_success(&output);
    assert!(output.stdout.is_empty());
    assert!(!output_path.exists());
}

#[test]
fn convert_logs_completion_once_at_info() {
    let tmp = TempDirGuard::new("logging");
    let (input, template_dir) =
        write_workspace(tmp.path(), &[("default-platform.json", PLATFORM_TEMPLATE)]);

    let output = run_flavor_migrate_logged(
        [
            OsStr::new("convert"),
            input.as_os_str(),
            OsStr::new("--template-dir"),
            template_dir.as_os_str(),
            OsStr::new("--no-write"),
            OsStr::new("--quiet"),
        ],
        "info",
    );
    assert_success(&output);

    let stderr = stderr_text(&output);
    assert_eq!(
        stderr.matches("flavor part converted").count(),
        1,
        "stderr:\n{stderr}"
    );
    assert!(stderr.contains("legacy.json"));
}

#[test]
fn convert_reads_paths_from_config_file() {
    let tmp = TempDirGuard::new("config");
    let (input, template_dir) =
        write_workspace(tmp.path(), &[("default-platform.json", PLATFORM_TEMPLATE)]);
    let output_path = tmp.path().join("configured.json");
    let config_path = tmp.path().join("flavor-migrate.toml");
    fs::write(
        &config_path,
        format!(
            "template_dir = {:?}\noutput_path = {:?}\n",
            template_dir.display().to_string(),
            output_path.display().to_string()
        ),
    )
    .expect("config should write");

    let output = run_flavor_migrate([
        OsStr::new("convert"),
        input.as_os_str(),
        OsStr::new("--config"),
        config_path.as_os_str(),
        OsStr::new("--quiet"),
    ]);
    assert_success(&output);
    assert!(output_path.exists());
}

#[test]
fn convert_rejects_non_json_input() {
    let tmp = TempDirGuard::new("extension");
    let input = tmp.path().join("legacy.txt");
    fs::write(&input, LEGACY_FLAVOR_PART).expect("input should write");

    let output = run_flavor_migrate([
        OsStr::new("convert"),
        input.as_os_str(),
        OsStr::new("--no-write"),
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_text(&output).contains("is not json"));
}

#[test]
fn convert_rejects_missing_input() {
    let tmp = TempDirGuard::new("missing");
    let input = tmp.path().join("absent.json");

    let output = run_flavor_migrate([
        OsStr::new("convert"),
        input.as_os_str(),
        OsStr::new("--no-write"),
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_text(&output).contains("does not exist"));
}

#[test]
fn convert_fails_on_malformed_template() {
    let tmp = TempDirGuard::new("malformed");
    let (input, template_dir) = write_workspace(
        tmp.path(),
        &[
            ("default-platform.json", PLATFORM_TEMPLATE),
            ("broken.json", "{\"label\": "),
        ],
    );

    let output = run_flavor_migrate([
        OsStr::new("convert"),
        input.as_os_str(),
        OsStr::new("--template-dir"),
        template_dir.as_os_str(),
        OsStr::new("--no-write"),
    ]);
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert!(stderr_text(&output).contains("broken.json"));
}

#[test]
fn conditions_json_lists_every_mapping() {
    let output = run_flavor_migrate(["conditions", "--json"]);
    assert_success(&output);

    let payload = parse_json_stdout(&output);
    let rows = payload.as_array().expect("conditions should be an array");
    assert_eq!(rows.len(), 5);
    assert!(rows.iter().any(|row| {
        row["condition"] == "//host_info/vendor//*[text()='Linux']"
            && row["legacyQuery"] == "//meta/vendor//*[text()='INTEL']"
    }));
}
