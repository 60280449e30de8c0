use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const CLEAN_REPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuites>
  <testsuite name="talker" tests="1" failures="0">
    <testcase id="haros_plugin_cpplint:whitespace" name="talker.cpp"/>
  </testsuite>
</testsuites>
"#;

pub const FAILING_REPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuites>
  <testsuite name="talker" tests="2" failures="2">
    <testcase id="haros_plugin_cppcheck:unusedVariable" name="talker.cpp:12">
      <failure type="warning">
Unused variable: count
Category: Code Quality
File: src/talker.cpp
Line: 12</failure>
    </testcase>
    <testcase id="haros_plugin_cpplint:readability" name="talker.cpp:30">
      <failure type="style">
Missing braces
Category: Formatting
File: src/talker.cpp
Line: 30</failure>
    </testcase>
  </testsuite>
</testsuites>
"#;

/// A ROS workspace with one package and a scripted stand-in for HAROS.
pub struct TestEnv {
    tmp: TempDir,
    pub workspace: PathBuf,
    pub cache: PathBuf,
    pub config: PathBuf,
}

impl TestEnv {
    /// `report` is what the fake analyzer writes as its xUnit output.
    /// `summary`, when set, is written as the project's `summary.json`.
    pub fn new(report: &str, summary: Option<&str>) -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let root = tmp.path();

        let workspace = root.join("ws");
        let package = workspace.join("src").join("talker");
        fs::create_dir_all(&package).expect("create package dir");
        fs::write(
            package.join("package.xml"),
            "<package format=\"3\"><name>talker</name><version>0.1.0</version></package>",
        )
        .expect("write package.xml");

        let cache = root.join("cache");
        fs::create_dir_all(&cache).expect("create cache dir");

        fs::write(root.join("report.xml"), report).expect("write canned report");
        let summary_file = root.join("summary.json");
        if let Some(summary) = summary {
            fs::write(&summary_file, summary).expect("write canned summary");
        }

        let script = root.join("fake_haros.sh");
        fs::write(&script, fake_haros(&root.join("report.xml"), summary.map(|_| summary_file.as_path())))
            .expect("write fake haros");

        let config = root.join("ament_haros.toml");
        fs::write(
            &config,
            format!("[analyzer]\ncommand = [\"sh\", '{}']\n", script.display()),
        )
        .expect("write config");

        Self {
            tmp,
            workspace,
            cache,
            config,
        }
    }

    pub fn root(&self) -> &Path {
        self.tmp.path()
    }

    pub fn package_dir(&self) -> PathBuf {
        self.workspace.join("src").join("talker")
    }

    /// Command preloaded with the fake analyzer config and the cache dir.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("ament-haros").expect("binary built");
        cmd.current_dir(self.root())
            .env_remove("AMENT_HAROS_BIN")
            .arg("--config")
            .arg(&self.config)
            .arg("--cache-dir")
            .arg(&self.cache);
        cmd
    }
}

fn fake_haros(report: &Path, summary: Option<&Path>) -> String {
    let copy_summary = summary
        .map(|s| format!("cp '{}' \"$data_dir/data/$name/summary.json\"\n", s.display()))
        .unwrap_or_default();

    format!(
        r#"while [ $# -gt 0 ]; do
  case "$1" in
    --project-file) project_file="$2"; shift ;;
    --data-dir) data_dir="$2"; shift ;;
  esac
  shift
done
name=$(basename "$project_file" .yaml)
mkdir -p "$data_dir/data/$name/compliance"
echo '<html></html>' > "$data_dir/index.html"
cp '{report}' "$data_dir/data/$name/compliance/$name.xml"
{copy_summary}"#,
        report = report.display(),
        copy_summary = copy_summary,
    )
}
