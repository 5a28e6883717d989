use std::{env, fs, path::PathBuf, process::Command};

fn run_bin(args: &[&str]) -> bool {
    let bin = PathBuf::from(env!("CARGO_BIN_EXE_bizproj"));

    let output = Command::new(bin)
        .args(args)
        .output()
        .expect("failed to execute command");

    if !output.status.success() {
        let stdout_str = String::from_utf8_lossy(&output.stdout);
        let stderr_str = String::from_utf8_lossy(&output.stderr);
        eprintln!("{args:?} failed\nstdout:\n{stdout_str}\nstderr:\n{stderr_str}\n");
    }
    output.status.success()
}

fn fresh_dir(name: &str) -> PathBuf {
    let test_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);
    fs::remove_dir_all(&test_dir).ok();
    fs::create_dir(&test_dir).expect("failed to create test directory");
    test_dir
}

#[test]
fn basic_workflow() {
    let test_dir = fresh_dir("basic_workflow");
    let dir = test_dir
        .to_str()
        .expect("failed to convert test directory to string");

    assert!(run_bin(&["--project-dir", dir, "init"]));
    assert!(test_dir.join("params.json").is_file());

    // A second init must not clobber the snapshot.
    assert!(!run_bin(&["--project-dir", dir, "init"]));

    assert!(run_bin(&["--project-dir", dir, "run", "--years", "3"]));

    let monthly = fs::read_to_string(test_dir.join("monthly.csv")).expect("missing monthly.csv");
    assert_eq!(monthly.lines().count(), 1 + 36);
    let annual = fs::read_to_string(test_dir.join("annual.csv")).expect("missing annual.csv");
    assert_eq!(annual.lines().count(), 1 + 3);
    assert!(test_dir.join("projection.msgpack").is_file());

    assert!(run_bin(&["--project-dir", dir, "summary"]));

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn toml_params_take_precedence() {
    let test_dir = fresh_dir("toml_params");
    let dir = test_dir
        .to_str()
        .expect("failed to convert test directory to string");

    let params = String::new()
        + "[robot]\n"
        + "num_types = 1\n"
        + "\n"
        + "[[robot.items]]\n"
        + "name = \"Solo\"\n"
        + "price = 230000\n"
        + "commission_rate = 10.0\n"
        + "purchase_rate = 0.03\n"
        + "release_month = 0\n"
        + "\n"
        + "[app]\n"
        + "monthly_fee = 300\n"
        + "free_months = 3\n"
        + "churn_rate = 0.03\n"
        + "\n"
        + "[dealer]\n"
        + "initial_companies = 1\n"
        + "max_companies = 10\n"
        + "fixed_months_before_growth = 6\n"
        + "company_growth_per_month = 1\n";
    fs::write(test_dir.join("params.toml"), params).expect("failed to write params.toml");
    fs::write(test_dir.join("params.json"), "not json").expect("failed to write params.json");

    assert!(run_bin(&["--project-dir", dir, "run", "--years", "1"]));

    let monthly = fs::read_to_string(test_dir.join("monthly.csv")).expect("missing monthly.csv");
    let header = monthly.lines().next().expect("empty monthly.csv");
    assert!(header.contains("units_Solo"));

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn invalid_params_fail() {
    let test_dir = fresh_dir("invalid_params");
    let dir = test_dir
        .to_str()
        .expect("failed to convert test directory to string");

    let params = r#"{
        "robot": {"items": []},
        "app": {"monthly_fee": 300, "free_months": 3, "churn_rate": 0.03},
        "labor": {"fte_increment_users": 0}
    }"#;
    fs::write(test_dir.join("params.json"), params).expect("failed to write params.json");

    assert!(!run_bin(&["--project-dir", dir, "run"]));
    assert!(!run_bin(&["--project-dir", dir, "summary"]));
    assert!(!run_bin(&["--project-dir", dir, "run", "--years", "11"]));

    fs::remove_dir_all(&test_dir).ok();
}
