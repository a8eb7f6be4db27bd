use std::{
    env,
    fs,
    path::{Path, PathBuf},
    process::Command,
};

use colored::*;
use regex::Regex;

fn remove_ansi_codes(s: &str) -> String {
    let re = Regex::new(r"\x1b\[[0-9;]*m").unwrap();
    re.replace_all(s, "").to_string()
}

fn main() {
    let filter_prefixes: Vec<String> = env::args().skip(1).collect();

    let luadef_exe = if cfg!(target_os = "windows") { "luadef.exe" } else { "luadef" };
    let target_path: PathBuf = env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|d| d.join(luadef_exe)))
        .unwrap_or_else(|| PathBuf::from(luadef_exe));

    if !target_path.exists() {
        eprintln!("{}", format!("Target executable not found: {} (build the 'luadef' binary first)", target_path.display()).red());
        std::process::exit(1);
    }

    let cases_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("cases");
    let entries = match fs::read_dir(&cases_dir) {
        Ok(entries) => entries,
        Err(err) => {
            eprintln!("{}", format!("Failed to read test directory '{}': {}", cases_dir.display(), err).red());
            std::process::exit(1);
        }
    };

    let mut test_entries: Vec<_> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().extension().map_or(false, |ext| ext == "lua"))
        .collect();

    test_entries.sort_by_key(|entry| {
        let binding = entry.file_name();
        let file_name = binding.to_string_lossy();
        file_name
            .split('_')
            .next()
            .and_then(|num_str| num_str.parse::<usize>().ok())
            .unwrap_or(0)
    });

    let mut passed = vec![];
    let mut failed = vec![];

    println!("{}", "luadef Test Runner".bold().underline().cyan());

    for entry in test_entries {
        let path = entry.path();
        let file_name = path.file_name().unwrap().to_string_lossy().to_string();

        if !filter_prefixes.is_empty()
            && !filter_prefixes.iter().any(|prefix| file_name.starts_with(&format!("{}_", prefix)))
        {
            continue;
        }

        print!("Running: {:<40} ... ", file_name);

        let expected_path = path.with_extension("expected");
        let expected = match fs::read_to_string(&expected_path) {
            Ok(s) => s,
            Err(e) => {
                println!("{}", "FAILED".red());
                failed.push((file_name, format!("Missing expected file '{}': {}", expected_path.display(), e)));
                continue;
            }
        };

        let out_path = env::temp_dir().join(format!("{}d", file_name));

        let output = Command::new(&target_path)
            .arg(&path)
            .arg("-q")
            .arg("--no-color")
            .arg("-o")
            .arg(&out_path)
            .output();

        match output {
            Ok(out) if out.status.success() => {
                let produced = fs::read_to_string(&out_path).unwrap_or_default();
                let _ = fs::remove_file(&out_path);

                if produced == expected {
                    println!("{}", "PASSED".green());
                    passed.push(file_name);
                } else {
                    println!("{}", "FAILED".red());
                    failed.push((
                        file_name,
                        format!("--- expected ---\n{}\n--- got ---\n{}", expected, produced),
                    ));
                }
            }
            Ok(out) => {
                println!("{}", "FAILED".red());
                let stderr = remove_ansi_codes(&String::from_utf8_lossy(&out.stderr));
                failed.push((file_name, format!("Exit code {:?}\n{}", out.status.code(), stderr)));
            }
            Err(err) => {
                println!("{}", format!("ERROR ({})", err).yellow());
                failed.push((file_name, format!("Failed to execute: {}", err)));
            }
        }
    }

    println!("\n{}", "──────────────────────────────────────".dimmed());
    println!("{}", "Test Summary".bold().purple());

    println!("{} {}", "Passed:".green(), passed.len());
    for test in &passed {
        println!("  {}", test.green());
    }

    println!("\n{} {}", "Failed:".red(), failed.len());
    for (test, _) in &failed {
        println!("{}", test.red());
    }
    for (test, details) in &failed {
        println!("\n{}", format!("--- {} ---", test).dimmed());
        println!("{}", details.yellow());
    }

    println!("{}", "──────────────────────────────────────".dimmed());

    if failed.is_empty() {
        println!("{}", "ALL TESTS PASSED".bold().on_green().black());
    } else {
        println!("{}", format!("{} test(s) failed.", failed.len()).bold().on_red().white());
        std::process::exit(1);
    }
}
