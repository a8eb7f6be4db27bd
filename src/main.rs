use std::env as std_env;
use std::fs;
use std::panic;
use std::path::Path;
use std::process::exit;
use colored::*;

use luadef::env::runtime::config::{
    Config, create_config_file, default_config, get_config_path, load_config,
    load_config_or_default,
};
use luadef::env::runtime::errors::Error;
use luadef::env::runtime::preprocessor::Preprocessor;
use luadef::env::runtime::utils::{
    check_ansi, debug_log, eprint_colored, fix_path, get_line_info, hex_to_ansi, print_colored,
    read_input,
};

const VERSION: &str = env!("VERSION");
const RUSTC_VERSION: &str = env!("RUSTC_VERSION");
const RUSTC_CHANNEL: &str = env!("RUSTC_CHANNEL");
const TARGET_TRIPLE: &str = env!("TARGET_TRIPLE");
const PROFILE: &str = env!("PROFILE");
const BUILD_DATE: &str = env!("BUILD_DATE");

#[cold]
fn handle_error(error: &Error, source: &str, config: &Config) {
    let use_colors = config.supports_color;
    let color = hex_to_ansi(&config.color_scheme.exception, use_colors);
    let reset = hex_to_ansi("reset", use_colors);

    let Some(loc) = error.location() else {
        eprintln!("{}[err] {}: {}{}", color, error.error_type(), error.msg(), reset);
        return;
    };

    let file_name = fix_path(loc.file.clone());
    let line_number = loc.line_number;
    let col = loc.range.0.max(1);

    if line_number == 0 {
        eprintln!("{}-> File '{}' got error:", color, file_name);
    } else {
        eprintln!("{}-> File '{}:{}:{}' got error:", color, file_name, line_number, col);
    }

    let current_line = if loc.line_string.is_empty() {
        get_line_info(source, line_number).unwrap_or_default()
    } else {
        loc.line_string.clone()
    };

    let indent = " ".repeat(line_number.to_string().len());

    if current_line.is_empty() {
        eprintln!("\t{}: {}", error.error_type(), error.msg());
    } else {
        eprintln!("\t{} | {}", line_number, current_line);

        let (start, end) = loc.range;
        if end > start {
            let arrows: String = (1..=current_line.chars().count())
                .map(|i| if i >= start && i < end { '^' } else { '~' })
                .collect();
            eprintln!("\t{} | {}", indent, arrows);
        }

        eprintln!("\t{} | {}: {}", indent, error.error_type(), error.msg());
    }

    if let Some(help) = error.help() {
        if !help.is_empty() {
            eprintln!(
                "\t{}{}{}Help:{} {}",
                indent,
                hex_to_ansi(&config.color_scheme.help, use_colors),
                check_ansi("\x1b[1m", &use_colors),
                check_ansi("\x1b[22m", &use_colors),
                help
            );
        }
    }

    eprint!("{}", reset);
}

fn print_warning(warning: &Error, config: &Config) {
    let use_colors = config.supports_color;
    let color = hex_to_ansi(&config.color_scheme.warning, use_colors);
    let reset = hex_to_ansi("reset", use_colors);

    let location_str = warning.location().map_or("<unknown>".to_string(), |loc| {
        if loc.line_number == 0 {
            fix_path(loc.file.clone())
        } else {
            format!("{}:{}:{}", fix_path(loc.file.clone()), loc.line_number, loc.range.0.max(1))
        }
    });

    let help_msg = match warning.help() {
        Some(help) if !help.is_empty() => format!("   ({})", help),
        _ => String::new(),
    };

    eprintln!(
        "{}[warn] {} -> {}: {}{}{}",
        color,
        location_str,
        warning.error_type(),
        warning.msg(),
        help_msg,
        reset
    );
}

fn print_build_info() {
    println!("Version: {}", VERSION);
    println!("Rustc Version: {}", RUSTC_VERSION);
    println!("Rustc Channel: {}", RUSTC_CHANNEL);
    println!("Target: {}", TARGET_TRIPLE);
    println!("Build profile: {}", PROFILE);
    println!("Build date: {}", BUILD_DATE);
}

fn main() {
    let args: Vec<String> = std_env::args().skip(1).collect();

    panic::set_hook(Box::new(|panic_info| {
        let msg = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            *s
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.as_str()
        } else {
            "Unknown panic message"
        };

        let location = panic_info
            .location()
            .map(|loc| format!("at {}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_else(|| "at unknown location".to_string());

        eprintln!("{}", "Oops! The program panicked!".red().bold());
        eprintln!("Message: {}", msg.red());
        eprintln!("{}", location.red());
        eprintln!();
        eprintln!("{}", "--- Build info ---".dimmed());
        eprintln!("Version: {}", VERSION.cyan());
        eprintln!("Rustc Version: {}", RUSTC_VERSION.cyan());
        eprintln!("Rustc Channel: {}", RUSTC_CHANNEL.cyan());
        eprintln!("Target: {}", TARGET_TRIPLE.cyan());
        eprintln!("Build profile: {}", PROFILE.cyan());
        eprintln!("Build date: {}", BUILD_DATE.cyan());
        eprintln!("{}", "------------------".dimmed());

        exit(101);
    }));

    let commands = [
        ("--help, -h", "Show this help message"),
        ("--version, -v", "Show version information"),
        ("--build-info", "Show build information"),
        ("--color", "Enable colored output (default)"),
        ("--no-color", "Disable colored output"),
        ("--quiet, -q", "Suppress warnings and notes"),
        ("--debug, -d", "Enable debug mode"),
        ("--debug-mode=<mode>", "Set debug mode (full, normal, minimal, none)"),
        ("--config <path>", "Specify a custom config file path"),
        ("--default-config, -dc", "Write the default configuration next to the executable"),
        ("--output <path>, -o <path>", "Write the processed source to <path>"),
        ("--rescan-expansions", "Rescan replacement text for further call sites (legacy)"),
        ("--dump-defines", "Print the collected macro definitions"),
    ];

    let mut input_file: Option<String> = None;
    let mut output_arg: Option<String> = None;
    let mut config_arg: Option<String> = None;
    let mut color_flag: Option<bool> = None;
    let mut help_flag = false;
    let mut version_flag = false;
    let mut build_info_flag = false;
    let mut quiet_flag = false;
    let mut debug_flag = false;
    let mut debug_mode_value: Option<String> = None;
    let mut default_config_flag = false;
    let mut rescan_flag = false;
    let mut dump_defines_flag = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => help_flag = true,
            "--version" | "-v" => version_flag = true,
            "--build-info" => build_info_flag = true,
            "--color" => color_flag = Some(true),
            "--no-color" => color_flag = Some(false),
            "--quiet" | "-q" => quiet_flag = true,
            "--debug" | "-d" => debug_flag = true,
            "--rescan-expansions" => rescan_flag = true,
            "--dump-defines" => dump_defines_flag = true,
            "--default-config" | "-dc" => default_config_flag = true,
            "--config" => {
                if i + 1 < args.len() {
                    config_arg = Some(args[i + 1].clone());
                    i += 1;
                } else {
                    eprintln!("Error: --config requires a value.");
                    exit(1);
                }
            }
            "--output" | "-o" => {
                if i + 1 < args.len() {
                    output_arg = Some(args[i + 1].clone());
                    i += 1;
                } else {
                    eprintln!("Error: --output requires a value.");
                    exit(1);
                }
            }
            arg if arg.starts_with("--debug-mode=") => {
                debug_mode_value = Some(arg["--debug-mode=".len()..].to_string());
            }
            arg if arg.starts_with('-') => {
                eprintln!("Unknown option: {}", arg);
                eprintln!("Use --help to list the available options.");
                exit(1);
            }
            arg => {
                if input_file.is_none() {
                    input_file = Some(arg.to_string());
                } else {
                    eprintln!("Unexpected argument: {}", arg);
                    exit(1);
                }
            }
        }
        i += 1;
    }

    if help_flag {
        println!("Usage: luadef [options] <file>");
        println!();
        println!("Options:");
        for (cmd, desc) in commands.iter() {
            println!("  {:<28} {}", cmd, desc);
        }
        exit(0);
    }

    if version_flag {
        println!("luadef {}", VERSION);
        exit(0);
    }

    if build_info_flag {
        print_build_info();
        exit(0);
    }

    if default_config_flag {
        let path = get_config_path();
        match create_config_file(&path) {
            Ok(_) => println!("Wrote default config to {}", fix_path(path.display().to_string())),
            Err(e) => {
                eprintln!("Failed to write config file: {}", e);
                exit(1);
            }
        }
        if input_file.is_none() {
            exit(0);
        }
    }

    let mut config = match &config_arg {
        Some(path) => match load_config(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                let err = Error::new("ConfigError", &e, path);
                handle_error(&err, "", &default_config());
                exit(1);
            }
        },
        None => load_config_or_default(&get_config_path()),
    };

    if let Some(color) = color_flag {
        config.supports_color = color;
    }
    if quiet_flag {
        config.warnings = false;
    }
    if debug_flag {
        config.debug = true;
    }
    if let Some(mode) = debug_mode_value {
        config.debug_mode = mode;
        config.debug = true;
    }
    if rescan_flag {
        config.rescan_expansions = true;
    }

    let input_path = match input_file {
        Some(file) => file,
        None => read_input("Input LUA file: "),
    };

    if input_path.is_empty() {
        eprint_colored(
            "No input file given",
            &config.color_scheme.exception,
            Some(config.supports_color),
        );
        exit(1);
    }

    let source = match fs::read_to_string(&input_path) {
        Ok(contents) => contents,
        Err(e) => {
            let err = Error::with_help(
                "FileError",
                &format!("File was not able to be opened: {}", e),
                "check that the path exists and is readable",
                &input_path,
            );
            handle_error(&err, "", &config);
            exit(1);
        }
    };

    debug_log(&format!("Preprocessing file: {}", fix_path(input_path.clone())), &config, None);

    let mut preprocessor = Preprocessor::new(&input_path, &config);
    let output = match preprocessor.process(&source) {
        Ok(out) => out,
        Err(err) => {
            handle_error(&err, &source, &config);
            exit(1);
        }
    };

    debug_log(
        &format!("Collected {} definition(s)", preprocessor.defines().len()),
        &config,
        None,
    );

    if dump_defines_flag {
        for def in preprocessor.defines() {
            print_colored(
                &format!("{}({}) -> {}", def.name, def.params.join(", "), def.body),
                &config.color_scheme.info,
                Some(config.supports_color),
            );
        }
    }

    if config.warnings {
        for warning in preprocessor.warnings() {
            print_warning(warning, &config);
        }
    }

    let output_path = output_arg.unwrap_or_else(|| format!("{}d", input_path));

    if let Err(e) = fs::write(&output_path, &output) {
        let err = Error::new(
            "FileError",
            &format!("Failed to write output file: {}", e),
            &output_path,
        );
        handle_error(&err, "", &config);
        exit(1);
    }

    if !quiet_flag {
        print_colored(
            &format!("Wrote to output file: {}", fix_path(output_path)),
            &config.color_scheme.note,
            Some(config.supports_color),
        );
    }
}
