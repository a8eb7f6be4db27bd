use std::io::{self, Write};
use once_cell::sync::Lazy;
use crate::env::runtime::config::Config;

static COLOR_SUPPORT: Lazy<bool> = Lazy::new(detect_color_support);

#[cfg(windows)]
fn detect_color_support() -> bool {
    use std::ptr::null_mut;
    use std::ffi::c_void;

    type HANDLE = *mut c_void;
    type DWORD = u32;
    type BOOL = i32;

    const ENABLE_VIRTUAL_TERMINAL_PROCESSING: DWORD = 0x0004;
    const STD_OUTPUT_HANDLE: DWORD = -11i32 as u32;
    const INVALID_HANDLE_VALUE: HANDLE = !0 as HANDLE;
    const FILE_TYPE_CHAR: DWORD = 0x0002;

    unsafe extern "system" {
        fn GetStdHandle(nStdHandle: DWORD) -> HANDLE;
        fn GetConsoleMode(hConsoleHandle: HANDLE, lpMode: *mut DWORD) -> BOOL;
        fn GetFileType(hFile: HANDLE) -> DWORD;
    }

    unsafe {
        let handle = GetStdHandle(STD_OUTPUT_HANDLE);
        if handle == null_mut() || handle == INVALID_HANDLE_VALUE {
            return false;
        }

        if GetFileType(handle) != FILE_TYPE_CHAR {
            return false;
        }

        let mut mode: DWORD = 0;
        if GetConsoleMode(handle, &mut mode as *mut DWORD) == 0 {
            return false;
        }

        (mode & ENABLE_VIRTUAL_TERMINAL_PROCESSING) != 0
    }
}

#[cfg(unix)]
fn detect_color_support() -> bool {
    use std::io::IsTerminal;
    let is_tty = std::io::stdout().is_terminal();
    let term = std::env::var("TERM").unwrap_or_default();

    is_tty && term != "dumb"
}

#[cfg(not(any(unix, windows)))]
fn detect_color_support() -> bool {
    false
}

pub fn supports_color() -> bool {
    *COLOR_SUPPORT
}

pub fn hex_to_ansi(hex_color: &str, use_colors: bool) -> String {
    if !use_colors {
        return "".to_string();
    }

    if hex_color == "reset" {
        return "\x1b[0m".to_string();
    }

    let hex = if hex_color.starts_with('#') { &hex_color[1..] } else { hex_color };

    if hex.len() == 6 && hex.is_ascii() {
        if let (Ok(r), Ok(g), Ok(b)) = (
            u8::from_str_radix(&hex[0..2], 16),
            u8::from_str_radix(&hex[2..4], 16),
            u8::from_str_radix(&hex[4..6], 16),
        ) {
            return format!("\x1b[38;2;{};{};{}m", r, g, b);
        }
    }

    "\x1b[0m".to_string()
}

pub fn check_ansi<'a>(ansi: &'a str, use_colors: &bool) -> &'a str {
    if !*use_colors {
        &ansi[0..0]
    } else {
        ansi
    }
}

pub fn print_colored(message: &str, color: &str, use_colors: Option<bool>) {
    let use_colors = use_colors.unwrap_or(true);
    println!("{}{}{}", hex_to_ansi(color, use_colors), message, hex_to_ansi("reset", use_colors));
}

pub fn eprint_colored(message: &str, color: &str, use_colors: Option<bool>) {
    let use_colors = use_colors.unwrap_or(true);
    eprintln!("{}{}{}", hex_to_ansi(color, use_colors), message, hex_to_ansi("reset", use_colors));
}

pub fn debug_log(message: &str, config: &Config, use_colors: Option<bool>) {
    let use_colors = use_colors.unwrap_or(config.supports_color);
    if config.debug && (config.debug_mode == "full" || config.debug_mode == "normal") {
        let single_line_message = message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
            .replace('\0', "\\0")
            .replace('\x1b', "\\e");
        print_colored(&single_line_message, &config.color_scheme.debug, Some(use_colors));
    }
}

pub fn get_line_info(source: &str, line_number: usize) -> Option<String> {
    source.lines().nth(line_number.saturating_sub(1)).map(|s| s.to_string())
}

pub fn read_input(prompt: &str) -> String {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut input = String::new();
    let _ = io::stdin().read_line(&mut input);
    input.trim().to_string()
}

pub fn fix_path(raw_path: String) -> String {
    let path = raw_path.trim();
    if path.is_empty() {
        return String::new();
    }
    if path.starts_with('/') {
        return path.to_string();
    }
    if path.starts_with("./") {
        return path[2..].to_string();
    }
    if path.starts_with(r"\\?\") {
        return path[4..].to_string();
    }
    path.replace("\\", "/").replace("//", "/")
}
