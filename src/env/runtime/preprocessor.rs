use crate::env::runtime::config::Config;
use crate::env::runtime::errors::{Error, Location};

const DEFINE_KEYWORD: &str = "#DEFINE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Define {
    pub name: String,
    pub params: Vec<String>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub length: usize,
    pub args: Vec<String>,
}

pub struct Preprocessor {
    file_path: String,
    rescan_expansions: bool,
    expansion_limit: usize,
    defines: Vec<Define>,
    warnings: Vec<Error>,
}

impl Preprocessor {
    pub fn new(file_path: &str, config: &Config) -> Self {
        Self {
            file_path: file_path.to_string(),
            rescan_expansions: config.rescan_expansions,
            expansion_limit: config.expansion_limit,
            defines: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn defines(&self) -> &[Define] {
        &self.defines
    }

    pub fn warnings(&self) -> &[Error] {
        &self.warnings
    }

    pub fn process(&mut self, source: &str) -> Result<String, Error> {
        let body = self.collect_defines(source);
        let expanded = self.expand_all(body)?;
        Ok(expanded.trim_start().to_string())
    }

    // Splits the input into macro definitions and the retained body text.
    // Definition lines ending in '\' continue on the next line; continuation
    // fragments are left-trimmed and joined with the marker stripped.
    fn collect_defines(&mut self, source: &str) -> String {
        let mut kept = String::with_capacity(source.len());
        let mut pending: Option<(String, usize)> = None;

        for (idx, line) in source.lines().enumerate() {
            let line_number = idx + 1;

            if let Some((mut joined, start)) = pending.take() {
                let fragment = line.trim_start();
                match fragment.strip_suffix('\\') {
                    Some(stripped) => {
                        joined.push_str(stripped);
                        pending = Some((joined, start));
                    }
                    None => {
                        joined.push_str(fragment);
                        if let Some(def) = self.parse_define(&joined, start) {
                            self.defines.push(def);
                        }
                    }
                }
                continue;
            }

            if line.starts_with(DEFINE_KEYWORD) {
                match line.strip_suffix('\\') {
                    Some(stripped) => pending = Some((stripped.to_string(), line_number)),
                    None => {
                        if let Some(def) = self.parse_define(line, line_number) {
                            self.defines.push(def);
                        }
                    }
                }
            } else {
                kept.push_str(line);
                kept.push('\n');
            }
        }

        // EOF ends an unfinished continuation; the fragment still gets parsed
        if let Some((joined, start)) = pending.take() {
            if let Some(def) = self.parse_define(&joined, start) {
                self.defines.push(def);
            }
        }

        kept
    }

    fn parse_define(&mut self, logical: &str, line_number: usize) -> Option<Define> {
        let rest = logical[DEFINE_KEYWORD.len()..].trim_start();

        let Some(paren) = rest.find('(') else {
            self.warn_definition("missing parameter list", logical, line_number);
            return None;
        };

        let name = rest[..paren].to_string();
        if name.is_empty() {
            self.warn_definition("missing macro name", logical, line_number);
            return None;
        }

        let after = &rest[paren + 1..];
        let mut params = Vec::new();
        let mut cur = String::new();
        let mut close = None;

        for (i, c) in after.char_indices() {
            match c {
                ')' => {
                    if !cur.is_empty() {
                        params.push(cur.trim_start().to_string());
                    }
                    close = Some(i);
                    break;
                }
                ',' => {
                    params.push(cur.trim_start().to_string());
                    cur.clear();
                }
                _ => cur.push(c),
            }
        }

        let Some(close) = close else {
            self.warn_definition("unterminated parameter list", logical, line_number);
            return None;
        };

        let body = after[close + 1..].trim_start().to_string();

        Some(Define { name, params, body })
    }

    fn expand_all(&mut self, mut out: String) -> Result<String, Error> {
        for idx in 0..self.defines.len() {
            let def = self.defines[idx].clone();
            let mut search_from = 0usize;
            let mut expansions = 0usize;

            while let Some(found) = find_from(&out, search_from, &def.name) {
                let Some(call) = scan_call_site(&out, found) else {
                    let loc = self.buffer_location(&out, found, &def.name);
                    self.warnings.push(Error::with_location(
                        "UnterminatedCallSite",
                        &format!("Unclosed argument list for macro '{}'", def.name),
                        loc,
                    ));
                    break;
                };

                if call.args.len() != def.params.len() {
                    let loc = self.buffer_location(&out, found, &def.name);
                    let mut err = Error::with_location(
                        "ArityMismatch",
                        &format!(
                            "Invalid usage of macro '{}': expected {} argument(s), got {}",
                            def.name,
                            def.params.len(),
                            call.args.len()
                        ),
                        loc,
                    );
                    err.help = Some(format!(
                        "'{}' is defined as {}({})",
                        def.name,
                        def.name,
                        def.params.join(", ")
                    ));
                    self.warnings.push(err);
                    break;
                }

                expansions += 1;
                if self.rescan_expansions && expansions > self.expansion_limit {
                    return Err(Error::with_location(
                        "ExpansionLimit",
                        &format!(
                            "Macro '{}' exceeded the expansion limit of {}",
                            def.name, self.expansion_limit
                        ),
                        self.buffer_location(&out, found, &def.name),
                    ));
                }

                let replacement = substitute(&def, &call.args);
                out.replace_range(found..found + call.length, &replacement);

                search_from = if self.rescan_expansions {
                    // legacy resume point: one character past the match start,
                    // so replacement text containing the name gets rescanned
                    found + def.name.chars().next().map_or(1, |c| c.len_utf8())
                } else {
                    found + replacement.len()
                };
            }
        }

        Ok(out)
    }

    fn warn_definition(&mut self, msg: &str, line: &str, line_number: usize) {
        self.warnings.push(Error::with_location(
            "MalformedDefinition",
            &format!("Incorrect {} definition: {}", DEFINE_KEYWORD, msg),
            Location {
                file: self.file_path.clone(),
                line_string: line.to_string(),
                line_number,
                range: (0, 0),
            },
        ));
    }

    // Line numbers here refer to the retained buffer, with definition lines
    // already removed.
    fn buffer_location(&self, text: &str, offset: usize, name: &str) -> Location {
        let line_number = text[..offset].matches('\n').count() + 1;
        let line_start = text[..offset].rfind('\n').map_or(0, |p| p + 1);
        let col = text[line_start..offset].chars().count() + 1;
        let line_string = text[line_start..].lines().next().unwrap_or("").to_string();

        Location {
            file: self.file_path.clone(),
            line_string,
            line_number,
            range: (col, col + name.chars().count()),
        }
    }
}

fn find_from(text: &str, from: usize, needle: &str) -> Option<usize> {
    if from > text.len() {
        return None;
    }
    text[from..].find(needle).map(|i| from + i)
}

// Scans forward from a located macro name: everything before the first '('
// is skipped without re-validation, then the argument list is split on
// top-level commas. Nested parentheses inside an argument are consumed
// whole. Returns None when the buffer ends before the matching ')'.
pub fn scan_call_site(text: &str, from: usize) -> Option<CallSite> {
    let tail = &text[from..];
    let mut inside = false;
    let mut depth = 0usize;
    let mut args: Vec<String> = Vec::new();
    let mut cur = String::new();

    for (i, c) in tail.char_indices() {
        if !inside {
            if c == '(' {
                inside = true;
            }
            continue;
        }

        match c {
            '(' => {
                depth += 1;
                cur.push(c);
            }
            ')' if depth == 0 => {
                if !cur.is_empty() {
                    args.push(cur.trim_start().to_string());
                }
                return Some(CallSite { length: i + c.len_utf8(), args });
            }
            ')' => {
                depth -= 1;
                cur.push(c);
            }
            ',' if depth == 0 => {
                args.push(cur.trim_start().to_string());
                cur.clear();
            }
            _ => cur.push(c),
        }
    }

    None
}

fn substitute(def: &Define, args: &[String]) -> String {
    let mut body = def.body.clone();
    for (param, arg) in def.params.iter().zip(args.iter()) {
        body = replace_whole_word(&body, param, arg);
    }
    body
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

// Whole-word, ASCII-case-insensitive replacement. A match must not touch an
// identifier character on either side, so a parameter 'x' never matches
// inside 'max' or 'x1'.
pub fn replace_whole_word(text: &str, word: &str, replacement: &str) -> String {
    if word.is_empty() {
        return text.to_string();
    }

    let wlen = word.len();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < text.len() {
        let matched = i + wlen <= text.len()
            && text.is_char_boundary(i + wlen)
            && text[i..i + wlen].eq_ignore_ascii_case(word)
            && !text[..i].chars().next_back().is_some_and(is_ident_char)
            && !text[i + wlen..].chars().next().is_some_and(is_ident_char);

        if matched {
            out.push_str(replacement);
            i += wlen;
        } else {
            let c = text[i..].chars().next().unwrap();
            out.push(c);
            i += c.len_utf8();
        }
    }

    out
}
