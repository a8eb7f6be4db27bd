use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line_string: String,
    pub line_number: usize,
    pub range: (usize, usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Error {
    pub error_type: String,
    pub msg: String,
    pub help: Option<String>,
    pub loc: Option<Location>,
}

impl Error {
    pub fn new(error_type: &str, msg: &str, file_path: &str) -> Self {
        Self {
            error_type: error_type.to_string(),
            msg: msg.to_string(),
            help: None,
            loc: Some(Location {
                file: file_path.to_string(),
                line_string: "".to_string(),
                line_number: 0,
                range: (0, 0),
            }),
        }
    }

    pub fn new_anonymous(error_type: &str, msg: &str) -> Self {
        Self {
            error_type: error_type.to_string(),
            msg: msg.to_string(),
            help: None,
            loc: None,
        }
    }

    pub fn with_help(error_type: &str, msg: &str, help: &str, file_path: &str) -> Self {
        Self {
            help: Some(help.to_string()),
            ..Self::new(error_type, msg, file_path)
        }
    }

    pub fn with_location(error_type: &str, msg: &str, loc: Location) -> Self {
        Self {
            error_type: error_type.to_string(),
            msg: msg.to_string(),
            help: None,
            loc: Some(loc),
        }
    }

    pub fn with_some_location(error_type: &str, msg: &str, loc: Option<Location>) -> Self {
        Self {
            error_type: error_type.to_string(),
            msg: msg.to_string(),
            help: None,
            loc,
        }
    }

    pub fn error_type(&self) -> &str {
        &self.error_type
    }

    pub fn msg(&self) -> &str {
        &self.msg
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn location(&self) -> Option<&Location> {
        self.loc.as_ref()
    }

    pub fn location_string(&self) -> String {
        if let Some(loc) = &self.loc {
            format!("{}:{}:{}", loc.file, loc.line_number, loc.range.0)
        } else {
            "<unknown location>".to_string()
        }
    }
}
