use crate::cli::args::Mode;
use crate::core::errors::TargetParseError;
use reqwest::Method;

/// A host to fingerprint, built from one input record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub host: String,
    pub ip: Option<String>,
    pub port: Option<String>,
}

impl Target {
    pub fn domain(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ip: None,
            port: None,
        }
    }

    /// Parse one input line. Blank lines and `#` comments yield `Ok(None)`.
    pub fn parse_line(line: &str, line_no: usize, mode: Mode) -> Result<Option<Self>, TargetParseError> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }
        match mode {
            Mode::Simple => Ok(Some(Self::domain(clean_field(trimmed)))),
            Mode::Extended => Self::parse_record(trimmed, line_no).map(Some),
        }
    }

    /// `domain,ip,port` with optional double quotes around each field.
    pub fn parse_record(record: &str, line_no: usize) -> Result<Self, TargetParseError> {
        if record.trim().is_empty() {
            return Err(TargetParseError::Empty { line: line_no });
        }

        let fields: Vec<&str> = record.split(',').collect();
        let [domain, ip, port] = fields.as_slice() else {
            return Err(TargetParseError::FieldCount {
                line: line_no,
                fields: fields.len(),
            });
        };

        let host = clean_field(domain);
        if host.is_empty() {
            return Err(TargetParseError::EmptyDomain { line: line_no });
        }

        Ok(Self {
            host,
            ip: non_empty(clean_field(ip)),
            port: non_empty(clean_field(port)),
        })
    }

    /// What gets written into a bucket: the bare domain, or the full
    /// `domain,ip,port` record when ip or port is known.
    ///
    /// The record form rather than `ip:port` keeps every line of a result
    /// file valid extended-mode input, so a bucket can seed the next scan.
    pub fn identifier(&self) -> String {
        match (&self.ip, &self.port) {
            (None, None) => self.host.clone(),
            (ip, port) => format!(
                "{},{},{}",
                self.host,
                ip.as_deref().unwrap_or_default(),
                port.as_deref().unwrap_or_default()
            ),
        }
    }
}

fn clean_field(field: &str) -> String {
    field.trim().replace('"', "")
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

/// One probe against one target. Each job owns its own copy of the target.
#[derive(Debug, Clone)]
pub struct Job {
    pub target: Target,
    pub path: String,
    pub method: Method,
    pub body: String,
}

impl Job {
    pub fn new(target: Target, path: impl Into<String>, method: Method, body: impl Into<String>) -> Self {
        Self {
            target,
            path: path.into(),
            method,
            body: body.into(),
        }
    }
}

/// What a successful fetch produced, plus the fingerprint it resolved to.
#[derive(Debug, Clone, Default)]
pub struct FetchResult {
    pub status: u16,
    /// Status line, headers and body, lower-cased.
    pub raw_response: String,
    pub title: Option<String>,
    pub matched: Option<String>,
}
