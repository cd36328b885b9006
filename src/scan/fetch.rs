use super::job::{FetchResult, Job};
use crate::config::ScanConfig;
use crate::core::errors::FetchError;
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use std::sync::LazyLock;

const TITLE_MAX_CHARS: usize = 49;

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("title regex is valid"));

/// Executes a single job's request. Workers only see this seam, which keeps
/// the pool testable without a network.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, job: &Job) -> Result<FetchResult, FetchError>;
}

/// The production prober: one shared reqwest client for every worker.
pub struct HttpProber {
    client: Client,
    body_limit: usize,
}

impl HttpProber {
    pub fn new(config: &ScanConfig) -> reqwest::Result<Self> {
        let mut builder = Client::builder()
            // scanning unknown and misconfigured hosts; certificates are not the point
            .danger_accept_invalid_certs(true)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .pool_idle_timeout(config.timeout)
            .tcp_keepalive(config.keepalive.then_some(config.timeout))
            .user_agent(concat!("badprint/", env!("CARGO_PKG_VERSION")));

        builder = if config.keepalive {
            builder.pool_max_idle_per_host(2)
        } else {
            builder.pool_max_idle_per_host(0)
        };

        Ok(Self {
            client: builder.build()?,
            body_limit: config.max_body_bytes,
        })
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, job: &Job) -> Result<FetchResult, FetchError> {
        let url = normalize_url(&job.target.host, &job.path);

        let mut request = self.client.request(job.method.clone(), &url);
        if !job.body.is_empty() {
            request = request.body(job.body.clone());
        }

        let mut response = request.send().await.map_err(|source| {
            if source.is_builder() {
                FetchError::Request {
                    url: url.clone(),
                    reason: source.to_string(),
                }
            } else {
                FetchError::Transport {
                    url: url.clone(),
                    source,
                }
            }
        })?;

        let status = response.status();
        let mut raw = format!("{:?} {}\r\n", response.version(), status);
        for (name, value) in response.headers() {
            raw.push_str(name.as_str());
            raw.push_str(": ");
            raw.push_str(&String::from_utf8_lossy(value.as_bytes()));
            raw.push_str("\r\n");
        }
        raw.push_str("\r\n");

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|source| FetchError::Body { url: url.clone(), source })?
        {
            let room = self.body_limit - body.len();
            if chunk.len() >= room {
                body.extend_from_slice(&chunk[..room]);
                tracing::trace!("Body from {} cut at {} bytes", url, self.body_limit);
                break;
            }
            body.extend_from_slice(&chunk);
        }
        let body = String::from_utf8_lossy(&body);
        raw.push_str(&body);

        Ok(FetchResult {
            status: status.as_u16(),
            raw_response: raw.to_lowercase(),
            title: extract_title(&body),
            matched: None,
        })
    }
}

/// Prefix a scheme when missing and join host and path with exactly one `/`.
pub fn normalize_url(host: &str, path: &str) -> String {
    let host = host.trim();
    let mut url = if has_scheme(host) {
        host.to_string()
    } else {
        format!("https://{host}")
    };

    match (url.ends_with('/'), path.starts_with('/')) {
        (true, true) => url.push_str(&path[1..]),
        (false, false) => {
            url.push('/');
            url.push_str(path);
        }
        _ => url.push_str(path),
    }
    url
}

fn has_scheme(host: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        host.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

/// First `<title>` text, whitespace collapsed, cut to 49 characters.
pub fn extract_title(body: &str) -> Option<String> {
    let inner = TITLE_RE.captures(body)?.get(1)?.as_str();
    let collapsed = inner.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return None;
    }
    Some(collapsed.chars().take(TITLE_MAX_CHARS).collect())
}
