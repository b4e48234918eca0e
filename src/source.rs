//! Where a wide-format table comes from, and how it is read into [`RawRow`]s.
//!
//! Local files and in-memory text are parsed directly with `csv`. URLs are
//! fetched once with a blocking HTTP client; transport failures are returned
//! to the caller unchanged (there is no retry loop).

use crate::error::LoadError;
use crate::models::RawRow;
use csv::ReaderBuilder;
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Path(PathBuf),
    Url(String),
    /// CSV text held in memory (fixtures, embedded data).
    Inline(String),
}

impl DataSource {
    /// Join a file name onto a directory or base URL.
    ///
    /// Anything starting with `http://` or `https://` is treated as a URL base:
    /// it gets a trailing `/` if missing, and a leading `/` on `file` is dropped.
    pub fn resolve(base: &str, file: &str) -> Self {
        let file = file.trim_start_matches('/');
        if base.starts_with("http://") || base.starts_with("https://") {
            let base = if base.ends_with('/') {
                base.to_string()
            } else {
                format!("{base}/")
            };
            DataSource::Url(format!("{base}{file}"))
        } else {
            DataSource::Path(PathBuf::from(base).join(file))
        }
    }

    /// Human-readable origin for logs and error messages.
    pub fn describe(&self) -> String {
        match self {
            DataSource::Path(p) => p.display().to_string(),
            DataSource::Url(u) => u.clone(),
            DataSource::Inline(_) => "<inline>".to_string(),
        }
    }

    /// Read every record as a column-name -> cell map.
    ///
    /// Rows shorter than the header are accepted (missing cells are simply
    /// absent from the map).
    pub fn read_rows(&self) -> Result<Vec<RawRow>, LoadError> {
        match self {
            DataSource::Path(path) => {
                let file = File::open(path).map_err(|source| LoadError::Io {
                    path: path.clone(),
                    source,
                })?;
                parse_rows(file, &self.describe())
            }
            DataSource::Url(url) => {
                let body = fetch_text(url)?;
                parse_rows(body.as_bytes(), url)
            }
            DataSource::Inline(text) => parse_rows(text.as_bytes(), "<inline>"),
        }
    }
}

fn http_client(url: &str) -> Result<HttpClient, LoadError> {
    HttpClient::builder()
        .timeout(Duration::from_secs(30)) // total request timeout
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(5))
        .user_agent(concat!("climate_dash/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|source| LoadError::Http {
            url: url.to_string(),
            source,
        })
}

fn fetch_text(url: &str) -> Result<String, LoadError> {
    let http = http_client(url)?;
    let resp = http.get(url).send().map_err(|source| LoadError::Http {
        url: url.to_string(),
        source,
    })?;
    let status = resp.status();
    if !status.is_success() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status,
        });
    }
    resp.text().map_err(|source| LoadError::Http {
        url: url.to_string(),
        source,
    })
}

/// Parse CSV text with a header line into raw rows.
///
/// Header names are kept exactly as written. Bytes that are not valid UTF-8
/// become U+FFFD instead of failing the table.
pub fn parse_rows<R: Read>(reader: R, origin: &str) -> Result<Vec<RawRow>, LoadError> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let csv_err = |source| LoadError::Csv {
        origin: origin.to_string(),
        source,
    };
    let headers: Vec<String> = rdr
        .byte_headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| String::from_utf8_lossy(h).into_owned())
        .collect();

    let mut rows = Vec::new();
    for record in rdr.byte_records() {
        let record = record.map_err(csv_err)?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.clone(), String::from_utf8_lossy(v).into_owned()))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}
