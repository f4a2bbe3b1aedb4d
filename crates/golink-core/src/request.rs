// crates/golink-core/src/request.rs - URI validation for go:// links
//
// The OS hands the process exactly one string, e.g.
//
//     go://journal/20200627?title=macOS%E3%81%A7URLScheme
//
// This module turns it into a `Request`: the service name (URI host), the
// service-specific path (percent-decoded) and the query parameters grouped
// per key. Nothing here touches the filesystem or the environment.
//
// VALIDATION ORDER:
// 1. At least one argument must be present
// 2. The first argument must be a well-formed absolute URI
// 3. Its scheme, exactly as written, must equal the accepted scheme

use std::fmt;

use indexmap::IndexMap;
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use thiserror::Error;
use url::{Url, form_urlencoded};

/// The only scheme this handler is registered for
pub const SCHEME: &str = "go";

/// Query parameters; a key may repeat and the first value is authoritative
pub type Query = IndexMap<String, Vec<String>>;

/// Characters escaped when a path is written back into a URI
const PATH_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Characters escaped when a service name is written back as the URI host
const HOST_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b':')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'@')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'|');

/// Errors that can occur while validating the program argument
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UriError {
    #[error("URI is required argument")]
    MissingArgument,

    #[error("malformed URI {input:?}: {reason}")]
    Malformed { input: String, reason: String },

    #[error("{0:?} is unexpected URI scheme")]
    UnsupportedScheme(String),
}

/// Result type for validation operations
pub type UriResult<T> = Result<T, UriError>;

/// A validated go:// request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    scheme: String,
    service: String,
    path: String,
    query: Query,
}

impl Request {
    /// Parse a raw URI and require `scheme`
    ///
    /// COMPONENTS:
    /// - service: the authority as written, minus any userinfo. A port stays
    ///   part of the name (`journal:8080` is its own service) and non-ASCII
    ///   hosts are percent-decoded (`go://日記/x` selects `日記`)
    /// - path: percent-decoded, leading `/` kept
    /// - query: `application/x-www-form-urlencoded` pairs grouped per key
    ///
    /// ERROR HANDLING:
    /// - `Malformed` for stray `%` escapes, anything `Url::parse` rejects,
    ///   and host or path bytes that do not decode to UTF-8
    /// - `UnsupportedScheme` when the scheme text differs from `scheme`, even
    ///   only by case
    pub fn parse(input: &str, scheme: &str) -> UriResult<Self> {
        let malformed = |reason: String| UriError::Malformed {
            input: input.to_string(),
            reason,
        };

        check_percent_escapes(input).map_err(malformed)?;
        let url = Url::parse(input).map_err(|e| malformed(e.to_string()))?;

        // Url lowercases the scheme, so compare what the caller actually wrote
        let raw_scheme = input.split_once(':').map_or(url.scheme(), |(s, _)| s);
        if raw_scheme != scheme {
            return Err(UriError::UnsupportedScheme(raw_scheme.to_string()));
        }

        let service = service_from_authority(&url).map_err(malformed)?;
        let path = percent_decode_str(url.path())
            .decode_utf8()
            .map_err(|e| malformed(format!("path is not valid UTF-8: {e}")))?
            .into_owned();

        let mut query = Query::new();
        for (key, value) in url.query_pairs() {
            query
                .entry(key.into_owned())
                .or_default()
                .push(value.into_owned());
        }

        let request = Self {
            scheme: raw_scheme.to_string(),
            service,
            path,
            query,
        };
        tracing::debug!(
            service = %request.service,
            path = %request.path,
            "accepted request"
        );
        Ok(request)
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// The URI host (with its port, if one was given), used to select a handler
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Service-specific path, usually with a leading `/`
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    /// First value for a query key
    pub fn first(&self, key: &str) -> Option<&str> {
        first_value(&self.query, key)
    }

    /// Rebuild an equivalent URI from the captured components
    pub fn to_uri(&self) -> String {
        let (host, port) = split_port(&self.service);
        let mut uri = format!(
            "{}://{}",
            self.scheme,
            utf8_percent_encode(host, HOST_ESCAPE)
        );
        if let Some(port) = port {
            uri.push(':');
            uri.push_str(port);
        }
        uri.extend(utf8_percent_encode(&self.path, PATH_ESCAPE));

        if !self.query.is_empty() {
            let mut serializer = form_urlencoded::Serializer::new(String::new());
            for (key, values) in &self.query {
                for value in values {
                    serializer.append_pair(key, value);
                }
            }
            uri.push('?');
            uri.push_str(&serializer.finish());
        }

        uri
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uri())
    }
}

/// Validate process arguments against the go:// scheme
///
/// Only the first argument is considered.
pub fn validate<S: AsRef<str>>(args: &[S]) -> UriResult<Request> {
    validate_with_scheme(args, SCHEME)
}

/// Same as [`validate`] but accepting `scheme` instead of [`SCHEME`]
pub fn validate_with_scheme<S: AsRef<str>>(args: &[S], scheme: &str) -> UriResult<Request> {
    let first = args.first().ok_or(UriError::MissingArgument)?;
    Request::parse(first.as_ref(), scheme)
}

/// Service name from the URI authority
///
/// `Url` keeps opaque hosts percent-encoded and reports the port separately;
/// the service is the decoded host with `:port` appended when present.
fn service_from_authority(url: &Url) -> Result<String, String> {
    let host = percent_decode_str(url.host_str().unwrap_or_default())
        .decode_utf8()
        .map_err(|e| format!("host is not valid UTF-8: {e}"))?;

    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.into_owned(),
    })
}

/// Split a trailing `:<digits>` port off a service name
fn split_port(service: &str) -> (&str, Option<&str>) {
    match service.rsplit_once(':') {
        Some((host, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => {
            (host, Some(port))
        }
        _ => (service, None),
    }
}

/// First value for `key`, if any
pub fn first_value<'q>(query: &'q Query, key: &str) -> Option<&'q str> {
    query
        .get(key)
        .and_then(|values| values.first())
        .map(String::as_str)
}

/// Reject `%` sequences that are not followed by two hex digits
///
/// `Url::parse` passes these through untouched; a link carrying one was not
/// produced by a well-behaved encoder.
fn check_percent_escapes(input: &str) -> Result<(), String> {
    let bytes = input.as_bytes();
    for (idx, _) in input.match_indices('%') {
        let valid = bytes
            .get(idx + 1..idx + 3)
            .is_some_and(|pair| pair.iter().all(u8::is_ascii_hexdigit));
        if !valid {
            let end = (idx + 3).min(input.len());
            let escape = input.get(idx..end).unwrap_or("%");
            return Err(format!("invalid URL escape {escape:?}"));
        }
    }
    Ok(())
}
