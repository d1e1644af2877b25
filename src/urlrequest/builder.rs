//! Request descriptor construction.
//!
//! Pure apart from one side effect: per-call cookies are written into the
//! session cookie store, so they stick for later calls too.

use crate::base::neterror::NetError;
use crate::cookies::monster::CookieMonster;
use crate::emulation::FingerprintProfile;
use crate::http::descriptor::RequestDescriptor;
use crate::http::orderedheaders::OrderedHeaders;
use crate::http::requestbody::RequestBody;
use crate::urlrequest::detect::detect_binary_request;
use crate::urlrequest::options::RequestOptions;
use http::Method;
use url::Url;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Session state read while building a descriptor.
#[derive(Debug, Clone, Copy)]
pub struct SessionContext<'a> {
    pub session_id: &'a str,
    pub headers: &'a OrderedHeaders,
    pub proxy: &'a str,
    pub cookies: &'a CookieMonster,
    pub profile: &'a FingerprintProfile,
    pub header_order: Option<&'a [String]>,
    pub force_http1: bool,
}

/// A built descriptor plus the final URL it targets.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub descriptor: RequestDescriptor,
    pub url: Url,
}

fn parse_method(method: &str) -> Result<Method, NetError> {
    let upper = method.trim().to_ascii_uppercase();
    if upper.is_empty() {
        return Err(NetError::InvalidMethod(method.to_string()));
    }
    Method::from_bytes(upper.as_bytes()).map_err(|_| NetError::InvalidMethod(method.to_string()))
}

fn parse_url(raw: &str) -> Result<Url, NetError> {
    let url = Url::parse(raw).map_err(|e| NetError::invalid_url(raw, e))?;
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(NetError::invalid_url(
                raw,
                format!("unsupported scheme {other:?}"),
            ))
        }
    }
    Ok(url)
}

/// Build the descriptor for one call.
pub fn build_descriptor(
    method: &str,
    url: &str,
    options: &RequestOptions,
    ctx: &SessionContext<'_>,
) -> Result<PreparedRequest, NetError> {
    let method = parse_method(method)?;

    if let Some(reason) = &options.json_error {
        return Err(NetError::InvalidRequest(format!(
            "unserializable JSON body: {reason}"
        )));
    }

    let mut url = parse_url(url)?;
    if !options.params.is_empty() {
        url.query_pairs_mut().extend_pairs(
            options
                .params
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
        );
    }

    let body = RequestBody::select(options.json.as_ref(), options.data.as_deref())?;

    let mut headers = ctx.headers.clone();
    if let Some(content_type) = body.content_type() {
        headers.insert("Content-Type", content_type);
    }
    headers.merge(&options.headers);

    for (name, value) in &options.cookies {
        if !ctx.cookies.set_cookie(&url, name, value) {
            tracing::debug!(url = %url, cookie = %name, "per-call cookie rejected");
        }
    }
    headers.remove("cookie");
    headers.insert("Cookie", ctx.cookies.cookie_header(&url));
    headers.validate()?;

    let proxy = options.proxy.as_deref().unwrap_or(ctx.proxy);
    if !proxy.is_empty() {
        Url::parse(proxy).map_err(|e| NetError::invalid_url(proxy, e))?;
    }

    let is_byte_request = detect_binary_request(options.is_binary_request, &url, &headers);

    let timeout_seconds = options
        .timeout_seconds
        .filter(|t| *t > 0)
        .unwrap_or(DEFAULT_TIMEOUT_SECONDS);

    let (tls_client_identifier, with_random_tls_extension_order, custom_tls_client) =
        match ctx.profile {
            FingerprintProfile::Named {
                identifier,
                random_extension_order,
            } => (Some(identifier.clone()), Some(*random_extension_order), None),
            FingerprintProfile::Custom(client) => (None, None, Some((**client).clone())),
        };

    let descriptor = RequestDescriptor {
        session_id: ctx.session_id.to_string(),
        follow_redirects: options.allow_redirects.unwrap_or(false),
        force_http1: ctx.force_http1,
        headers,
        header_order: ctx.header_order.map(<[String]>::to_vec),
        insecure_skip_verify: options.insecure_skip_verify.unwrap_or(false),
        is_byte_request,
        proxy_url: proxy.to_string(),
        request_url: url.to_string(),
        request_method: method.as_str().to_string(),
        request_body: body.into_string(),
        request_cookies: Vec::new(),
        timeout_seconds,
        tls_client_identifier,
        with_random_tls_extension_order,
        custom_tls_client,
    };

    Ok(PreparedRequest { descriptor, url })
}
