use crate::domain::model::{FormFactor, QueryTarget, QueryType, RequestPayload};

const HTTPS: &str = "https://";
const HTTP: &str = "http://";

/// Builds the request body for one entry. Never fails; the caller skips blank
/// entries and validates the resulting target.
pub fn build_request(input: &str, query_type: QueryType, form_factor: FormFactor) -> RequestPayload {
    let target = match query_type {
        QueryType::Origin => QueryTarget::Origin(normalize_origin(input)),
        QueryType::Url => QueryTarget::Url(normalize_url(input)),
    };

    RequestPayload {
        form_factor,
        target,
    }
}

/// 去除協定與路徑，只保留主機並加上 https://
pub fn normalize_origin(input: &str) -> String {
    let without_scheme = input
        .strip_prefix(HTTPS)
        .or_else(|| input.strip_prefix(HTTP))
        .unwrap_or(input);
    let host = without_scheme.split('/').next().unwrap_or_default();

    format!("{}{}", HTTPS, host)
}

pub fn normalize_url(input: &str) -> String {
    if input.starts_with(HTTP) || input.starts_with(HTTPS) {
        input.to_string()
    } else {
        format!("{}{}", HTTPS, input)
    }
}
