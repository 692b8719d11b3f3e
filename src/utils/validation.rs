use crate::utils::error::{Result, VitalsError};
use url::Url;

/// The dashboard compares at most this many domains per submission.
pub const MAX_DOMAINS: usize = 4;

pub const OUTPUT_FORMATS: [&str; 3] = ["console", "json", "csv"];

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(VitalsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(VitalsError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(VitalsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(VitalsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_output_formats(field_name: &str, formats: &[String]) -> Result<()> {
    for format in formats {
        if !OUTPUT_FORMATS.contains(&format.as_str()) {
            return Err(VitalsError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: format.clone(),
                reason: format!(
                    "Unsupported format. Valid formats: {}",
                    OUTPUT_FORMATS.join(", ")
                ),
            });
        }
    }
    Ok(())
}

/// 檢查網域清單：最多四筆，且至少一筆非空白
pub fn validate_domain_entries(entries: &[String]) -> Result<()> {
    if entries.len() > MAX_DOMAINS {
        return Err(VitalsError::validation(format!(
            "Too many domains: {} given, at most {} can be compared",
            entries.len(),
            MAX_DOMAINS
        )));
    }

    if entries.iter().all(|entry| entry.trim().is_empty()) {
        return Err(VitalsError::validation("No domains to check"));
    }

    Ok(())
}

/// A built query target must be an http(s) URL with a host.
pub fn validate_target(entry: &str, target: &str) -> Result<()> {
    let has_host = Url::parse(target)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .and_then(|url| url.host_str().map(|host| !host.is_empty()))
        .unwrap_or(false);

    if has_host {
        Ok(())
    } else {
        Err(VitalsError::validation(format!("Invalid domain: {}", entry)))
    }
}
