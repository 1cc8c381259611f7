//! Shared Key authorization for Blob service REST requests.

use std::collections::BTreeMap;

use reqwest::{Method, Url};

use crate::account::StorageAccount;
use crate::traits::StorageResult;

/// `x-ms-date` value for a request sent now.
pub(crate) fn request_date() -> String {
    chrono::Utc::now()
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

fn canonicalized_headers(ms_headers: &[(&str, String)]) -> String {
    let sorted: BTreeMap<String, &str> = ms_headers
        .iter()
        .map(|(name, value)| (name.to_lowercase(), value.trim()))
        .collect();

    sorted
        .into_iter()
        .map(|(name, value)| format!("{}:{}\n", name, value))
        .collect()
}

fn canonicalized_resource(account: &StorageAccount, url: &Url) -> String {
    let mut params: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in url.query_pairs() {
        params
            .entry(name.to_lowercase())
            .or_default()
            .push(value.into_owned());
    }

    let mut resource = format!("/{}{}", account.account_name(), url.path());
    for (name, mut values) in params {
        values.sort();
        resource.push_str(&format!("\n{}:{}", name, values.join(",")));
    }
    resource
}

/// String-to-sign for the Blob service (version 2015-02-21 and later).
pub(crate) fn string_to_sign(
    account: &StorageAccount,
    method: &Method,
    url: &Url,
    content_length: usize,
    content_type: Option<&str>,
    ms_headers: &[(&str, String)],
) -> String {
    let content_length = if content_length == 0 {
        String::new()
    } else {
        content_length.to_string()
    };

    format!(
        "{}\n\n\n{}\n\n{}\n\n\n\n\n\n\n{}{}",
        method.as_str(),
        content_length,
        content_type.unwrap_or_default(),
        canonicalized_headers(ms_headers),
        canonicalized_resource(account, url)
    )
}

/// `Authorization` header value for the request.
pub(crate) fn authorization(
    account: &StorageAccount,
    method: &Method,
    url: &Url,
    content_length: usize,
    content_type: Option<&str>,
    ms_headers: &[(&str, String)],
) -> StorageResult<String> {
    let signature = account.sign(&string_to_sign(
        account,
        method,
        url,
        content_length,
        content_type,
        ms_headers,
    ))?;
    Ok(format!("SharedKey {}:{}", account.account_name(), signature))
}
