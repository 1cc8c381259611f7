//! Service shared access signatures for single blobs.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::account::StorageAccount;
use crate::traits::StorageResult;

/// Storage service version used for SAS tokens and REST requests.
pub const SERVICE_VERSION: &str = "2020-12-06";

/// Read-only permission string.
pub const READ_PERMISSION: &str = "r";

/// Signed resource type for a single blob.
const BLOB_RESOURCE: &str = "b";

/// Expiry timestamp as embedded in the `se` parameter (UTC, second precision).
pub fn format_expiry(expiry: DateTime<Utc>) -> String {
    expiry.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// String-to-sign of a blob service SAS for service version 2020-12-06.
///
/// Unused optional fields (start, identifier, IP, protocol, snapshot,
/// encryption scope and the five response header overrides) stay empty.
fn string_to_sign(
    account: &StorageAccount,
    container: &str,
    blob_name: &str,
    permissions: &str,
    expiry: &str,
) -> String {
    let canonicalized_resource = format!(
        "/blob/{}/{}/{}",
        account.account_name(),
        container,
        blob_name
    );

    [
        permissions,
        "",
        expiry,
        canonicalized_resource.as_str(),
        "",
        "",
        "",
        SERVICE_VERSION,
        BLOB_RESOURCE,
        "",
        "",
        "",
        "",
        "",
        "",
        "",
    ]
    .join("\n")
}

/// Query string granting read access to one blob until `expiry`.
pub fn blob_read_sas(
    account: &StorageAccount,
    container: &str,
    blob_name: &str,
    expiry: DateTime<Utc>,
) -> StorageResult<String> {
    let expiry = format_expiry(expiry);
    let signature = account.sign(&string_to_sign(
        account,
        container,
        blob_name,
        READ_PERMISSION,
        &expiry,
    ))?;

    Ok(format!(
        "sp={}&se={}&sv={}&sr={}&sig={}",
        READ_PERMISSION,
        urlencoding::encode(&expiry),
        SERVICE_VERSION,
        BLOB_RESOURCE,
        urlencoding::encode(&signature)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use chrono::TimeZone;
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    const KEY: &str = "c2VjcmV0LWtleS1ieXRlcw==";

    fn account() -> StorageAccount {
        StorageAccount::new("narrata", KEY, "https://narrata.blob.core.windows.net").unwrap()
    }

    fn query_param<'a>(query: &'a str, name: &str) -> Option<&'a str> {
        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v)
    }

    #[test]
    fn test_expiry_format() {
        let expiry = Utc.with_ymd_and_hms(2026, 10, 18, 9, 5, 7).unwrap();
        assert_eq!(format_expiry(expiry), "2026-10-18T09:05:07Z");
    }

    #[test]
    fn test_query_parameters() {
        let expiry = Utc.with_ymd_and_hms(2026, 10, 18, 9, 5, 7).unwrap();
        let query = blob_read_sas(&account(), "audio", "abc.wav", expiry).unwrap();

        assert_eq!(query_param(&query, "sp"), Some("r"));
        assert_eq!(query_param(&query, "sr"), Some("b"));
        assert_eq!(query_param(&query, "sv"), Some(SERVICE_VERSION));
        assert_eq!(query_param(&query, "se"), Some("2026-10-18T09%3A05%3A07Z"));
        assert!(query_param(&query, "sig").is_some());
    }

    #[test]
    fn test_signature_covers_canonical_fields() {
        let expiry = Utc.with_ymd_and_hms(2026, 10, 18, 9, 5, 7).unwrap();
        let query = blob_read_sas(&account(), "images", "abc", expiry).unwrap();
        let sig = urlencoding::decode(query_param(&query, "sig").unwrap()).unwrap();

        let expected_string_to_sign = "r\n\n2026-10-18T09:05:07Z\n/blob/narrata/images/abc\n\n\n\n2020-12-06\nb\n\n\n\n\n\n\n";
        let key = base64::engine::general_purpose::STANDARD.decode(KEY).unwrap();
        let mut mac = Hmac::<Sha256>::new_from_slice(&key).unwrap();
        mac.update(expected_string_to_sign.as_bytes());
        let expected =
            base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes());

        assert_eq!(sig, expected);
    }

    #[test]
    fn test_signature_is_scoped_to_blob() {
        let expiry = Utc.with_ymd_and_hms(2026, 10, 18, 9, 5, 7).unwrap();
        let a = blob_read_sas(&account(), "images", "abc", expiry).unwrap();
        let b = blob_read_sas(&account(), "images", "abd", expiry).unwrap();
        assert_ne!(query_param(&a, "sig"), query_param(&b, "sig"));
    }
}
