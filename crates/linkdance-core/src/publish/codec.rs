//! Profile token codec
//!
//! A token is the compact JSON of a profile, base64 encoded with the standard
//! alphabet and padding. It goes into the view URL as the `data` query value.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use thiserror::Error;

use crate::models::Profile;

/// Path of the read-only viewer
pub const VIEW_PATH: &str = "/view";

/// Query parameter carrying the token
pub const DATA_PARAM: &str = "data";

/// Standard alphabet, padding optional on decode
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// URL-safe alphabet, padding optional on decode
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// A token could not be turned back into a profile
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Token is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("Token payload is not UTF-8 text: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Token payload is not a profile: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Encode a profile into a URL-embeddable token
pub fn encode(profile: &Profile) -> String {
    // Strings, sequences and integer timestamps only; serialization cannot fail
    let json = serde_json::to_string(profile).expect("profile serializes to JSON");
    STANDARD.encode(json)
}

/// Decode a token back into a profile
///
/// Never returns partial data: the payload must carry every required field.
/// Spaces are read as `+`, since form decoding of a query string turns an
/// unescaped `+` into a space. URL-safe tokens are accepted too.
pub fn decode(token: &str) -> Result<Profile, DecodeError> {
    let token: String = token
        .trim_matches(|c: char| c == '\n' || c == '\r' || c == '\t')
        .chars()
        .map(|c| if c == ' ' { '+' } else { c })
        .collect();

    let bytes = STANDARD_LENIENT
        .decode(&token)
        .or_else(|e| URL_SAFE_LENIENT.decode(&token).map_err(|_| e))?;
    let json = String::from_utf8(bytes)?;
    Ok(serde_json::from_str(&json)?)
}

/// Compose the view URL for a token
pub fn build_view_url(origin: &str, token: &str) -> String {
    format!(
        "{}{}?{}={}",
        origin.trim_end_matches('/'),
        VIEW_PATH,
        DATA_PARAM,
        token
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LinkItem, Platform};

    fn sample() -> Profile {
        let mut profile = Profile::demo();
        profile.description = "Designer · café ☕ and «quotes» \"escaped\"".to_string();
        profile.links.push(LinkItem::new("No icon", "https://example.com/?a=1&b=2"));
        profile.upsert_social_link(Platform::from("mastodon"), "https://m.example/@jane");
        profile.published_url = Some("https://short.example/abc".to_string());
        profile
    }

    #[test]
    fn test_round_trip() {
        let profile = sample();
        let token = encode(&profile);
        assert_eq!(decode(&token).unwrap(), profile);
    }

    #[test]
    fn test_round_trip_empty_profile() {
        let profile = Profile::new("profile-empty");
        assert_eq!(decode(&encode(&profile)).unwrap(), profile);
    }

    #[test]
    fn test_token_is_standard_base64_of_json() {
        let profile = Profile::new("p1");
        let token = encode(&profile);
        let json = String::from_utf8(STANDARD.decode(&token).unwrap()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["id"], "p1");
        assert_eq!(value["photoUrl"], "");
    }

    #[test]
    fn test_decode_rejects_invalid_base64() {
        assert!(matches!(
            decode("not-valid-base64!!"),
            Err(DecodeError::Encoding(_))
        ));
    }

    #[test]
    fn test_decode_rejects_non_json() {
        let token = STANDARD.encode("hello there");
        assert!(matches!(decode(&token), Err(DecodeError::Payload(_))));
    }

    #[test]
    fn test_decode_rejects_missing_fields() {
        let token = STANDARD.encode(r#"{"id":"p1","name":"Jane"}"#);
        assert!(matches!(decode(&token), Err(DecodeError::Payload(_))));
    }

    #[test]
    fn test_decode_rejects_non_utf8() {
        let token = STANDARD.encode([0xff, 0xfe, 0xfd]);
        assert!(matches!(decode(&token), Err(DecodeError::Utf8(_))));
    }

    #[test]
    fn test_decode_accepts_camel_case_wire_format() {
        let json = r#"{"id":"profile-1700000000000","name":"Jane","description":"","photoUrl":"","links":[{"id":"1","label":"Blog","url":"https://b.example","icon":"feather"}],"socialLinks":[{"platform":"github","url":"https://github.com/j"}],"createdAt":1700000000000,"updatedAt":1700000000500}"#;
        let profile = decode(&STANDARD.encode(json)).unwrap();
        assert_eq!(profile.name, "Jane");
        assert_eq!(profile.links[0].icon.as_deref(), Some("feather"));
        assert_eq!(profile.social_links[0].platform, Platform::Github);
        assert_eq!(profile.updated_at.timestamp_millis(), 1700000000500);
    }

    #[test]
    fn test_decode_tolerates_form_decoded_plus() {
        let profile = sample();
        let token = encode(&profile);
        let mangled = token.replace('+', " ");
        assert_eq!(decode(&mangled).unwrap(), profile);
    }

    #[test]
    fn test_decode_accepts_unpadded_and_url_safe() {
        let profile = sample();
        let token = encode(&profile);
        let unpadded = token.trim_end_matches('=');
        assert_eq!(decode(unpadded).unwrap(), profile);

        let url_safe = token.replace('+', "-").replace('/', "_");
        assert_eq!(decode(&url_safe).unwrap(), profile);
    }

    #[test]
    fn test_build_view_url() {
        assert_eq!(
            build_view_url("https://bio.example", "abc="),
            "https://bio.example/view?data=abc="
        );
        assert_eq!(
            build_view_url("https://bio.example/", "abc="),
            "https://bio.example/view?data=abc="
        );
    }
}
