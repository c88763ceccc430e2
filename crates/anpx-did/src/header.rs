use crate::Error;

/// The parsed fields of a `DIDWba` `Authorization` header challenge:
/// `{did, nonce, timestamp, verification_method, signature}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DidWbaChallenge {
    pub did: String,
    pub nonce: String,
    pub timestamp: String,
    pub verification_method: String,
    pub signature: String,
}

const SCHEME: &str = "DIDWba";

/// Parses an `Authorization: DIDWba key="value", key="value", ...`
/// header value. Unrecognized keys are ignored; any of the five
/// required fields missing is a [`Error::MalformedHeader`].
pub fn parse_authorization_header(value: &str) -> Result<DidWbaChallenge, Error> {
    let value = value.trim();
    let rest = value
        .strip_prefix(SCHEME)
        .ok_or(Error::MalformedHeader)?
        .trim_start();

    let mut did = None;
    let mut nonce = None;
    let mut timestamp = None;
    let mut verification_method = None;
    let mut signature = None;

    for field in split_fields(rest) {
        let (key, raw_value) = field.split_once('=').ok_or(Error::MalformedHeader)?;
        let key = key.trim();
        let val = raw_value.trim().trim_matches('"').to_string();
        match key {
            "did" => did = Some(val),
            "nonce" => nonce = Some(val),
            "timestamp" => timestamp = Some(val),
            "verification_method" => verification_method = Some(val),
            "signature" => signature = Some(val),
            _ => {}
        }
    }

    Ok(DidWbaChallenge {
        did: did.ok_or(Error::MalformedHeader)?,
        nonce: nonce.ok_or(Error::MalformedHeader)?,
        timestamp: timestamp.ok_or(Error::MalformedHeader)?,
        verification_method: verification_method.ok_or(Error::MalformedHeader)?,
        signature: signature.ok_or(Error::MalformedHeader)?,
    })
}

/// Splits `key="value", key="value"` fields on top-level commas,
/// tolerating commas embedded inside quoted values.
fn split_fields(input: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (i, c) in input.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(input[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    let tail = input[start..].trim();
    if !tail.is_empty() {
        fields.push(tail);
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_well_formed_challenge() {
        let header = r#"DIDWba did="did:web:example.test", nonce="abc123", timestamp="2026-07-28T00:00:00Z", verification_method="did:web:example.test#key-1", signature="c2ln"#.to_string() + "\"";
        let parsed = parse_authorization_header(&header).unwrap();
        assert_eq!(parsed.did, "did:web:example.test");
        assert_eq!(parsed.nonce, "abc123");
        assert_eq!(parsed.verification_method, "did:web:example.test#key-1");
        assert_eq!(parsed.signature, "c2ln");
    }

    #[test]
    fn rejects_wrong_scheme() {
        let header = r#"Bearer sometoken"#;
        assert!(matches!(
            parse_authorization_header(header),
            Err(Error::MalformedHeader)
        ));
    }

    #[test]
    fn rejects_missing_field() {
        let header = r#"DIDWba did="did:web:example.test", nonce="abc123""#;
        assert!(matches!(
            parse_authorization_header(header),
            Err(Error::MalformedHeader)
        ));
    }
}
