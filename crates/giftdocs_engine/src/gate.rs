/* 📖 # What does the gate actually check?

Nothing real. The demo pretends to authorize a request by looking at the sample
text. Either an `Authorization` header has to still be there, or one payload
field has to hold an allow-listed value. There is no token, no signature and no
secret.
*/

use serde_json::Value;

use crate::representation::Representation;

/// How an endpoint decides between its success and denial responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRule {
    /// Every request passes.
    Open,
    /// The sample must still send an `Authorization` header.
    BearerMarker,
    /// A payload field must hold one of the allowed values.
    AllowListed {
        field: &'static str,
        allowed: &'static [&'static str],
        case_insensitive: bool,
    },
}

const HEADER_LINE_MARKERS: &[&str] = &["Authorization: Bearer"];
const HEADER_KEY_MARKERS: &[&str] = &["'Authorization'", "\"Authorization\""];

/// Substrings that show an authorization header in the given representation.
///
/// curl and PHP build raw header lines, JavaScript and Python use a header map
/// keyed by a quoted `Authorization`.
pub fn authorization_markers(representation: Representation) -> &'static [&'static str] {
    match representation {
        Representation::Curl | Representation::Php => HEADER_LINE_MARKERS,
        Representation::JavaScript | Representation::Python => HEADER_KEY_MARKERS,
    }
}

pub fn has_authorization_marker(text: &str, representation: Representation) -> bool {
    authorization_markers(representation)
        .iter()
        .any(|marker| text.contains(marker))
}

/// True when `payload[field]` is a string equal to one of `allowed`.
pub fn is_allow_listed(
    payload: Option<&Value>,
    field: &str,
    allowed: &[&str],
    case_insensitive: bool,
) -> bool {
    let Some(value) = payload.and_then(|p| p.get(field)).and_then(Value::as_str) else {
        return false;
    };
    allowed.iter().any(|candidate| {
        if case_insensitive {
            candidate.eq_ignore_ascii_case(value)
        } else {
            *candidate == value
        }
    })
}

impl AuthRule {
    /// Applies the rule to the edited sample and its extracted payload.
    pub fn permits(
        &self,
        text: &str,
        representation: Representation,
        payload: Option<&Value>,
    ) -> bool {
        match self {
            AuthRule::Open => true,
            AuthRule::BearerMarker => has_authorization_marker(text, representation),
            AuthRule::AllowListed {
                field,
                allowed,
                case_insensitive,
            } => is_allow_listed(payload, field, allowed, *case_insensitive),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const LOGIN_RULE: AuthRule = AuthRule::AllowListed {
        field: "mobile",
        allowed: &["9182XXXXX94"],
        case_insensitive: false,
    };

    #[test]
    fn test_bearer_markers_per_representation() {
        let curl = "curl -H 'Authorization: Bearer YOUR_API_KEY' https://api.99gift.in/list";
        assert!(has_authorization_marker(curl, Representation::Curl));
        assert!(!has_authorization_marker(
            "curl https://api.99gift.in/list",
            Representation::Curl
        ));

        let js = "headers: { 'Authorization': 'Bearer YOUR_API_KEY' }";
        assert!(has_authorization_marker(js, Representation::JavaScript));
        assert!(!has_authorization_marker(js, Representation::Php));

        let python = "headers={\"Authorization\": \"Bearer YOUR_API_KEY\"}";
        assert!(has_authorization_marker(python, Representation::Python));
    }

    #[test]
    fn test_allow_listed_phone_number() {
        let payload = json!({"mobile": "9182XXXXX94", "password": "test@123"});
        assert!(LOGIN_RULE.permits("", Representation::Curl, Some(&payload)));

        let tampered = json!({"mobile": "9182XXXXX95"});
        assert!(!LOGIN_RULE.permits("", Representation::Curl, Some(&tampered)));

        let wrong_type = json!({"mobile": 918200000094u64});
        assert!(!LOGIN_RULE.permits("", Representation::Curl, Some(&wrong_type)));
        assert!(!LOGIN_RULE.permits("", Representation::Curl, None));
    }

    #[test]
    fn test_case_insensitive_allow_list() {
        let allowed = &["amazon", "amazone"];
        assert!(is_allow_listed(Some(&json!({"search": "Amazone"})), "search", allowed, true));
        assert!(!is_allow_listed(Some(&json!({"search": "Amazone"})), "search", allowed, false));
        assert!(!is_allow_listed(Some(&json!({"search": "banana"})), "search", allowed, true));
    }

    #[test]
    fn test_open_rule_always_permits() {
        assert!(AuthRule::Open.permits("anything", Representation::Python, None));
    }
}
