//! Redaction rules: one pattern and one placeholder per class of sensitive text.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// Placeholder for credential values.
pub const REDACTED: &str = "<REDACTED>";
/// Placeholder for email addresses.
pub const EMAIL: &str = "<EMAIL>";
/// Placeholder for IPv4 addresses.
pub const IP: &str = "<IP>";
/// Placeholder for the username segment of a home directory.
pub const USER: &str = "<USER>";

/// Substrings that mark a `name=value` / `name: value` pair as a credential.
pub const CREDENTIAL_KEYWORDS: &[&str] = &[
    "api_key",
    "api_token",
    "auth_token",
    "password",
    "passwd",
    "token",
    "secret",
    "key",
    "auth",
];

// Name, separator, value. The name may carry any prefix/suffix around the keyword
// (DB_PASSWORD, gpg.signingkey), the value runs up to the next whitespace.
static CREDENTIAL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let keywords = CREDENTIAL_KEYWORDS.join("|");
    Regex::new(&format!(
        r"(?i)(?P<name>[A-Za-z0-9_.\-]*(?:{keywords})[A-Za-z0-9_.\-]*)(?P<sep>\s*[=:]\s*)(?P<value>\S+)"
    ))
    .unwrap()
});

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}").unwrap());

static IPV4_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\b").unwrap());

// Username characters only; quotes and separators after the name stay in place.
static HOME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/home/[A-Za-z0-9._\-]+").unwrap());

/// Class of sensitive text a rule masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// `name=value` where the name looks like a credential.
    Credential,
    /// Email address.
    Email,
    /// Dotted-quad IPv4 address.
    Ipv4,
    /// `/home/<name>` prefix.
    HomePath,
    /// User-defined pattern from the policy file.
    Custom,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Credential => "credential",
            RuleKind::Email => "email",
            RuleKind::Ipv4 => "ipv4",
            RuleKind::HomePath => "home_path",
            RuleKind::Custom => "custom",
        }
    }
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How strictly dotted quads are matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ipv4Mode {
    /// Any `d.d.d.d` with 1-3 digit groups, including version strings.
    #[default]
    Syntactic,
    /// Only quads whose octets are all in 0..=255.
    Strict,
}

/// How a rule turns a match into its replacement.
#[derive(Debug, Clone)]
enum Replacer {
    /// Keep the credential name and separator, mask the value.
    MaskValue,
    /// Replace the whole match.
    Whole(String),
    /// Replace the whole match only when every octet is a valid byte.
    StrictIpv4(String),
    /// Keep `/home/`, mask the username segment.
    HomeUser,
    /// Regex replacement template with `$1`-style group references.
    Template(String),
}

/// An ordered (matcher, replacer) pair.
#[derive(Debug, Clone)]
pub struct RedactionRule {
    name: String,
    kind: RuleKind,
    pattern: Regex,
    replacer: Replacer,
}

impl RedactionRule {
    /// Credential assignment rule.
    pub fn credential() -> Self {
        Self {
            name: RuleKind::Credential.as_str().to_string(),
            kind: RuleKind::Credential,
            pattern: CREDENTIAL_PATTERN.clone(),
            replacer: Replacer::MaskValue,
        }
    }

    /// Email address rule.
    pub fn email() -> Self {
        Self {
            name: RuleKind::Email.as_str().to_string(),
            kind: RuleKind::Email,
            pattern: EMAIL_PATTERN.clone(),
            replacer: Replacer::Whole(EMAIL.to_string()),
        }
    }

    /// IPv4 rule in the given mode.
    pub fn ipv4(mode: Ipv4Mode) -> Self {
        let replacer = match mode {
            Ipv4Mode::Syntactic => Replacer::Whole(IP.to_string()),
            Ipv4Mode::Strict => Replacer::StrictIpv4(IP.to_string()),
        };
        Self {
            name: RuleKind::Ipv4.as_str().to_string(),
            kind: RuleKind::Ipv4,
            pattern: IPV4_PATTERN.clone(),
            replacer,
        }
    }

    /// Home directory rule.
    pub fn home_path() -> Self {
        Self {
            name: RuleKind::HomePath.as_str().to_string(),
            kind: RuleKind::HomePath,
            pattern: HOME_PATTERN.clone(),
            replacer: Replacer::HomeUser,
        }
    }

    /// User-defined rule. `replacement` may reference capture groups (`$1`, `${name}`).
    pub fn custom(name: impl Into<String>, pattern: Regex, replacement: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: RuleKind::Custom,
            pattern,
            replacer: Replacer::Template(replacement.into()),
        }
    }

    /// The four built-in rules in application order.
    pub fn builtin(ipv4_mode: Ipv4Mode) -> Vec<Self> {
        vec![
            Self::credential(),
            Self::email(),
            Self::ipv4(ipv4_mode),
            Self::home_path(),
        ]
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    /// Apply the rule to one line.
    ///
    /// Returns the rewritten line and the number of matches whose replacement
    /// differs from the matched text.
    pub fn apply(&self, line: &str) -> (String, usize) {
        let mut hits = 0;
        let output = self
            .pattern
            .replace_all(line, |caps: &Captures<'_>| {
                let whole = &caps[0];
                let replaced = self.replacement_for(caps);
                if replaced != whole {
                    hits += 1;
                }
                replaced
            })
            .into_owned();
        (output, hits)
    }

    fn replacement_for(&self, caps: &Captures<'_>) -> String {
        match &self.replacer {
            Replacer::MaskValue => format!("{}{}{}", &caps["name"], &caps["sep"], REDACTED),
            Replacer::Whole(placeholder) => placeholder.clone(),
            Replacer::StrictIpv4(placeholder) => {
                let valid = caps[0].split('.').all(|octet| octet.parse::<u8>().is_ok());
                if valid {
                    placeholder.clone()
                } else {
                    caps[0].to_string()
                }
            }
            Replacer::HomeUser => format!("/home/{}", USER),
            Replacer::Template(template) => {
                let mut out = String::new();
                caps.expand(template, &mut out);
                out
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_masks_value_only() {
        let (out, hits) = RedactionRule::credential().apply("password=hunter2");
        assert_eq!(out, "password=<REDACTED>");
        assert_eq!(hits, 1);
    }

    #[test]
    fn test_credential_colon_form_keeps_spacing() {
        let (out, _) = RedactionRule::credential().apply("  api_token:   abc123 # comment");
        assert_eq!(out, "  api_token:   <REDACTED> # comment");
    }

    #[test]
    fn test_credential_name_is_case_insensitive_substring() {
        let (out, _) = RedactionRule::credential().apply("export DB_PASSWORD=s3cr3t");
        assert_eq!(out, "export DB_PASSWORD=<REDACTED>");

        let (out, _) = RedactionRule::credential().apply("\tsigningkey = 0xDEADBEEF");
        assert_eq!(out, "\tsigningkey = <REDACTED>");
    }

    #[test]
    fn test_credential_requires_separator_and_value() {
        let rule = RedactionRule::credential();
        assert_eq!(rule.apply("passwordless login enabled").0, "passwordless login enabled");
        assert_eq!(rule.apply("token:").0, "token:");
    }

    #[test]
    fn test_credential_reapplied_counts_zero() {
        let (out, hits) = RedactionRule::credential().apply("secret=<REDACTED>");
        assert_eq!(out, "secret=<REDACTED>");
        assert_eq!(hits, 0);
    }

    #[test]
    fn test_email_whole_match() {
        let (out, hits) = RedactionRule::email().apply("From: Alice <alice.smith+dev@example.co.uk>");
        assert_eq!(out, "From: Alice <<EMAIL>>");
        assert_eq!(hits, 1);
    }

    #[test]
    fn test_email_needs_alpha_tld() {
        let (out, hits) = RedactionRule::email().apply("root@10.0.0.1");
        assert_eq!(out, "root@10.0.0.1");
        assert_eq!(hits, 0);
    }

    #[test]
    fn test_ipv4_syntactic_overmatches_versions() {
        let rule = RedactionRule::ipv4(Ipv4Mode::Syntactic);
        assert_eq!(rule.apply("inet 192.168.1.20/24").0, "inet <IP>/24");
        assert_eq!(rule.apply("linux-firmware 1.2.3.4").0, "linux-firmware <IP>");
        assert_eq!(rule.apply("999.999.999.999").0, "<IP>");
    }

    #[test]
    fn test_ipv4_strict_rejects_large_octets() {
        let rule = RedactionRule::ipv4(Ipv4Mode::Strict);
        let (out, hits) = rule.apply("999.1.1.1 and 10.0.0.1");
        assert_eq!(out, "999.1.1.1 and <IP>");
        assert_eq!(hits, 1);
    }

    #[test]
    fn test_ipv4_ignores_longer_digit_runs() {
        let rule = RedactionRule::ipv4(Ipv4Mode::Syntactic);
        assert_eq!(rule.apply("1.2.3.4444").0, "1.2.3.4444");
        assert_eq!(rule.apply("1.2.3").0, "1.2.3");
    }

    #[test]
    fn test_home_path_keeps_rest() {
        let rule = RedactionRule::home_path();
        assert_eq!(rule.apply("/home/alice/projects").0, "/home/<USER>/projects");
        assert_eq!(rule.apply("cd /home/bob").0, "cd /home/<USER>");
        assert_eq!(rule.apply("/homework/x").0, "/homework/x");
    }

    #[test]
    fn test_home_path_keeps_trailing_delimiters() {
        let rule = RedactionRule::home_path();
        assert_eq!(
            rule.apply(r#"export PATH="/home/alice""#).0,
            r#"export PATH="/home/<USER>""#
        );
        assert_eq!(
            rule.apply("alice:x:1000:1000::/home/alice:/bin/bash").0,
            "alice:x:1000:1000::/home/<USER>:/bin/bash"
        );
        assert_eq!(rule.apply("cd /home/alice; ls").0, "cd /home/<USER>; ls");
        assert_eq!(rule.apply("('/home/bob.old', x)").0, "('/home/<USER>', x)");
    }

    #[test]
    fn test_ipv4_matches_ascii_digits_only() {
        let quad = "\u{0661}.\u{0662}.\u{0663}.\u{0664}";
        for mode in [Ipv4Mode::Syntactic, Ipv4Mode::Strict] {
            let (out, hits) = RedactionRule::ipv4(mode).apply(quad);
            assert_eq!(out, quad);
            assert_eq!(hits, 0);
        }
    }

    #[test]
    fn test_custom_template_expands_groups() {
        let pattern = Regex::new(r"(serial)=(\w+)").unwrap();
        let rule = RedactionRule::custom("serials", pattern, "$1=<SERIAL>");
        assert_eq!(rule.apply("serial=ABC123 ok").0, "serial=<SERIAL> ok");
        assert_eq!(rule.kind(), RuleKind::Custom);
        assert_eq!(rule.name(), "serials");
    }

    #[test]
    fn test_builtin_order() {
        let kinds: Vec<_> = RedactionRule::builtin(Ipv4Mode::default())
            .iter()
            .map(|r| r.kind())
            .collect();
        assert_eq!(
            kinds,
            vec![
                RuleKind::Credential,
                RuleKind::Email,
                RuleKind::Ipv4,
                RuleKind::HomePath
            ]
        );
    }
}
