//! Access control over configuration key paths.
//!
//! An ACL is a comma-separated list of key prefixes, each optionally marked
//! `+` (allow, the default) or `-` (deny):
//!
//! ```text
//! -wifi.sta.pass,wifi.*,debug.level
//! ```
//!
//! Rules are evaluated in order and the first one whose pattern matches the
//! beginning of the key decides. Nothing matching, or an empty list, denies.
//! `*` in a pattern matches any run of characters, so `*` alone allows all.

/// One ACL rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessRule<'a> {
    pub allow: bool,
    pub pattern: &'a str,
}

/// Parsed, ordered ACL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessList<'a> {
    rules: Vec<AccessRule<'a>>,
}

impl<'a> AccessList<'a> {
    /// Split an ACL string into rules.
    pub fn parse(acl: &'a str) -> Self {
        let rules = acl
            .split(',')
            .map(str::trim)
            .filter_map(|entry| {
                let (allow, pattern) = match entry.as_bytes().first() {
                    Some(b'-') => (false, &entry[1..]),
                    Some(b'+') => (true, &entry[1..]),
                    _ => (true, entry),
                };
                // "", "-" and "+" carry no pattern.
                (!pattern.is_empty()).then_some(AccessRule { allow, pattern })
            })
            .collect();
        Self { rules }
    }

    /// Allow-all list, used for trusted overlays.
    pub fn allow_all() -> AccessList<'static> {
        AccessList {
            rules: vec![AccessRule {
                allow: true,
                pattern: "*",
            }],
        }
    }

    pub fn rules(&self) -> &[AccessRule<'a>] {
        &self.rules
    }

    /// First-match evaluation; fails closed.
    pub fn allows(&self, key: &str) -> bool {
        self.rules
            .iter()
            .find(|r| matches_prefix(r.pattern.as_bytes(), key.as_bytes()))
            .map_or(false, |r| r.allow)
    }
}

/// Whether `key` is allowed by the ACL string `acl`.
pub fn check_access(key: &str, acl: &str) -> bool {
    AccessList::parse(acl).allows(key)
}

/// Does `pattern` match some prefix of `key`? `*` matches any run.
///
/// Two-pointer glob walk: on a mismatch only the most recent `*` is
/// widened, so the cost stays `O(pattern * key)` however many stars there
/// are. Running out of pattern is a match; the rest of the key is free.
fn matches_prefix(pattern: &[u8], key: &[u8]) -> bool {
    let (mut p, mut k) = (0, 0);
    // (pattern index after the star, key index the star currently ends at)
    let mut star: Option<(usize, usize)> = None;
    loop {
        if p == pattern.len() {
            return true;
        }
        if pattern[p] == b'*' {
            p += 1;
            star = Some((p, k));
        } else if k < key.len() && key[k] == pattern[p] {
            p += 1;
            k += 1;
        } else {
            match star {
                Some((sp, sk)) if sk < key.len() => {
                    star = Some((sp, sk + 1));
                    p = sp;
                    k = sk + 1;
                }
                _ => return false,
            }
        }
    }
}
