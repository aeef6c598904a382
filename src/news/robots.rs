//! Minimal robots.txt evaluation.
//!
//! Supports `User-agent`, `Allow` and `Disallow` lines, the `*` wildcard and
//! the `$` end anchor. The longest matching rule wins and `Allow` wins ties.

use log::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Rule {
    allow: bool,
    pattern: String,
}

#[derive(Debug, Clone, Default)]
struct Group {
    agents: Vec<String>,
    rules: Vec<Rule>,
}

/// Parsed robots.txt.
#[derive(Debug, Clone, Default)]
pub struct RobotsPolicy {
    groups: Vec<Group>,
}

impl RobotsPolicy {
    pub fn parse(text: &str) -> Self {
        let mut groups: Vec<Group> = Vec::new();
        let mut current = Group::default();
        let mut in_rules = false;

        for raw in text.lines() {
            let line = raw.split('#').next().unwrap_or("").trim();
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim().to_ascii_lowercase();
            let value = value.trim();

            match key.as_str() {
                "user-agent" => {
                    // A user-agent line after rules starts a new group
                    if in_rules {
                        groups.push(std::mem::take(&mut current));
                        in_rules = false;
                    }
                    if !value.is_empty() {
                        current.agents.push(value.to_ascii_lowercase());
                    }
                }
                "allow" | "disallow" => {
                    in_rules = true;
                    // An empty Disallow allows everything
                    if value.is_empty() {
                        continue;
                    }
                    current.rules.push(Rule {
                        allow: key == "allow",
                        pattern: value.to_string(),
                    });
                }
                _ => {}
            }
        }
        if !current.agents.is_empty() {
            groups.push(current);
        }

        debug!("Parsed robots.txt with {} groups", groups.len());
        RobotsPolicy { groups }
    }

    /// Whether `agent` may fetch `path`. Falls back to the `*` group when no
    /// group names the agent, and allows everything when neither exists.
    pub fn is_allowed(&self, agent: &str, path: &str) -> bool {
        let agent = agent.to_ascii_lowercase();
        let named: Vec<&Group> = self
            .groups
            .iter()
            .filter(|g| {
                agent != "*"
                    && g.agents
                        .iter()
                        .any(|a| a != "*" && agent.contains(a.as_str()))
            })
            .collect();
        let groups = if named.is_empty() {
            self.groups
                .iter()
                .filter(|g| g.agents.iter().any(|a| a == "*"))
                .collect()
        } else {
            named
        };

        let mut best: Option<&Rule> = None;
        for rule in groups.iter().flat_map(|g| g.rules.iter()) {
            if !pattern_matches(&rule.pattern, path) {
                continue;
            }
            best = match best {
                Some(current)
                    if current.pattern.len() > rule.pattern.len()
                        || (current.pattern.len() == rule.pattern.len() && current.allow) =>
                {
                    Some(current)
                }
                _ => Some(rule),
            };
        }
        best.map_or(true, |rule| rule.allow)
    }
}

/// Matches a robots path pattern against the start of `path`.
fn pattern_matches(pattern: &str, path: &str) -> bool {
    let (pattern, anchored) = match pattern.strip_suffix('$') {
        Some(p) => (p, true),
        None => (pattern, false),
    };
    let pieces: Vec<&str> = pattern.split('*').collect();

    let Some(first) = pieces.first() else {
        return true;
    };
    if !path.starts_with(first) {
        return false;
    }
    let mut pos = first.len();
    for (i, piece) in pieces.iter().enumerate().skip(1) {
        let last = i == pieces.len() - 1;
        if last && anchored {
            return path.len() >= pos + piece.len() && path.ends_with(piece);
        }
        match path[pos..].find(piece) {
            Some(offset) => pos += offset + piece.len(),
            None => return false,
        }
    }
    !anchored || pos == path.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# sample
User-agent: *
Disallow: /search
Disallow: /private/
Allow: /private/open
Disallow: /*.pdf$

User-agent: BadBot
Disallow: /
";

    #[test]
    fn test_wildcard_group_rules() {
        let policy = RobotsPolicy::parse(SAMPLE);
        assert!(policy.is_allowed("*", "/"));
        assert!(policy.is_allowed("*", "/topics/"));
        assert!(!policy.is_allowed("*", "/search?q=x"));
        assert!(!policy.is_allowed("*", "/private/data"));
        assert!(policy.is_allowed("*", "/private/open/page"));
        assert!(!policy.is_allowed("*", "/docs/report.pdf"));
        assert!(policy.is_allowed("*", "/docs/report.pdf.html"));
    }

    #[test]
    fn test_named_agent_group() {
        let policy = RobotsPolicy::parse(SAMPLE);
        assert!(!policy.is_allowed("BadBot", "/topics/"));
        assert!(policy.is_allowed("GoodBot", "/topics/"));
    }

    #[test]
    fn test_empty_policy_allows_everything() {
        let policy = RobotsPolicy::parse("");
        assert!(policy.is_allowed("*", "/anything"));
        let policy = RobotsPolicy::parse("User-agent: *\nDisallow:\n");
        assert!(policy.is_allowed("*", "/anything"));
    }

    #[test]
    fn test_pattern_matches() {
        assert!(pattern_matches("/", "/categories/"));
        assert!(pattern_matches("/cat*/x", "/categories/x/y"));
        assert!(!pattern_matches("/topics", "/categories/"));
        assert!(pattern_matches("/a$", "/a"));
        assert!(!pattern_matches("/a$", "/ab"));
    }
}
