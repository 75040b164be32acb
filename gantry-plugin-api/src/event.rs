//! Event-name construction.
//!
//! Event names are colon-delimited. A command path `["deploy", "onpremises"]`
//! with stage `functions` produces:
//!
//! ```text
//! before:deploy:onpremises:functions
//! deploy:onpremises:functions
//! after:deploy:onpremises:functions
//! ```

/// Prefix marking a pre-stage event.
pub const BEFORE: &str = "before";

/// Prefix marking a post-stage event.
pub const AFTER: &str = "after";

/// The stage's own event name: `<path>:<stage>`.
pub fn qualified(path: &[String], stage: &str) -> String {
    format!("{}:{}", path.join(":"), stage)
}

/// The pre-stage event name: `before:<path>:<stage>`.
pub fn before(path: &[String], stage: &str) -> String {
    format!("{}:{}", BEFORE, qualified(path, stage))
}

/// The post-stage event name: `after:<path>:<stage>`.
pub fn after(path: &[String], stage: &str) -> String {
    format!("{}:{}", AFTER, qualified(path, stage))
}

/// The full before → stage → after triple for one stage, in firing order.
pub fn phases(path: &[String], stage: &str) -> [String; 3] {
    [
        before(path, stage),
        qualified(path, stage),
        after(path, stage),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_qualified_root_command() {
        assert_eq!(qualified(&path(&["deploy"]), "functions"), "deploy:functions");
    }

    #[test]
    fn test_qualified_nested_command() {
        assert_eq!(
            qualified(&path(&["deploy", "onpremises"]), "resources"),
            "deploy:onpremises:resources"
        );
    }

    #[test]
    fn test_phases_order() {
        let [b, m, a] = phases(&path(&["deploy"]), "resources");
        assert_eq!(b, "before:deploy:resources");
        assert_eq!(m, "deploy:resources");
        assert_eq!(a, "after:deploy:resources");
    }
}
