use crate::error::{Result, TaskError};
use crate::model::task::TaskId;

/// Joins command-line words into one task text.
pub fn join_words(args: &[String]) -> String {
    args.iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolves an id or unique id prefix against `candidates`.
pub fn expand_id<'a, I>(prefix: &str, candidates: I) -> Result<TaskId>
where
    I: IntoIterator<Item = &'a TaskId>,
{
    let prefix = prefix.trim();
    if prefix.is_empty() {
        return Err(TaskError::UnknownId(prefix.to_string()));
    }

    let mut matches = Vec::new();
    for id in candidates {
        // 1. Exact match
        if id.as_str() == prefix {
            return Ok(id.clone());
        }
        // 2. Prefix match
        if id.as_str().starts_with(prefix) {
            matches.push(id);
        }
    }

    match matches.len() {
        1 => Ok(matches[0].clone()),
        0 => Err(TaskError::UnknownId(prefix.to_string())),
        _ => Err(TaskError::AmbiguousId {
            prefix: prefix.to_string(),
            candidates: matches.iter().map(|id| id.to_string()).collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_words() {
        let args = vec!["Buy".to_string(), "milk".to_string()];
        assert_eq!(join_words(&args), "Buy milk");
        assert_eq!(join_words(&[]), "");
    }

    #[test]
    fn test_expand_id() {
        let ids: Vec<TaskId> = ["abc123", "abd456", "ab"].iter().map(|s| TaskId::from(*s)).collect();

        assert_eq!(expand_id("abc", &ids).unwrap().as_str(), "abc123");
        assert_eq!(expand_id("abd456", &ids).unwrap().as_str(), "abd456");
        // Exact match beats the prefix ambiguity.
        assert_eq!(expand_id("ab", &ids).unwrap().as_str(), "ab");

        assert!(matches!(
            expand_id("a", &ids),
            Err(TaskError::AmbiguousId { ref candidates, .. }) if candidates.len() == 3
        ));
        assert!(matches!(expand_id("x", &ids), Err(TaskError::UnknownId(_))));
        assert!(matches!(expand_id("  ", &ids), Err(TaskError::UnknownId(_))));
    }
}
