use std::fmt;
use std::str::FromStr;

use crate::error::TaskError;
use crate::model::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Active => "active",
            Filter::Completed => "completed",
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !task.completed,
            Filter::Completed => task.completed,
        }
    }

    /// Cycles all -> active -> completed -> all.
    pub fn next(&self) -> Filter {
        match self {
            Filter::All => Filter::Active,
            Filter::Active => Filter::Completed,
            Filter::Completed => Filter::All,
        }
    }
}

impl FromStr for Filter {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "active" => Ok(Filter::Active),
            "completed" => Ok(Filter::Completed),
            _ => Err(TaskError::InvalidFilter(s.to_string())),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter() {
        assert_eq!("all".parse::<Filter>().unwrap(), Filter::All);
        assert_eq!("Active".parse::<Filter>().unwrap(), Filter::Active);
        assert_eq!(" completed ".parse::<Filter>().unwrap(), Filter::Completed);
    }

    #[test]
    fn test_parse_unknown_filter_fails() {
        let err = "done".parse::<Filter>().unwrap_err();
        assert!(matches!(err, TaskError::InvalidFilter(ref v) if v == "done"));
    }

    #[test]
    fn test_next_cycles() {
        let mut filter = Filter::All;
        for expected in [Filter::Active, Filter::Completed, Filter::All] {
            filter = filter.next();
            assert_eq!(filter, expected);
        }
    }
}
