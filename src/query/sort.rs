//! Sort parameter parsing
//!
//! Validates a requested sort field against a caller-supplied allow-list and
//! normalizes the sort direction. Requesting no sort at all is valid;
//! requesting a field outside the allow-list is not.
//!
//! # Example
//!
//! ```rust
//! use portico_service::query::{Sort, SortCriteria};
//!
//! let sort = Sort::new(["name", "created_at"]);
//!
//! let params = sort.parse(Some("name"), Some("DESC")).unwrap().unwrap();
//! assert_eq!(params.sort_by, "name");
//! assert_eq!(params.sort_criteria, SortCriteria::Desc);
//!
//! assert!(sort.parse(None, None).unwrap().is_none());
//! assert!(sort.parse(Some("password"), None).is_err());
//! ```

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SortError;

/// Sort direction
///
/// # Example
///
/// ```rust
/// use portico_service::query::SortCriteria;
///
/// assert_eq!(format!("{}", SortCriteria::Asc), "asc");
/// assert_eq!(SortCriteria::default(), SortCriteria::Asc);
/// assert_eq!("DESC".parse::<SortCriteria>().unwrap(), SortCriteria::Desc);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortCriteria {
    /// Ascending order (A-Z, 0-9, oldest first)
    #[default]
    Asc,
    /// Descending order (Z-A, 9-0, newest first)
    Desc,
}

impl fmt::Display for SortCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortCriteria {
    type Err = SortError;

    /// Case-insensitive: `asc`, `ASC`, `Desc` all parse.
    fn from_str(criteria: &str) -> Result<Self, Self::Err> {
        if criteria.eq_ignore_ascii_case("asc") {
            Ok(Self::Asc)
        } else if criteria.eq_ignore_ascii_case("desc") {
            Ok(Self::Desc)
        } else {
            Err(SortError::new(format!("Invalid sort criteria {criteria}")))
        }
    }
}

/// Parsed sort parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortParams {
    /// Field to sort by
    pub sort_by: String,
    /// Normalized sort direction
    pub sort_criteria: SortCriteria,
}

/// Sort parameter parser with a field allow-list
#[derive(Debug, Clone, Default)]
pub struct Sort {
    sortable_fields: HashSet<String>,
}

impl Sort {
    /// Create a parser allowing the given sortable fields
    pub fn new<I, S>(sortable_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sortable_fields: sortable_fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse the requested sort field and criteria
    ///
    /// Returns `Ok(None)` when no sort field is requested. The criteria
    /// defaults to ascending and is matched case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`SortError`] when the requested field is not in the allow-list
    /// (including the empty allow-list case) or the criteria is not
    /// `asc`/`desc`.
    pub fn parse(
        &self,
        requested_field: Option<&str>,
        requested_criteria: Option<&str>,
    ) -> Result<Option<SortParams>, SortError> {
        let Some(field) = requested_field else {
            return Ok(None);
        };

        if !self.sortable_fields.contains(field) {
            return Err(SortError::new(format!("Invalid sort field {field}")));
        }

        let criteria = match requested_criteria {
            Some(criteria) => criteria.parse()?,
            None => SortCriteria::default(),
        };

        Ok(Some(SortParams {
            sort_by: field.to_string(),
            sort_criteria: criteria,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_criteria_display_is_lowercase() {
        assert_eq!(format!("{}", SortCriteria::Asc), "asc");
        assert_eq!(format!("{}", SortCriteria::Desc), "desc");
    }

    #[test]
    fn test_criteria_parses_case_insensitively() {
        assert_eq!("asc".parse::<SortCriteria>().unwrap(), SortCriteria::Asc);
        assert_eq!("ASC".parse::<SortCriteria>().unwrap(), SortCriteria::Asc);
        assert_eq!("Desc".parse::<SortCriteria>().unwrap(), SortCriteria::Desc);
        assert!("ascending".parse::<SortCriteria>().is_err());
    }

    #[test]
    fn test_criteria_serde_round_trip() {
        assert_eq!(
            serde_json::to_string(&SortCriteria::Desc).unwrap(),
            "\"desc\""
        );
        let parsed: SortCriteria = serde_json::from_str("\"asc\"").unwrap();
        assert_eq!(parsed, SortCriteria::Asc);
    }

    #[test]
    fn test_allowed_field_defaults_to_ascending() {
        let sort = Sort::new(["my-field"]);
        let params = sort.parse(Some("my-field"), None).unwrap().unwrap();
        assert_eq!(params.sort_by, "my-field");
        assert_eq!(params.sort_criteria, SortCriteria::Asc);
    }

    #[test]
    fn test_unknown_field_is_an_error() {
        let sort = Sort::new(["other"]);
        let error = sort.parse(Some("my-field"), None).unwrap_err();
        assert_eq!(error.to_string(), "Invalid sort field my-field");
    }

    #[test]
    fn test_empty_allow_list_rejects_any_field() {
        let sort = Sort::new(Vec::<String>::new());
        assert!(sort.parse(Some("name"), None).is_err());
    }

    #[test]
    fn test_absent_field_is_not_an_error() {
        let sort = Sort::new(Vec::<String>::new());
        assert!(sort.parse(None, None).unwrap().is_none());
        // Criteria without a field is ignored too.
        assert!(sort.parse(None, Some("desc")).unwrap().is_none());
    }

    #[test]
    fn test_invalid_criteria_is_an_error() {
        let sort = Sort::new(["name"]);
        let error = sort.parse(Some("name"), Some("sideways")).unwrap_err();
        assert_eq!(error.to_string(), "Invalid sort criteria sideways");
    }

    #[test]
    fn test_uppercase_criteria_is_normalized() {
        let sort = Sort::new(["name"]);
        let params = sort.parse(Some("name"), Some("DESC")).unwrap().unwrap();
        assert_eq!(params.sort_criteria, SortCriteria::Desc);
    }

    #[test]
    fn test_sort_params_serialize_camel_case() {
        let params = SortParams {
            sort_by: "name".to_string(),
            sort_criteria: SortCriteria::Desc,
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["sortBy"], "name");
        assert_eq!(json["sortCriteria"], "desc");
    }
}
