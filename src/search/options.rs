// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Query options: paging, ordering, highlighting, projection and scoring.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Options appended after the JSON query argument.
///
/// # Example
///
/// ```rust
/// use search_index::search::{QueryOptions, SortDirection};
///
/// let options = QueryOptions::new()
///     .limit(10)
///     .offset(20)
///     .order_by("price", Some(SortDirection::Desc))
///     .select(["name", "price"]);
/// assert_eq!(options.limit, Some(10));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    /// Maximum number of results to return
    pub limit: Option<u64>,
    /// Number of results to skip
    pub offset: Option<u64>,
    /// Return only keys and scores
    pub no_content: bool,
    /// Sort by field (requires a FAST field)
    pub order_by: Option<OrderBy>,
    pub highlight: Option<Highlight>,
    /// Fields to return. `Some(vec![])` means keys and scores only.
    pub select: Option<Vec<String>>,
    pub score_func: Option<ScoreFunction>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    #[must_use]
    pub fn no_content(mut self) -> Self {
        self.no_content = true;
        self
    }

    #[must_use]
    pub fn order_by(mut self, field: impl Into<String>, direction: Option<SortDirection>) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    #[must_use]
    pub fn highlight(mut self, highlight: Highlight) -> Self {
        self.highlight = Some(highlight);
        self
    }

    #[must_use]
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn score_func(mut self, score_func: ScoreFunction) -> Self {
        self.score_func = Some(score_func);
        self
    }

    /// Whether results will come back without field values.
    pub fn returns_no_content(&self) -> bool {
        self.no_content || matches!(&self.select, Some(fields) if fields.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Option<SortDirection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Highlight matched terms in the given fields.
///
/// Tags are only sent when both are present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Highlight {
    pub fields: Vec<String>,
    pub pre_tag: Option<String>,
    pub post_tag: Option<String>,
}

impl Highlight {
    pub fn fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn tags(mut self, pre: impl Into<String>, post: impl Into<String>) -> Self {
        self.pre_tag = Some(pre.into());
        self.post_tag = Some(post.into());
        self
    }
}

/// Score documents from the values of FAST numeric fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreFunction {
    /// How field scores are combined; only sent with two or more fields
    /// (defaults to MULTIPLY there).
    pub combine_mode: Option<CombineMode>,
    /// How the function score is applied to the relevance score
    pub score_mode: Option<ScoreMode>,
    pub fields: Vec<FieldValueScore>,
}

impl ScoreFunction {
    pub fn field(field: FieldValueScore) -> Self {
        Self {
            fields: vec![field],
            ..Self::default()
        }
    }

    pub fn fields(fields: impl IntoIterator<Item = FieldValueScore>) -> Self {
        Self {
            fields: fields.into_iter().collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn combine_mode(mut self, mode: CombineMode) -> Self {
        self.combine_mode = Some(mode);
        self
    }

    #[must_use]
    pub fn score_mode(mut self, mode: ScoreMode) -> Self {
        self.score_mode = Some(mode);
        self
    }
}

/// One `FIELDVALUE` group.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValueScore {
    pub field: String,
    pub modifier: Option<Modifier>,
    pub factor: Option<f64>,
    /// Value used when the document has no value for the field
    pub missing: Option<f64>,
}

impl FieldValueScore {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            modifier: None,
            factor: None,
            missing: None,
        }
    }

    #[must_use]
    pub fn modifier(mut self, modifier: Modifier) -> Self {
        self.modifier = Some(modifier);
        self
    }

    #[must_use]
    pub fn factor(mut self, factor: f64) -> Self {
        self.factor = Some(factor);
        self
    }

    #[must_use]
    pub fn missing(mut self, missing: f64) -> Self {
        self.missing = Some(missing);
        self
    }
}

macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $token:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $token),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_enum!(
    /// How the function score is applied to the relevance score.
    ScoreMode {
        Multiply => "MULTIPLY",
        Sum => "SUM",
        Replace => "REPLACE",
    }
);

wire_enum!(
    /// How several field scores are combined.
    CombineMode {
        Multiply => "MULTIPLY",
        Sum => "SUM",
    }
);

wire_enum!(
    /// Transformation applied to a field value before scoring.
    Modifier {
        None => "NONE",
        Log => "LOG",
        Log1p => "LOG1P",
        Log2p => "LOG2P",
        Ln => "LN",
        Ln1p => "LN1P",
        Ln2p => "LN2P",
        Square => "SQUARE",
        Sqrt => "SQRT",
        Reciprocal => "RECIPROCAL",
    }
);

/// Keyword set for ordering and projection.
///
/// Two grammars exist for the same concepts; the current one is the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryDialect {
    /// `ORDERBY` / `SELECT`
    #[default]
    Current,
    /// `SORTBY` / `RETURN`
    Legacy,
}

impl QueryDialect {
    pub fn order_keyword(&self) -> &'static str {
        match self {
            QueryDialect::Current => "ORDERBY",
            QueryDialect::Legacy => "SORTBY",
        }
    }

    pub fn select_keyword(&self) -> &'static str {
        match self {
            QueryDialect::Current => "SELECT",
            QueryDialect::Legacy => "RETURN",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_select_means_no_content() {
        assert!(!QueryOptions::new().returns_no_content());
        assert!(QueryOptions::new().select(Vec::<String>::new()).returns_no_content());
        assert!(QueryOptions::new().no_content().returns_no_content());
        assert!(!QueryOptions::new().select(["name"]).returns_no_content());
    }

    #[test]
    fn test_dialect_keywords() {
        assert_eq!(QueryDialect::default().order_keyword(), "ORDERBY");
        assert_eq!(QueryDialect::default().select_keyword(), "SELECT");
        assert_eq!(QueryDialect::Legacy.order_keyword(), "SORTBY");
        assert_eq!(QueryDialect::Legacy.select_keyword(), "RETURN");
    }

    #[test]
    fn test_wire_tokens() {
        assert_eq!(Modifier::Log1p.to_string(), "LOG1P");
        assert_eq!(ScoreMode::Replace.as_str(), "REPLACE");
        assert_eq!(CombineMode::Sum.as_str(), "SUM");
    }
}
