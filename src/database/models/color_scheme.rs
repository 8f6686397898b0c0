use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::{BTreeMap, HashMap};

/// A named set of color-slot assignments owned by an author.
///
/// `colors` is keyed by slot name; keys are unique per scheme. It is a
/// `BTreeMap` only so JSON output is stable, callers must not rely on order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorScheme {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub colors: BTreeMap<String, String>,
}

/// One row of `color_schemes LEFT JOIN color_scheme_colors`.
///
/// A scheme without colors yields a single row with NULL key and value.
#[derive(Debug, Clone, FromRow)]
pub struct SchemeColorRow {
    pub id: String,
    pub name: String,
    pub author: String,
    pub category: String,
    pub color_key: Option<String>,
    pub color_value: Option<String>,
}

/// Group joined rows back into schemes, keeping the order in which each
/// scheme id first appears.
pub fn fold_scheme_rows(rows: Vec<SchemeColorRow>) -> Vec<ColorScheme> {
    let mut schemes: Vec<ColorScheme> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let slot = match index.get(&row.id) {
            Some(&slot) => slot,
            None => {
                index.insert(row.id.clone(), schemes.len());
                schemes.push(ColorScheme {
                    id: row.id,
                    name: row.name,
                    author: row.author,
                    category: row.category,
                    colors: BTreeMap::new(),
                });
                schemes.len() - 1
            }
        };

        if let (Some(key), Some(value)) = (row.color_key, row.color_value) {
            schemes[slot].colors.insert(key, value);
        }
    }

    schemes
}
