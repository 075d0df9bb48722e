use std::cmp::Ordering;

use serde_json::Value;

use super::error::FilterError;
use super::filter_where::compare_values;
use super::types::{FieldPath, FilterOrderInfo, SortDirection};

pub struct FilterOrder;

impl FilterOrder {
    pub fn validate_and_parse(order: &Value) -> Result<Vec<FilterOrderInfo>, FilterError> {
        match order {
            Value::String(s) => Self::parse_order_string(s),
            Value::Array(arr) => {
                // Expect array of strings like ["createdAt desc", "id asc"]
                let mut out = Vec::new();
                for v in arr {
                    match v {
                        Value::String(s) => out.extend(Self::parse_order_string(s)?),
                        other => return Err(FilterError::InvalidOperatorData(format!("Invalid order entry: {}", other))),
                    }
                }
                Ok(out)
            }
            Value::Object(obj) => {
                // { "createdAt": "desc", "id": "asc" }
                let mut out = Vec::new();
                for (k, v) in obj {
                    let sort = match v.as_str().unwrap_or("asc").to_ascii_lowercase().as_str() {
                        "desc" => SortDirection::Desc,
                        _ => SortDirection::Asc,
                    };
                    out.push(FilterOrderInfo { path: FieldPath::parse(k)?, sort });
                }
                Ok(out)
            }
            Value::Null => Ok(vec![]),
            _ => Err(FilterError::InvalidOperatorData("ORDER must be string, array or object".to_string())),
        }
    }

    fn parse_order_string(s: &str) -> Result<Vec<FilterOrderInfo>, FilterError> {
        // split on commas, then each token into field and direction
        let mut out = Vec::new();
        for part in s.split(',') {
            let trimmed = part.trim();
            if trimmed.is_empty() { continue; }
            let mut it = trimmed.split_whitespace();
            if let Some(field) = it.next() {
                let dir = it.next().unwrap_or("asc");
                let sort = if dir.eq_ignore_ascii_case("desc") { SortDirection::Desc } else { SortDirection::Asc };
                out.push(FilterOrderInfo { path: FieldPath::parse(field)?, sort });
            }
        }
        Ok(out)
    }

    pub fn generate(infos: &[FilterOrderInfo]) -> String {
        if infos.is_empty() { return String::new(); }
        let parts: Vec<String> = infos
            .iter()
            .map(|i| format!("{} {} NULLS LAST", i.path.to_order_sql(), i.sort.to_sql()))
            .collect();
        format!("ORDER BY {}", parts.join(", "))
    }

    /// In-memory counterpart of `generate`: missing values sort last in either direction.
    pub fn compare(infos: &[FilterOrderInfo], a: &Value, b: &Value) -> Ordering {
        for info in infos {
            let left = info.path.lookup(a).filter(|v| !v.is_null());
            let right = info.path.lookup(b).filter(|v| !v.is_null());
            let ordering = match (left, right) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(l), Some(r)) => {
                    let ordering = compare_values(l, r).unwrap_or(Ordering::Equal);
                    match info.sort {
                        SortDirection::Asc => ordering,
                        SortDirection::Desc => ordering.reverse(),
                    }
                }
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_strings_arrays_and_objects() {
        let from_array = FilterOrder::validate_and_parse(&json!(["agentProfile.rating.average desc", "id"])).unwrap();
        assert_eq!(from_array.len(), 2);
        assert_eq!(from_array[0].sort, SortDirection::Desc);
        assert_eq!(from_array[1].sort, SortDirection::Asc);

        let from_string = FilterOrder::validate_and_parse(&json!("createdAt desc, id asc")).unwrap();
        assert_eq!(from_string.len(), 2);

        let from_object = FilterOrder::validate_and_parse(&json!({"createdAt": "DESC"})).unwrap();
        assert_eq!(from_object[0].sort, SortDirection::Desc);
    }

    #[test]
    fn rejects_unsafe_fields() {
        assert!(FilterOrder::validate_and_parse(&json!("id; DROP TABLE accounts")).is_err());
    }

    #[test]
    fn generates_order_by() {
        let infos = FilterOrder::validate_and_parse(&json!(["agentProfile.rating.average desc", "createdAt desc", "id asc"])).unwrap();
        assert_eq!(
            FilterOrder::generate(&infos),
            "ORDER BY document #> '{agentProfile,rating,average}' DESC NULLS LAST, \"created_at\" DESC NULLS LAST, \"id\" ASC NULLS LAST"
        );
        assert_eq!(FilterOrder::generate(&[]), "");
    }

    #[test]
    fn compares_with_tiebreakers() {
        let infos = FilterOrder::validate_and_parse(&json!(["rating desc", "id asc"])).unwrap();
        let a = json!({"rating": 4.5, "id": "b"});
        let b = json!({"rating": 4.5, "id": "a"});
        let c = json!({"rating": 4.9, "id": "c"});
        let d = json!({"id": "d"});

        let mut docs = vec![a.clone(), d.clone(), b.clone(), c.clone()];
        docs.sort_by(|x, y| FilterOrder::compare(&infos, x, y));
        assert_eq!(docs, vec![c, b, a, d]);
    }
}
