//! Condition-chain rules.
//!
//! A chain is a base score, an ordered list of conditions and a default
//! adjustment. The first condition whose predicate holds supplies the
//! adjustment. Field paths address the feature record by dotted path
//! (`forms.validation_exists`); a path that does not resolve makes the
//! condition false.

use crate::rules::calibrate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Comparison operator of a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = "between")]
    Between,
}

/// A single (predicate, adjustment) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub operator: Operator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    pub adjustment: f64,
}

impl Condition {
    /// Whether this condition holds for the given feature view.
    pub fn matches(&self, features: &Value) -> bool {
        let Some(actual) = resolve_path(features, &self.field) else {
            return false;
        };

        match self.operator {
            Operator::Eq => self.value.as_ref().is_some_and(|v| values_equal(actual, v)),
            Operator::Ne => self.value.as_ref().is_some_and(|v| !values_equal(actual, v)),
            Operator::Gt => self.compare(actual, |a, b| a > b),
            Operator::Lt => self.compare(actual, |a, b| a < b),
            Operator::Ge => self.compare(actual, |a, b| a >= b),
            Operator::Le => self.compare(actual, |a, b| a <= b),
            Operator::Between => {
                let (Some(x), Some(min), Some(max)) = (actual.as_f64(), self.min, self.max) else {
                    return false;
                };
                x >= min && x <= max
            }
        }
    }

    fn compare(&self, actual: &Value, op: impl Fn(f64, f64) -> bool) -> bool {
        match (actual.as_f64(), self.value.as_ref().and_then(Value::as_f64)) {
            (Some(a), Some(b)) => op(a, b),
            _ => false,
        }
    }
}

/// Numeric values compare by magnitude so `1` equals `1.0`.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

/// Walk a dotted path through nested JSON objects.
pub fn resolve_path<'v>(root: &'v Value, path: &str) -> Option<&'v Value> {
    if path.is_empty() {
        return None;
    }
    path.split('.').try_fold(root, |node, key| node.get(key))
}

/// Data-driven scoring rule for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainRule {
    pub base_score: f64,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub default_adjustment: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ChainRule {
    /// Index of the first matching condition, if any.
    pub fn first_match(&self, features: &Value) -> Option<usize> {
        self.conditions.iter().position(|c| c.matches(features))
    }

    pub fn evaluate(&self, features: &Value) -> f64 {
        let adjustment = self
            .first_match(features)
            .map(|i| self.conditions[i].adjustment)
            .unwrap_or(self.default_adjustment);
        calibrate(self.base_score + adjustment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cond(field: &str, operator: Operator, value: Value, adjustment: f64) -> Condition {
        Condition {
            field: field.to_string(),
            operator,
            value: Some(value),
            min: None,
            max: None,
            adjustment,
        }
    }

    fn features() -> Value {
        json!({
            "navigation": { "link_count": 42, "breadcrumb_exists": true },
            "forms": { "form_count": 0, "label_ratio": 0.5 }
        })
    }

    #[test]
    fn test_resolve_path() {
        let f = features();
        assert_eq!(resolve_path(&f, "navigation.link_count"), Some(&json!(42)));
        assert_eq!(resolve_path(&f, "navigation.missing"), None);
        assert_eq!(resolve_path(&f, "navigation.link_count.deeper"), None);
        assert_eq!(resolve_path(&f, ""), None);
    }

    #[test]
    fn test_operators() {
        let f = features();
        assert!(cond("navigation.breadcrumb_exists", Operator::Eq, json!(true), 0.0).matches(&f));
        assert!(cond("forms.form_count", Operator::Eq, json!(0.0), 0.0).matches(&f));
        assert!(cond("forms.form_count", Operator::Ne, json!(1), 0.0).matches(&f));
        assert!(cond("navigation.link_count", Operator::Gt, json!(40), 0.0).matches(&f));
        assert!(!cond("navigation.link_count", Operator::Lt, json!(40), 0.0).matches(&f));
        assert!(cond("navigation.link_count", Operator::Ge, json!(42), 0.0).matches(&f));
        assert!(cond("forms.label_ratio", Operator::Le, json!(0.5), 0.0).matches(&f));
        // Ordering against a boolean is never true
        assert!(!cond("navigation.breadcrumb_exists", Operator::Gt, json!(0), 0.0).matches(&f));
    }

    #[test]
    fn test_between_is_inclusive() {
        let f = features();
        let mut c = cond("navigation.link_count", Operator::Between, Value::Null, 1.0);
        c.min = Some(20.0);
        c.max = Some(42.0);
        assert!(c.matches(&f));
        c.max = Some(41.0);
        assert!(!c.matches(&f));
        c.max = None;
        assert!(!c.matches(&f));
    }

    #[test]
    fn test_unresolvable_path_is_false() {
        let f = features();
        assert!(!cond("nope.nothing", Operator::Ne, json!(1), 0.0).matches(&f));
        assert!(!cond("nope", Operator::Eq, Value::Null, 0.0).matches(&f));
    }

    #[test]
    fn test_first_match_wins() {
        let rule = ChainRule {
            base_score: 3.0,
            conditions: vec![
                cond("navigation.link_count", Operator::Ge, json!(100), 2.0),
                cond("navigation.link_count", Operator::Ge, json!(20), 1.0),
                cond("navigation.link_count", Operator::Ge, json!(0), -1.0),
            ],
            default_adjustment: -0.5,
            description: None,
        };
        let f = features();
        assert_eq!(rule.first_match(&f), Some(1));
        assert_eq!(rule.evaluate(&f), 4.0);
    }

    #[test]
    fn test_default_adjustment_and_clamp() {
        let rule = ChainRule {
            base_score: 3.0,
            conditions: vec![cond("navigation.breadcrumb_exists", Operator::Eq, json!(false), 5.0)],
            default_adjustment: -4.0,
            description: None,
        };
        assert_eq!(rule.evaluate(&features()), 2.0);
    }

    #[test]
    fn test_operator_wire_format() {
        let c: Condition = serde_json::from_value(json!({
            "field": "forms.form_count", "operator": ">=", "value": 1, "adjustment": 0.5
        }))
        .unwrap();
        assert_eq!(c.operator, Operator::Ge);
        let b: Condition = serde_json::from_value(json!({
            "field": "navigation.link_count", "operator": "between", "min": 20, "max": 100, "adjustment": 0.5
        }))
        .unwrap();
        assert_eq!(b.operator, Operator::Between);
        assert_eq!(b.min, Some(20.0));
    }
}
