//! Ordered candidate-path resolution.
//!
//! Every logical field is described once, as a `FieldSpec` listing the dotted
//! paths it may appear under. `resolve` walks them in order and returns the
//! first value that is present and non-empty.

use serde_json::Value;

/// Prefix marking a path that is relative to the unwrapped view model.
const VIEW_MODEL_PREFIX: &str = "view_model.";

/// Wrapper keys that may hold the view model, in lookup order.
const VIEW_MODEL_WRAPPERS: &[&str] = &["view_model", "viewModel"];

/// A logical field and the ordered places it may be found.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub candidates: &'static [&'static str],
}

/// A borrowed payload with its view-model wrapper resolved once.
#[derive(Debug, Clone, Copy)]
pub struct PayloadScope<'a> {
    root: &'a Value,
    view_model: &'a Value,
}

impl<'a> PayloadScope<'a> {
    pub fn new(root: &'a Value) -> Self {
        let view_model = VIEW_MODEL_WRAPPERS
            .iter()
            .filter_map(|key| root.get(*key))
            .find(|value| value.is_object())
            .unwrap_or(root);
        Self { root, view_model }
    }

    pub fn root(&self) -> &'a Value {
        self.root
    }

    pub fn view_model(&self) -> &'a Value {
        self.view_model
    }

    /// Resolves a single dotted path.
    ///
    /// `view_model.`-prefixed paths are read from the unwrapped view model.
    /// Other paths are read from the payload root first and then, when the
    /// payload is wrapped, from the view model.
    pub fn lookup(&self, path: &str) -> Option<&'a Value> {
        if let Some(rest) = path.strip_prefix(VIEW_MODEL_PREFIX) {
            return present(walk(self.view_model, rest));
        }
        present(walk(self.root, path)).or_else(|| {
            if std::ptr::eq(self.root, self.view_model) {
                None
            } else {
                present(walk(self.view_model, path))
            }
        })
    }

    /// Returns the first present candidate of `field_spec`.
    pub fn resolve(&self, field_spec: &FieldSpec) -> Option<&'a Value> {
        self.resolve_with(field_spec, |_| true)
    }

    /// Returns the first present candidate of `field_spec` that also satisfies `accept`.
    pub fn resolve_with<F>(&self, field_spec: &FieldSpec, accept: F) -> Option<&'a Value>
    where
        F: Fn(&Value) -> bool,
    {
        for candidate in field_spec.candidates {
            if let Some(value) = self.lookup(candidate) {
                if accept(value) {
                    tracing::trace!(field = field_spec.name, candidate, "Resolved field.");
                    return Some(value);
                }
                tracing::debug!(field = field_spec.name, candidate, "Skipping unusable candidate.");
            }
        }
        None
    }

    /// Every present candidate of `field_spec`, in candidate order.
    ///
    /// A value reachable through more than one candidate is reported once, at
    /// its first position.
    pub fn resolve_all(&self, field_spec: &FieldSpec) -> Vec<(&'static str, &'a Value)> {
        let mut found: Vec<(&'static str, &'a Value)> = Vec::new();
        for candidate in field_spec.candidates {
            if let Some(value) = self.lookup(candidate) {
                if !found.iter().any(|(_, seen)| std::ptr::eq(*seen, value)) {
                    found.push((*candidate, value));
                }
            }
        }
        found
    }
}

/// Walks a dotted path through nested objects.
pub fn walk<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |current, segment| current.as_object()?.get(segment))
}

/// Reads the first present key of an object-like value.
pub fn first_key<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| present(value.get(*key)))
}

/// Null and blank strings count as absent.
fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| match v {
        Value::Null => false,
        Value::String(text) => !text.trim().is_empty(),
        _ => true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const STATUS: FieldSpec = FieldSpec {
        name: "status",
        candidates: &["view_model.decision_status", "decision_summary.status"],
    };

    #[test]
    fn view_model_prefix_reads_either_wrapper_spelling() {
        let snake = json!({"view_model": {"decision_status": "GO"}});
        let camel = json!({"viewModel": {"decision_status": "GO"}});
        assert_eq!(PayloadScope::new(&snake).resolve(&STATUS), Some(&json!("GO")));
        assert_eq!(PayloadScope::new(&camel).resolve(&STATUS), Some(&json!("GO")));
    }

    #[test]
    fn unwrapped_payload_is_its_own_view_model() {
        let flat = json!({"decision_status": "NO_GO"});
        assert_eq!(PayloadScope::new(&flat).resolve(&STATUS), Some(&json!("NO_GO")));
    }

    #[test]
    fn candidate_order_is_respected_and_blanks_are_skipped() {
        let payload = json!({
            "view_model": {"decision_status": "  "},
            "decision_summary": {"status": "pending"}
        });
        assert_eq!(PayloadScope::new(&payload).resolve(&STATUS), Some(&json!("pending")));
    }

    #[test]
    fn root_paths_fall_back_to_view_model() {
        let payload = json!({"view_model": {"decision_summary": {"status": "GO"}}});
        assert_eq!(PayloadScope::new(&payload).lookup("decision_summary.status"), Some(&json!("GO")));
    }

    #[test]
    fn resolve_all_reports_each_value_once() {
        let field_spec = FieldSpec {
            name: "status",
            candidates: &["view_model.decision_status", "decision_status", "decision_summary.status"],
        };
        let payload = json!({"view_model": {"decision_status": "GO"}, "decision_summary": {"status": "NO_GO"}});
        let found = PayloadScope::new(&payload).resolve_all(&field_spec);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].0, "view_model.decision_status");
        assert_eq!(found[1].1, &json!("NO_GO"));
    }

    #[test]
    fn walking_through_non_objects_is_absent() {
        let payload = json!({"a": [1, 2], "b": "text"});
        assert_eq!(walk(&payload, "a.0"), None);
        assert_eq!(walk(&payload, "b.c"), None);
        assert_eq!(walk(&Value::Null, "a"), None);
    }
}
