//! Strategy parameter surface and default filling.

use std::collections::BTreeMap;

/// Parameter name → value. Ordered so that iteration and hashing of a
/// parameter set are deterministic.
pub type ParamValues = BTreeMap<String, f64>;

/// Declaration of one tunable parameter: the contract between a strategy and
/// any parameter-editing surface.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParamDef {
    pub name: String,
    pub label: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
}

impl ParamDef {
    pub fn new(name: &str, label: &str, min: f64, max: f64, step: f64, default: f64) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            min,
            max,
            step,
            default,
        }
    }

    /// Bring `value` into `[min, max]`. Non-finite values resolve to the
    /// default.
    pub fn clamp(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.default;
        }
        value.max(self.min).min(self.max)
    }
}

/// Supplied value for every declared parameter, default where missing.
/// Keys not declared in `defs` are dropped.
pub fn fill_defaults(values: &ParamValues, defs: &[ParamDef]) -> ParamValues {
    defs.iter()
        .map(|def| {
            let value = values.get(&def.name).copied().unwrap_or(def.default);
            (def.name.clone(), value)
        })
        .collect()
}

/// [`fill_defaults`] followed by clamping each value to its declared bounds.
pub fn resolve_params(values: &ParamValues, defs: &[ParamDef]) -> ParamValues {
    let mut resolved = fill_defaults(values, defs);
    for def in defs {
        if let Some(value) = resolved.get_mut(&def.name) {
            let clamped = def.clamp(*value);
            if clamped != *value {
                tracing::debug!(
                    param = %def.name,
                    requested = *value,
                    used = clamped,
                    "parameter clamped to declared bounds"
                );
            }
            *value = clamped;
        }
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defs() -> Vec<ParamDef> {
        vec![
            ParamDef::new("fast", "Fast MA", 2.0, 100.0, 1.0, 12.0),
            ParamDef::new("slow", "Slow MA", 5.0, 200.0, 1.0, 26.0),
        ]
    }

    #[test]
    fn fill_defaults_fills_gaps() {
        let mut values = ParamValues::new();
        values.insert("fast".into(), 8.0);
        let filled = fill_defaults(&values, &defs());
        assert_eq!(filled.get("fast"), Some(&8.0));
        assert_eq!(filled.get("slow"), Some(&26.0));
    }

    #[test]
    fn fill_defaults_drops_undeclared_keys() {
        let mut values = ParamValues::new();
        values.insert("bogus".into(), 1.0);
        let filled = fill_defaults(&values, &defs());
        assert_eq!(filled.len(), 2);
        assert!(!filled.contains_key("bogus"));
    }

    #[test]
    fn fill_defaults_does_not_clamp() {
        let mut values = ParamValues::new();
        values.insert("slow".into(), 4.0);
        assert_eq!(fill_defaults(&values, &defs()).get("slow"), Some(&4.0));
    }

    #[test]
    fn resolve_clamps_to_bounds() {
        let mut values = ParamValues::new();
        values.insert("fast".into(), 0.0);
        values.insert("slow".into(), 500.0);
        let resolved = resolve_params(&values, &defs());
        assert_eq!(resolved.get("fast"), Some(&2.0));
        assert_eq!(resolved.get("slow"), Some(&200.0));
    }

    #[test]
    fn resolve_non_finite_uses_default() {
        let mut values = ParamValues::new();
        values.insert("fast".into(), f64::NAN);
        values.insert("slow".into(), f64::INFINITY);
        let resolved = resolve_params(&values, &defs());
        assert_eq!(resolved.get("fast"), Some(&12.0));
        assert_eq!(resolved.get("slow"), Some(&26.0));
    }

    #[test]
    fn resolve_is_pure() {
        let values = ParamValues::new();
        let first = resolve_params(&values, &defs());
        let second = resolve_params(&values, &defs());
        assert_eq!(first, second);
        assert!(values.is_empty());
    }
}
