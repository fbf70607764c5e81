//! Tri-state field wrapper for partial updates.
//!
//! PATCH payloads must distinguish "field omitted" (keep the stored value)
//! from "field explicitly null" (clear it). On the wire this is
//! `Option<Option<T>>` with `#[serde(default)]`; inside the crate it becomes
//! a [`Patch`] so the distinction cannot be dropped by accident.

/// One optional field of an update payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Patch<T> {
    /// Field was omitted: keep the stored value.
    #[default]
    Keep,
    /// Field was explicitly `null`: clear the stored value.
    Clear,
    /// Field was provided: set the new value.
    Set(T),
}

impl<T> Patch<T> {
    /// Resolves the patch against the currently stored value.
    pub fn apply(self, current: Option<T>) -> Option<T> {
        match self {
            Patch::Keep => current,
            Patch::Clear => None,
            Patch::Set(value) => Some(value),
        }
    }
}

impl<T> From<Option<Option<T>>> for Patch<T> {
    /// Converts the serde double-`Option` idiom: outer `None` = omitted,
    /// `Some(None)` = explicit null, `Some(Some(v))` = new value.
    fn from(value: Option<Option<T>>) -> Self {
        match value {
            None => Patch::Keep,
            Some(None) => Patch::Clear,
            Some(Some(v)) => Patch::Set(v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_resolves_all_three_states() {
        assert_eq!(Patch::Keep.apply(Some(1)), Some(1));
        assert_eq!(Patch::<i32>::Clear.apply(Some(1)), None);
        assert_eq!(Patch::Set(2).apply(Some(1)), Some(2));
        assert_eq!(Patch::Set(2).apply(None), Some(2));
    }

    #[test]
    fn double_option_maps_omitted_null_and_value() {
        assert_eq!(Patch::<i32>::from(None), Patch::Keep);
        assert_eq!(Patch::<i32>::from(Some(None)), Patch::Clear);
        assert_eq!(Patch::from(Some(Some(3))), Patch::Set(3));
    }
}
