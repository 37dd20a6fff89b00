//! Type → subtype dependent selection for the registration form.
//!
//! The selected subtype must always belong to the selected type's subtype
//! list, or both lists are empty. A type change replaces both values inside
//! one `&mut self` call, so no caller can observe the new type paired with a
//! subtype of the old one.

use crate::catalog::{SubtypeOption, TypeCatalog};
use crate::error::{AlertaError, Result};

#[derive(Debug, Clone)]
pub struct SubtypeSelector<'c> {
    catalog: &'c TypeCatalog,
    selected_type: Option<u32>,
    selected_subtype: Option<u32>,
}

impl<'c> SubtypeSelector<'c> {
    /// Starts on the first catalog type and its first subtype.
    pub fn new(catalog: &'c TypeCatalog) -> Self {
        let selected_type = catalog.first().map(|t| t.id);
        let selected_subtype =
            selected_type.and_then(|id| catalog.subtypes(id).first().map(|s| s.id));
        Self {
            catalog,
            selected_type,
            selected_subtype,
        }
    }

    /// Selects a type and resets the subtype to the first valid option.
    ///
    /// Unknown types are refused and leave the selection untouched.
    pub fn on_type_change(&mut self, type_id: u32) -> Result<&'c [SubtypeOption]> {
        if self.catalog.get(type_id).is_none() {
            return Err(AlertaError::UnknownType(type_id));
        }
        let valid = self.catalog.subtypes(type_id);
        self.selected_type = Some(type_id);
        self.selected_subtype = valid.first().map(|s| s.id);
        Ok(valid)
    }

    /// Selects a subtype of the current type. Returns false, and changes
    /// nothing, if the subtype is not valid for it.
    pub fn select_subtype(&mut self, subtype_id: u32) -> bool {
        if self.valid_subtypes().iter().any(|s| s.id == subtype_id) {
            self.selected_subtype = Some(subtype_id);
            true
        } else {
            tracing::warn!(
                subtype_id,
                selected_type = ?self.selected_type,
                "ignoring subtype not valid for the selected type"
            );
            false
        }
    }

    /// Selects a subtype by its label, folded like every other key.
    pub fn select_subtype_label(&mut self, label: &str) -> bool {
        let wanted = crate::filter::fold_key(label);
        let found = self
            .valid_subtypes()
            .iter()
            .find(|s| crate::filter::fold_key(&s.label) == wanted)
            .map(|s| s.id);
        match found {
            Some(id) => self.select_subtype(id),
            None => {
                tracing::warn!(label, "ignoring unknown subtype label");
                false
            }
        }
    }

    pub fn valid_subtypes(&self) -> &'c [SubtypeOption] {
        match self.selected_type {
            Some(id) => self.catalog.subtypes(id),
            None => &[],
        }
    }

    pub fn selected_type(&self) -> Option<u32> {
        self.selected_type
    }

    pub fn selected_subtype(&self) -> Option<&'c SubtypeOption> {
        let id = self.selected_subtype?;
        self.valid_subtypes().iter().find(|s| s.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::OccurrenceType;

    fn invariant_holds(selector: &SubtypeSelector) -> bool {
        match selector.selected_subtype {
            Some(id) => selector.valid_subtypes().iter().any(|s| s.id == id),
            None => selector.valid_subtypes().is_empty(),
        }
    }

    #[test]
    fn starts_on_first_type_and_subtype() {
        let catalog = TypeCatalog::default();
        let selector = SubtypeSelector::new(&catalog);
        assert_eq!(selector.selected_type(), Some(1));
        assert_eq!(
            selector.selected_subtype().map(|s| s.label.as_str()),
            Some("Incêndio em Edificação")
        );
    }

    #[test]
    fn type_change_resets_subtype_to_first_valid() {
        let catalog = TypeCatalog::default();
        let mut selector = SubtypeSelector::new(&catalog);
        assert!(selector.select_subtype(102));

        let valid = selector.on_type_change(3).unwrap();
        assert_eq!(valid.len(), 2);
        assert_eq!(selector.selected_type(), Some(3));
        assert_eq!(selector.selected_subtype().map(|s| s.id), Some(301));
    }

    #[test]
    fn subtype_from_another_type_is_ignored() {
        let catalog = TypeCatalog::default();
        let mut selector = SubtypeSelector::new(&catalog);
        assert!(!selector.select_subtype(201));
        assert_eq!(selector.selected_subtype().map(|s| s.id), Some(101));
    }

    #[test]
    fn unknown_type_is_refused() {
        let catalog = TypeCatalog::default();
        let mut selector = SubtypeSelector::new(&catalog);
        assert!(matches!(
            selector.on_type_change(99),
            Err(AlertaError::UnknownType(99))
        ));
        assert_eq!(selector.selected_type(), Some(1));
        assert!(invariant_holds(&selector));
    }

    #[test]
    fn type_without_subtypes_leaves_both_empty() {
        let catalog = TypeCatalog::new(vec![
            OccurrenceType {
                id: 1,
                name: "Com grupos".to_string(),
                subtypes: vec![SubtypeOption {
                    id: 11,
                    label: "Grupo".to_string(),
                }],
            },
            OccurrenceType {
                id: 2,
                name: "Sem grupos".to_string(),
                subtypes: Vec::new(),
            },
        ]);
        let mut selector = SubtypeSelector::new(&catalog);
        assert!(selector.on_type_change(2).unwrap().is_empty());
        assert!(selector.selected_subtype().is_none());
        assert!(invariant_holds(&selector));
    }

    #[test]
    fn invariant_holds_across_any_type_sequence() {
        let catalog = TypeCatalog::default();
        let mut selector = SubtypeSelector::new(&catalog);
        for type_id in [3, 1, 7, 99, 2, 2, 6, 0, 5, 4] {
            let _ = selector.on_type_change(type_id);
            assert!(invariant_holds(&selector), "after type {}", type_id);
            selector.select_subtype(701);
            assert!(invariant_holds(&selector), "after subtype on {}", type_id);
        }
    }

    #[test]
    fn select_by_label_is_accent_insensitive() {
        let catalog = TypeCatalog::default();
        let mut selector = SubtypeSelector::new(&catalog);
        assert!(selector.select_subtype_label("incendio florestal"));
        assert_eq!(selector.selected_subtype().map(|s| s.id), Some(102));
    }
}
