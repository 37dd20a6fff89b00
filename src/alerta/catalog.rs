//! Occurrence type catalog.
//!
//! Maps a small integer type id to its display name and the subtype groups
//! that are valid for it. Occurrences referencing an id missing from the
//! catalog still render, with a synthesized `Tipo {id}` label.

use crate::error::Result;
use crate::filter::fold_key;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtypeOption {
    pub id: u32,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccurrenceType {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub subtypes: Vec<SubtypeOption>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCatalog {
    types: BTreeMap<u32, OccurrenceType>,
}

pub static DEFAULT_CATALOG: Lazy<TypeCatalog> = Lazy::new(|| {
    TypeCatalog::new(vec![
        entry(
            1,
            "Incêndio",
            &[
                (101, "Incêndio em Edificação"),
                (102, "Incêndio Florestal"),
                (103, "Incêndio Veicular"),
            ],
        ),
        entry(
            2,
            "Resgate",
            &[
                (201, "Acidente Veicular"),
                (202, "Resgate em Altura"),
                (203, "Resgate Aquático"),
            ],
        ),
        entry(
            3,
            "APH",
            &[(301, "Atendimento Clínico"), (302, "Atendimento Traumático")],
        ),
        entry(4, "Prevenção", &[(401, "Vistoria"), (402, "Cobertura de Evento")]),
        entry(
            5,
            "Ocorrência Ambiental",
            &[
                (501, "Captura de Animal"),
                (502, "Vazamento de Produto Perigoso"),
            ],
        ),
        entry(6, "Ocorrência Administrativa", &[(601, "Apoio Administrativo")]),
        entry(
            7,
            "Desastre Natural",
            &[(701, "Deslizamento"), (702, "Alagamento")],
        ),
    ])
});

fn entry(id: u32, name: &str, subtypes: &[(u32, &str)]) -> OccurrenceType {
    OccurrenceType {
        id,
        name: name.to_string(),
        subtypes: subtypes
            .iter()
            .map(|(id, label)| SubtypeOption {
                id: *id,
                label: label.to_string(),
            })
            .collect(),
    }
}

impl TypeCatalog {
    pub fn new(types: Vec<OccurrenceType>) -> Self {
        Self {
            types: types.into_iter().map(|t| (t.id, t)).collect(),
        }
    }

    /// Parses a catalog from a JSON array of types.
    pub fn from_json(json: &str) -> Result<Self> {
        let types: Vec<OccurrenceType> = serde_json::from_str(json)?;
        Ok(Self::new(types))
    }

    pub fn get(&self, id: u32) -> Option<&OccurrenceType> {
        self.types.get(&id)
    }

    /// Display name for a type id, falling back to `Tipo {id}`.
    pub fn name_of(&self, id: u32) -> Cow<'_, str> {
        match self.types.get(&id) {
            Some(t) => Cow::Borrowed(t.name.as_str()),
            None => Cow::Owned(format!("Tipo {}", id)),
        }
    }

    /// Subtypes valid for a type; empty for unknown ids.
    pub fn subtypes(&self, id: u32) -> &[SubtypeOption] {
        self.types
            .get(&id)
            .map(|t| t.subtypes.as_slice())
            .unwrap_or(&[])
    }

    /// Looks a type up by numeric id or by (folded) name.
    pub fn find(&self, key: &str) -> Option<&OccurrenceType> {
        if let Ok(id) = key.trim().parse::<u32>() {
            return self.types.get(&id);
        }
        let wanted = fold_key(key);
        self.types.values().find(|t| fold_key(&t.name) == wanted)
    }

    pub fn first(&self) -> Option<&OccurrenceType> {
        self.types.values().next()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OccurrenceType> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for TypeCatalog {
    fn default() -> Self {
        DEFAULT_CATALOG.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_has_the_seven_dispatch_types() {
        let catalog = TypeCatalog::default();
        assert_eq!(catalog.len(), 7);
        assert_eq!(catalog.name_of(1), "Incêndio");
        assert_eq!(catalog.name_of(7), "Desastre Natural");
    }

    #[test]
    fn unknown_type_gets_synthesized_label() {
        let catalog = TypeCatalog::default();
        assert_eq!(catalog.name_of(42), "Tipo 42");
        assert!(catalog.subtypes(42).is_empty());
    }

    #[test]
    fn find_by_id_or_folded_name() {
        let catalog = TypeCatalog::default();
        assert_eq!(catalog.find("incendio").map(|t| t.id), Some(1));
        assert_eq!(catalog.find("PREVENÇÃO").map(|t| t.id), Some(4));
        assert_eq!(catalog.find("3").map(|t| t.name.as_str()), Some("APH"));
        assert!(catalog.find("inexistente").is_none());
    }

    #[test]
    fn loads_from_json() {
        let json = r#"[
            {"id": 9, "name": "Teste", "subtypes": [{"id": 91, "label": "Sub"}]},
            {"id": 10, "name": "Sem grupos"}
        ]"#;
        let catalog = TypeCatalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.subtypes(9)[0].label, "Sub");
        assert!(catalog.subtypes(10).is_empty());
    }
}
