use serde::{Deserialize, Serialize};

use crate::model::ids::{ItemId, SectionId};
use crate::model::item::Item;

/// Ordered group of items administered together.
///
/// Sections are immutable within a session: the item list is fixed when the
/// snapshot is created and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub title: String,
    pub items: Vec<Item>,
}

impl Section {
    #[must_use]
    pub fn new(id: SectionId, title: impl Into<String>, items: Vec<Item>) -> Self {
        Self {
            id,
            title: title.into(),
            items,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn item(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    #[must_use]
    pub fn contains_item(&self, id: &ItemId) -> bool {
        self.items.iter().any(|item| &item.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::item::Modality;

    fn build_section() -> Section {
        Section::new(
            SectionId::new("sec-1"),
            "Quantitative",
            vec![
                Item::new(ItemId::new("q1"), "1+1?", Modality::Quant),
                Item::new(ItemId::new("q2"), "2+2?", Modality::Quant),
            ],
        )
    }

    #[test]
    fn item_lookup_by_index() {
        let section = build_section();
        assert_eq!(section.len(), 2);
        assert_eq!(section.item(1).unwrap().id, ItemId::new("q2"));
        assert!(section.item(2).is_none());
    }

    #[test]
    fn contains_item_checks_ids() {
        let section = build_section();
        assert!(section.contains_item(&ItemId::new("q1")));
        assert!(!section.contains_item(&ItemId::new("q9")));
    }
}
