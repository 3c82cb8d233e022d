use crate::coords::Subset;

use super::{Element, NoDataConfig};

/// Ordered collection of elements rendered back to front.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementList {
    elements: Vec<Element>,
    no_data: NoDataConfig,
}

impl ElementList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_no_data(mut self, no_data: NoDataConfig) -> Self {
        self.no_data = no_data;
        self
    }

    pub fn push(&mut self, element: impl Into<Element>) {
        self.elements.push(element.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.elements.iter_mut()
    }

    pub fn active(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(|e| e.is_active())
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[inline]
    pub fn no_data(&self) -> NoDataConfig {
        self.no_data
    }

    pub fn no_data_value(&self) -> f64 {
        self.no_data.value
    }

    pub fn is_no_data_value_available(&self) -> bool {
        self.no_data.available
    }

    pub fn all_bands_ndv(&self) -> bool {
        self.no_data.all_bands
    }

    /// Union of the active elements' extents, in the orientation of the first one.
    pub fn extent(&self) -> Option<Subset> {
        self.active()
            .filter_map(Element::extent)
            .reduce(|acc, e| acc.union(&e))
    }
}
