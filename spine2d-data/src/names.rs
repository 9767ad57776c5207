use std::collections::HashMap;

/// An entity of the skeleton graph that can be looked up by name.
pub trait Named {
    fn name(&self) -> &str;
}

/// Name to position map for one collection. When names repeat, the first position wins.
#[derive(Clone, Debug, Default)]
pub(crate) struct NameIndex {
    positions: HashMap<String, usize>,
}

impl NameIndex {
    pub(crate) fn build<T: Named>(items: &[T]) -> Self {
        let mut positions = HashMap::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            positions.entry(item.name().to_string()).or_insert(index);
        }
        Self { positions }
    }

    pub(crate) fn get(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }
}
