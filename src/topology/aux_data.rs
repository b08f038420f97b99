use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt::Debug;

/// Object-safe view of a value stored in an [`AuxData`] slot.
trait AuxValue: Any + Debug {
    fn clone_boxed(&self) -> Box<dyn AuxValue>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any + Clone + Debug> AuxValue for T {
    fn clone_boxed(&self) -> Box<dyn AuxValue> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Caller-defined data attached to a vertex, edge, or face.
///
/// Each slot is keyed by the type of its value, so a component holds at
/// most one value per type. Wrap values in a newtype to keep unrelated
/// uses of the same underlying type apart.
///
/// The mesh copies an edge's data onto every piece the edge is split into,
/// and a face's data onto every face carved out of it.
#[derive(Debug, Default)]
pub struct AuxData {
    slots: HashMap<TypeId, Box<dyn AuxValue>>,
}

impl Clone for AuxData {
    fn clone(&self) -> Self {
        Self {
            slots: self
                .slots
                .iter()
                .map(|(key, value)| (*key, (**value).clone_boxed()))
                .collect(),
        }
    }
}

impl AuxData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value`, returning the previous value of the same type.
    pub fn insert<T: Any + Clone + Debug>(&mut self, value: T) -> Option<T> {
        let previous = self.slots.insert(TypeId::of::<T>(), Box::new(value))?;
        (*previous)
            .as_any()
            .downcast_ref::<T>()
            .cloned()
    }

    #[must_use]
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.slots
            .get(&TypeId::of::<T>())
            .and_then(|slot| (**slot).as_any().downcast_ref())
    }

    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.slots
            .get_mut(&TypeId::of::<T>())
            .and_then(|slot| (**slot).as_any_mut().downcast_mut())
    }

    /// Removes the value of type `T`, returning whether one was present.
    pub fn remove<T: Any>(&mut self) -> bool {
        self.slots.remove(&TypeId::of::<T>()).is_some()
    }

    #[must_use]
    pub fn contains<T: Any>(&self) -> bool {
        self.slots.contains_key(&TypeId::of::<T>())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Copies every slot of `other` whose type is absent here.
    pub fn merge_missing_from(&mut self, other: &Self) {
        for (key, value) in &other.slots {
            self.slots
                .entry(*key)
                .or_insert_with(|| (**value).clone_boxed());
        }
    }
}
