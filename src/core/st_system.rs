use std::{
    cell::{Ref, RefCell, RefMut},
    rc::Rc,
};

/// A single-threaded shared handle to a system.
///
/// `StSystem` gives several owners interior-mutable access to one system of
/// type `T` on the event loop thread. Cloning the handle shares the same
/// underlying system.
///
/// # Panics
/// - Panics if a borrow is held while trying to mutably borrow
/// - Panics if a mutable borrow is held while trying to borrow
pub struct StSystem<T> {
    system: Rc<RefCell<T>>,
}

impl<T> StSystem<T> {
    /// Creates a new `StSystem` containing the given system.
    pub fn new(system: T) -> Self {
        Self {
            system: Rc::new(RefCell::new(system)),
        }
    }

    /// Returns an immutable reference to the contained system.
    ///
    /// # Panics
    /// Panics if the value is currently mutably borrowed.
    pub fn get(&self) -> Ref<'_, T> {
        self.system.borrow()
    }

    /// Returns a mutable reference to the contained system.
    ///
    /// # Panics
    /// Panics if the value is currently borrowed.
    pub fn get_mut(&self) -> RefMut<'_, T> {
        self.system.borrow_mut()
    }
}

impl<T> Clone for StSystem<T> {
    fn clone(&self) -> Self {
        Self {
            system: self.system.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_same_system() {
        let system = StSystem::new(41_u32);
        let alias = system.clone();
        *alias.get_mut() += 1;
        assert_eq!(*system.get(), 42);
    }
}
