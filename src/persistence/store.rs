use alloc::rc::Rc;
use alloc::string::ToString;
use core::cell::RefCell;

use super::{PersistError, SessionRecord};

/// Where saved matches live.
pub trait SaveStore {
    /// Replace the saved match with `record`.
    fn save(&mut self, record: &SessionRecord) -> Result<(), PersistError>;

    /// Read the saved match. `PersistError::NotFound` when there is none.
    fn load(&self) -> Result<SessionRecord, PersistError>;

    /// Forget the saved match. Deleting nothing is not an error.
    fn delete(&mut self) -> Result<(), PersistError>;
}

/// Store that keeps the record in memory.
///
/// Clones share the same slot, so a test can hand one clone to a session
/// and inspect what it wrote through another.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    slot: Rc<RefCell<Option<SessionRecord>>>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `record`.
    pub fn with_record(record: SessionRecord) -> Self {
        let store = Self::new();
        *store.slot.borrow_mut() = Some(record);
        store
    }

    /// A store whose writes always fail, for exercising best-effort
    /// autosave.
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn record(&self) -> Option<SessionRecord> {
        self.slot.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.borrow().is_none()
    }
}

impl SaveStore for MemoryStore {
    fn save(&mut self, record: &SessionRecord) -> Result<(), PersistError> {
        if self.fail_writes {
            return Err(PersistError::Io("write refused".to_string()));
        }
        *self.slot.borrow_mut() = Some(record.clone());
        Ok(())
    }

    fn load(&self) -> Result<SessionRecord, PersistError> {
        self.slot.borrow().clone().ok_or(PersistError::NotFound)
    }

    fn delete(&mut self) -> Result<(), PersistError> {
        self.slot.borrow_mut().take();
        Ok(())
    }
}
