//! Session State
//!
//! The two booleans that decide what the user sees, and the pure mapping
//! from them to exactly one view.

use std::fmt;

/// The three mutually exclusive views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    /// No diary exists yet: offer to create one
    Create,
    /// Diary exists but this session has not proven the phrase
    Unlock,
    /// Entries and the lock control
    Diary,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            View::Create => "create",
            View::Unlock => "unlock",
            View::Diary => "diary",
        };
        f.write_str(name)
    }
}

/// Authentication state for one page load
///
/// `unlocked` implies `initialized`; the setters keep that true.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    initialized: bool,
    unlocked: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Which view is active
    pub fn view(&self) -> View {
        match (self.initialized, self.unlocked) {
            (false, _) => View::Create,
            (true, false) => View::Unlock,
            (true, true) => View::Diary,
        }
    }

    pub(crate) fn set_initialized(&mut self, initialized: bool) {
        self.initialized = initialized;
        if !initialized {
            self.unlocked = false;
        }
    }

    /// A proven phrase also proves the diary exists
    pub(crate) fn unlock(&mut self) {
        self.initialized = true;
        self.unlocked = true;
    }

    pub(crate) fn lock(&mut self) {
        self.unlocked = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_is_exhaustive_and_exclusive() {
        let cases = [
            ((false, false), View::Create),
            ((false, true), View::Create),
            ((true, false), View::Unlock),
            ((true, true), View::Diary),
        ];

        for ((initialized, unlocked), expected) in cases {
            let session = Session {
                initialized,
                unlocked,
            };
            assert_eq!(session.view(), expected);
        }
    }

    #[test]
    fn test_new_session_is_create() {
        let session = Session::new();
        assert!(!session.is_initialized());
        assert!(!session.is_unlocked());
        assert_eq!(session.view(), View::Create);
    }

    #[test]
    fn test_unlock_implies_initialized() {
        let mut session = Session::new();
        session.unlock();
        assert!(session.is_initialized());
        assert_eq!(session.view(), View::Diary);
    }

    #[test]
    fn test_uninitialize_clears_unlock() {
        let mut session = Session::new();
        session.unlock();
        session.set_initialized(false);
        assert!(!session.is_unlocked());
        assert_eq!(session.view(), View::Create);
    }

    #[test]
    fn test_lock_keeps_initialized() {
        let mut session = Session::new();
        session.unlock();
        session.lock();
        assert!(session.is_initialized());
        assert_eq!(session.view(), View::Unlock);
    }
}
