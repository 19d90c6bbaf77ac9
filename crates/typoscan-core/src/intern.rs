// String interner: equal texts share one allocation

use std::rc::Rc;

use hashbrown::HashSet;

/// Hands out shared `Rc<str>` handles, one allocation per distinct text.
///
/// The same word tends to recur many times across a run and every
/// finding on a line refers to that whole line, so both are interned
/// before they are stored.
#[derive(Debug, Default)]
pub struct Interner {
    strings: HashSet<Rc<str>>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the shared handle for `s`, allocating it on first sight.
    pub fn intern(&mut self, s: &str) -> Rc<str> {
        if let Some(existing) = self.strings.get(s) {
            return Rc::clone(existing);
        }
        let handle: Rc<str> = Rc::from(s);
        self.strings.insert(Rc::clone(&handle));
        handle
    }

    /// Number of distinct strings held.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
