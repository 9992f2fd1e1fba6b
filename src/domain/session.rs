//! Browsing session state: active tab, trail, and in-flight lookups.
//!
//! Lookups are asynchronous from the session's point of view: a request is
//! issued, resolved elsewhere, and its completion applied later. Each
//! request carries a generation number so that a completion arriving after a
//! newer request was issued is discarded instead of clobbering the view.

use crate::domain::{DocId, Trail, TrailError};

/// The top-level views a session can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    /// The international code of laws.
    #[default]
    Code,
    /// The national regulations.
    Rnc,
    /// The category groupings.
    Categories,
}

/// A lookup issued by the session, tagged with its generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    /// The document being looked up.
    pub target: DocId,
    /// Generation at the time the request was issued.
    pub generation: u64,
}

/// The finished result of a [`Request`], to be applied to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    /// The document the lookup was for.
    pub target: DocId,
    /// Generation copied from the originating request.
    pub generation: u64,
    /// Whether the document was found.
    pub found: bool,
}

/// What happened when a completion was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The document is now in view and appended to the trail.
    Viewing(DocId),
    /// The document does not exist; the trail is unchanged.
    NotFound(DocId),
    /// A newer request superseded this completion; nothing changed.
    Stale,
}

/// Mutable state of one browsing session.
///
/// The session owns the active tab and the trail. Switching tabs resets both
/// the trail and any pending lookup, so a completion issued under the old
/// tab can never surface in the new one.
#[derive(Debug, Clone, Default)]
pub struct Session {
    tab: Tab,
    trail: Trail,
    generation: u64,
}

impl Session {
    /// Creates a session on the given tab with an empty trail.
    #[must_use]
    pub fn new(tab: Tab) -> Self {
        Self {
            tab,
            trail: Trail::Empty,
            generation: 0,
        }
    }

    /// The active tab.
    #[must_use]
    pub const fn tab(&self) -> Tab {
        self.tab
    }

    /// The navigation trail.
    #[must_use]
    pub const fn trail(&self) -> &Trail {
        &self.trail
    }

    /// The document currently in view, if any.
    #[must_use]
    pub fn current(&self) -> Option<DocId> {
        self.trail.current()
    }

    /// Switches to another tab, clearing the trail.
    ///
    /// Switching to the already-active tab still clears the trail; the
    /// generation advances either way so pending lookups are invalidated.
    pub fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.trail.reset();
        self.generation += 1;
    }

    /// Issues a lookup for a document.
    ///
    /// Advances the generation, which invalidates any previously issued
    /// request that has not yet completed.
    pub fn request(&mut self, target: DocId) -> Request {
        self.generation += 1;
        Request {
            target,
            generation: self.generation,
        }
    }

    /// Applies a finished lookup to the session.
    ///
    /// Completions whose generation does not match the latest request are
    /// reported as [`Outcome::Stale`] and leave the session untouched.
    pub fn complete(&mut self, completion: Completion) -> Outcome {
        if completion.generation != self.generation {
            return Outcome::Stale;
        }

        if completion.found {
            self.trail.follow(completion.target);
            Outcome::Viewing(completion.target)
        } else {
            Outcome::NotFound(completion.target)
        }
    }

    /// Jumps back to an earlier crumb in the trail.
    ///
    /// The jump is synchronous; it also advances the generation so that an
    /// in-flight lookup cannot land on top of the restored view.
    ///
    /// # Errors
    ///
    /// Returns [`TrailError::OutOfRange`] when the position does not exist.
    pub fn jump_to(&mut self, index: usize) -> Result<DocId, TrailError> {
        let landed = self.trail.jump_to(index)?;
        self.generation += 1;
        Ok(landed)
    }

    /// Steps back to the previous crumb.
    ///
    /// Returns the document landed on, or `None` when there is nothing to
    /// step back to. Like [`Self::jump_to`], stepping back invalidates any
    /// in-flight lookup.
    pub fn back(&mut self) -> Option<DocId> {
        let len = self.trail.len();
        if len < 2 {
            return None;
        }
        self.jump_to(len - 2).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> DocId {
        s.parse().unwrap()
    }

    fn found(request: Request) -> Completion {
        Completion {
            target: request.target,
            generation: request.generation,
            found: true,
        }
    }

    #[test]
    fn default_session_views_nothing_on_the_code_tab() {
        let session = Session::default();
        assert_eq!(session.tab(), Tab::Code);
        assert_eq!(session.current(), None);
    }

    #[test]
    fn completed_lookup_appends_to_the_trail() {
        let mut session = Session::default();
        let request = session.request(id("CODE-40"));
        let outcome = session.complete(found(request));

        assert_eq!(outcome, Outcome::Viewing(id("CODE-40")));
        assert_eq!(session.trail().entries(), vec![id("CODE-40")]);
    }

    #[test]
    fn not_found_leaves_the_trail_unchanged() {
        let mut session = Session::default();
        let request = session.request(id("CODE-40"));
        session.complete(found(request));

        let request = session.request(id("CODE-999"));
        let outcome = session.complete(Completion {
            target: request.target,
            generation: request.generation,
            found: false,
        });

        assert_eq!(outcome, Outcome::NotFound(id("CODE-999")));
        assert_eq!(session.trail().entries(), vec![id("CODE-40")]);
        assert_eq!(session.current(), Some(id("CODE-40")));
    }

    #[test]
    fn stale_completion_is_discarded() {
        let mut session = Session::default();
        let slow = session.request(id("CODE-1"));
        let fast = session.request(id("CODE-2"));

        assert_eq!(session.complete(found(fast)), Outcome::Viewing(id("CODE-2")));
        assert_eq!(session.complete(found(slow)), Outcome::Stale);
        assert_eq!(session.trail().entries(), vec![id("CODE-2")]);
    }

    #[test]
    fn tab_switch_clears_trail_and_invalidates_pending_lookups() {
        let mut session = Session::default();
        let request = session.request(id("CODE-40"));
        session.complete(found(request));

        let pending = session.request(id("CODE-1"));
        session.switch_tab(Tab::Rnc);

        assert_eq!(session.tab(), Tab::Rnc);
        assert!(session.trail().is_empty());
        assert_eq!(session.complete(found(pending)), Outcome::Stale);
    }

    #[test]
    fn jump_invalidates_in_flight_lookups() {
        let mut session = Session::default();
        for name in ["CODE-40", "CODE-1", "CODE-2"] {
            let request = session.request(id(name));
            session.complete(found(request));
        }

        let pending = session.request(id("RNC-1"));
        let landed = session.jump_to(0).unwrap();

        assert_eq!(landed, id("CODE-40"));
        assert_eq!(session.complete(found(pending)), Outcome::Stale);
        assert_eq!(session.trail().entries(), vec![id("CODE-40")]);
    }

    #[test]
    fn back_steps_to_the_previous_crumb() {
        let mut session = Session::default();
        for name in ["CODE-40", "CODE-1"] {
            let request = session.request(id(name));
            session.complete(found(request));
        }

        let pending = session.request(id("CODE-2"));
        assert_eq!(session.back(), Some(id("CODE-40")));
        assert_eq!(session.complete(found(pending)), Outcome::Stale);

        // Nothing earlier to step back to now.
        assert_eq!(session.back(), None);
        assert_eq!(session.current(), Some(id("CODE-40")));
    }

    #[test]
    fn follow_chain_matches_breadcrumb_expectations() {
        // Viewing 40, following a reference to 1 then jumping back to the
        // first crumb leaves only 40 in the trail.
        let mut session = Session::default();
        for name in ["CODE-40", "CODE-1"] {
            let request = session.request(id(name));
            session.complete(found(request));
        }
        assert_eq!(
            session.trail().entries(),
            vec![id("CODE-40"), id("CODE-1")]
        );

        session.jump_to(0).unwrap();
        assert_eq!(session.trail().entries(), vec![id("CODE-40")]);
    }
}
