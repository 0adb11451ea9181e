use serde::{Deserialize, Serialize};

/// The narrative role a chapter plays in the arc of a short read.
///
/// Roles are assigned by position, never by content: the first chapter is
/// always the hook and the last is always the resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChapterRole {
    Hook,
    Foundation,
    Development,
    Climax,
    Resolution,
}

impl ChapterRole {
    pub const ALL: [ChapterRole; 5] = [
        Self::Hook,
        Self::Foundation,
        Self::Development,
        Self::Climax,
        Self::Resolution,
    ];
}

/// Where a page sits inside its chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PagePosition {
    Opening,
    Development,
    Closing,
}

impl PagePosition {
    pub const ALL: [PagePosition; 3] = [Self::Opening, Self::Development, Self::Closing];

    /// Position of the page at `offset` (0-based) in a chapter of `len` pages.
    pub fn of(offset: u32, len: u32) -> Self {
        if offset == 0 {
            Self::Opening
        } else if offset + 1 >= len {
            Self::Closing
        } else {
            Self::Development
        }
    }
}

/// The content beat of a page, which decides its paragraph templates and
/// whether it carries a call to action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageBeat {
    /// Opens a chapter with one of the blueprint's anchor stories.
    Story,
    /// Grounds the chapter in one of the blueprint's research buckets.
    Research,
    /// An exercise page.
    Practice,
    /// Closes a chapter.
    Action,
}

impl PageBeat {
    pub const ALL: [PageBeat; 4] = [Self::Story, Self::Research, Self::Practice, Self::Action];

    /// Beat for the page at `offset` in a chapter of `len` pages. Inner pages
    /// alternate research and practice, starting with research.
    pub fn of(offset: u32, len: u32) -> Self {
        match PagePosition::of(offset, len) {
            PagePosition::Opening => Self::Story,
            PagePosition::Closing => Self::Action,
            PagePosition::Development if offset % 2 == 1 => Self::Research,
            PagePosition::Development => Self::Practice,
        }
    }

    pub fn has_call_to_action(&self) -> bool {
        matches!(self, Self::Practice | Self::Action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_positions_in_chapter() {
        assert_eq!(PagePosition::of(0, 4), PagePosition::Opening);
        assert_eq!(PagePosition::of(1, 4), PagePosition::Development);
        assert_eq!(PagePosition::of(2, 4), PagePosition::Development);
        assert_eq!(PagePosition::of(3, 4), PagePosition::Closing);
    }

    #[test]
    fn single_page_chapter_opens() {
        assert_eq!(PagePosition::of(0, 1), PagePosition::Opening);
    }

    #[test]
    fn inner_pages_alternate_beats() {
        let beats: Vec<PageBeat> = (0..6).map(|i| PageBeat::of(i, 6)).collect();
        assert_eq!(
            beats,
            vec![
                PageBeat::Story,
                PageBeat::Research,
                PageBeat::Practice,
                PageBeat::Research,
                PageBeat::Practice,
                PageBeat::Action,
            ]
        );
    }

    #[test]
    fn calls_to_action_only_on_practice_and_action() {
        assert!(!PageBeat::Story.has_call_to_action());
        assert!(!PageBeat::Research.has_call_to_action());
        assert!(PageBeat::Practice.has_call_to_action());
        assert!(PageBeat::Action.has_call_to_action());
    }
}
