use swiftgg_reader::feed::loader::FeedState;
use swiftgg_reader::guide::Chapter;
use swiftgg_reader::site::contributors::ContributorsState;
use swiftgg_reader::site::sponsors::{SponsorLevel, SponsorsState};

/// How close to the end of the post list the selection may get before the
/// driver requests the next page.
pub const LOAD_MORE_THRESHOLD: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Posts,
    Sponsors,
    Contributors,
    Guide,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Posts, Tab::Sponsors, Tab::Contributors, Tab::Guide];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Posts => "Posts",
            Tab::Sponsors => "Sponsors",
            Tab::Contributors => "Contributors",
            Tab::Guide => "Guide",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn next(self) -> Tab {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Tab {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Snapshot published to the TUI over the watch channel. The driver task is
/// the only writer.
#[derive(Debug, Clone)]
pub struct AppState {
    pub tab: Tab,
    pub feed: FeedState,
    pub feed_error: Option<String>,
    pub sponsors: SponsorsState,
    pub contributors: ContributorsState,
    pub chapters: Vec<Chapter>,
    /// Root feed category, used to pick each post's displayed sub-category.
    pub root_category: i64,
    pub post_selected: usize,
    pub sponsor_scroll: usize,
    pub contributor_scroll: usize,
    pub guide_scroll: usize,
}

impl AppState {
    pub fn new(chapters: Vec<Chapter>, root_category: i64) -> Self {
        Self {
            tab: Tab::Posts,
            feed: FeedState::default(),
            feed_error: None,
            sponsors: SponsorsState::default(),
            contributors: ContributorsState::default(),
            chapters,
            root_category,
            post_selected: 0,
            sponsor_scroll: 0,
            contributor_scroll: 0,
            guide_scroll: 0,
        }
    }

    /// True when the selection is close enough to the end of the loaded
    /// posts that the next page should be requested.
    pub fn selection_near_end(&self) -> bool {
        !self.feed.items.is_empty()
            && self.post_selected + LOAD_MORE_THRESHOLD >= self.feed.items.len()
    }

    /// Number of rendered lines on the sponsors tab: one header per
    /// non-empty tier plus one row per sponsor. Must stay in step with the
    /// renderer's line builder.
    pub fn sponsor_line_count(&self) -> usize {
        SponsorLevel::ALL
            .iter()
            .map(|level| {
                let count = self
                    .sponsors
                    .sponsors
                    .iter()
                    .filter(|s| s.level == *level)
                    .count();
                if count == 0 {
                    0
                } else {
                    count + 1
                }
            })
            .sum()
    }

    /// Rendered lines on the guide tab: one header per chapter plus one line
    /// per section.
    pub fn guide_line_count(&self) -> usize {
        self.chapters
            .iter()
            .map(|c| 1 + c.sections.len())
            .sum()
    }

    fn line_count(&self, tab: Tab) -> usize {
        match tab {
            Tab::Posts => self.feed.items.len(),
            Tab::Sponsors => self.sponsor_line_count(),
            Tab::Contributors => self.contributors.contributors.len(),
            Tab::Guide => self.guide_line_count(),
        }
    }

    pub fn max_scroll(&self) -> usize {
        self.line_count(self.tab).saturating_sub(1)
    }

    pub fn scroll_mut(&mut self) -> &mut usize {
        match self.tab {
            Tab::Posts => &mut self.post_selected,
            Tab::Sponsors => &mut self.sponsor_scroll,
            Tab::Contributors => &mut self.contributor_scroll,
            Tab::Guide => &mut self.guide_scroll,
        }
    }

    /// Re-clamp all cursors after fresh data arrives (a refresh can shrink
    /// the lists under the cursor).
    pub fn clamp_scrolls(&mut self) {
        self.post_selected = self
            .post_selected
            .min(self.line_count(Tab::Posts).saturating_sub(1));
        self.sponsor_scroll = self
            .sponsor_scroll
            .min(self.line_count(Tab::Sponsors).saturating_sub(1));
        self.contributor_scroll = self
            .contributor_scroll
            .min(self.line_count(Tab::Contributors).saturating_sub(1));
        self.guide_scroll = self
            .guide_scroll
            .min(self.line_count(Tab::Guide).saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_cycle() {
        assert_eq!(Tab::Posts.next(), Tab::Sponsors);
        assert_eq!(Tab::Guide.next(), Tab::Posts);
        assert_eq!(Tab::Posts.prev(), Tab::Guide);
    }

    #[test]
    fn test_selection_near_end_empty_feed() {
        let app = AppState::new(Vec::new(), 44);
        assert!(!app.selection_near_end());
    }
}
