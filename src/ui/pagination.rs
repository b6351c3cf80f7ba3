//! Pagination bar
//!
//! Renders `‹ 1 … 4 5 6 7 8 … 20 ›` style page links around the active page
//! and maps clicks back to page numbers.

use ratatui::{layout::Position, prelude::*, widgets::Paragraph};

use crate::query::Pagination;
use crate::ui::Theme;

/// Pages shown around the active one
pub const PAGE_RANGE: u32 = 5;

/// Pages always shown at each end
pub const MARGIN_PAGES: u32 = 1;

/// One clickable (or inert) element of the bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Prev,
    Page(u32),
    Ellipsis,
    Next,
}

impl PageItem {
    fn label(&self) -> String {
        match self {
            PageItem::Prev => " ‹ ".to_string(),
            PageItem::Next => " › ".to_string(),
            PageItem::Ellipsis => " … ".to_string(),
            PageItem::Page(n) => format!(" {} ", n),
        }
    }

    /// Page this item navigates to, if any
    pub fn target(&self, p: Pagination) -> Option<u32> {
        match *self {
            PageItem::Prev if p.current > 1 => Some(p.current - 1),
            PageItem::Next if p.current < p.total => Some(p.current + 1),
            PageItem::Page(n) if n != p.current => Some(n),
            _ => None,
        }
    }
}

/// Build the item sequence for a bar
pub fn items(p: Pagination) -> Vec<PageItem> {
    let total = p.total;
    let current = p.current.clamp(1, total.max(1));
    let mut out = vec![PageItem::Prev];

    if total <= PAGE_RANGE + 2 * MARGIN_PAGES {
        out.extend((1..=total).map(PageItem::Page));
    } else {
        // Window of PAGE_RANGE pages centered on current, kept inside bounds
        let half = PAGE_RANGE / 2;
        let mut start = current.saturating_sub(half).max(1);
        let mut end = start + PAGE_RANGE - 1;
        if end > total {
            end = total;
            start = total + 1 - PAGE_RANGE;
        }

        let mut last_pushed = 0;
        for n in 1..=total {
            let in_margin = n <= MARGIN_PAGES || n > total - MARGIN_PAGES;
            let in_window = n >= start && n <= end;
            if in_margin || in_window {
                if last_pushed != 0 && n > last_pushed + 1 {
                    out.push(PageItem::Ellipsis);
                }
                out.push(PageItem::Page(n));
                last_pushed = n;
            }
        }
    }

    out.push(PageItem::Next);
    out
}

/// Position every item on a single centered row
pub fn layout(area: Rect, p: Pagination) -> Vec<(PageItem, Rect)> {
    let items = items(p);
    let widths: Vec<u16> = items
        .iter()
        .map(|i| i.label().chars().count() as u16)
        .collect();
    let total_width: u16 = widths.iter().sum();
    let mut x = area.x + area.width.saturating_sub(total_width) / 2;

    items
        .into_iter()
        .zip(widths)
        .map(|(item, w)| {
            let rect = Rect::new(x, area.y, w, 1).intersection(area);
            x = x.saturating_add(w);
            (item, rect)
        })
        .collect()
}

/// Page targeted by a click at (x, y)
pub fn hit_test(area: Rect, p: Pagination, x: u16, y: u16) -> Option<u32> {
    let pos = Position::new(x, y);
    layout(area, p)
        .into_iter()
        .find(|(_, rect)| rect.contains(pos))
        .and_then(|(item, _)| item.target(p))
}

/// Render the bar
pub fn render(frame: &mut Frame, area: Rect, p: Pagination) {
    let spans: Vec<Span> = items(p)
        .into_iter()
        .map(|item| {
            let style = match item {
                PageItem::Page(n) if n == p.current => Theme::page_active(),
                PageItem::Page(_) => Theme::text(),
                PageItem::Ellipsis => Theme::dimmed(),
                PageItem::Prev | PageItem::Next => {
                    if item.target(p).is_some() {
                        Theme::keybind()
                    } else {
                        Theme::dimmed()
                    }
                }
            };
            Span::styled(item.label(), style)
        })
        .collect();

    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pg(current: u32, total: u32) -> Pagination {
        Pagination { current, total }
    }

    fn pages(items: &[PageItem]) -> Vec<Option<u32>> {
        items
            .iter()
            .filter(|i| !matches!(i, PageItem::Prev | PageItem::Next))
            .map(|i| match i {
                PageItem::Page(n) => Some(*n),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_small_total_lists_every_page() {
        let items = items(pg(1, 5));
        assert_eq!(items.first(), Some(&PageItem::Prev));
        assert_eq!(items.last(), Some(&PageItem::Next));
        assert_eq!(
            pages(&items),
            vec![Some(1), Some(2), Some(3), Some(4), Some(5)]
        );
    }

    #[test]
    fn test_window_in_the_middle() {
        assert_eq!(
            pages(&items(pg(10, 20))),
            vec![
                Some(1),
                None,
                Some(8),
                Some(9),
                Some(10),
                Some(11),
                Some(12),
                None,
                Some(20)
            ]
        );
    }

    #[test]
    fn test_window_at_edges() {
        assert_eq!(
            pages(&items(pg(1, 20))),
            vec![Some(1), Some(2), Some(3), Some(4), Some(5), None, Some(20)]
        );
        assert_eq!(
            pages(&items(pg(20, 20))),
            vec![Some(1), None, Some(16), Some(17), Some(18), Some(19), Some(20)]
        );
    }

    #[test]
    fn test_targets() {
        let p = pg(1, 5);
        assert_eq!(PageItem::Prev.target(p), None);
        assert_eq!(PageItem::Next.target(p), Some(2));
        assert_eq!(PageItem::Page(1).target(p), None);
        assert_eq!(PageItem::Page(4).target(p), Some(4));
        assert_eq!(PageItem::Ellipsis.target(p), None);
        assert_eq!(PageItem::Next.target(pg(5, 5)), None);
    }

    #[test]
    fn test_hit_test_maps_clicks() {
        let area = Rect::new(0, 10, 80, 1);
        let p = pg(1, 5);
        let layout = layout(area, p);
        let (_, three) = layout
            .iter()
            .find(|(i, _)| *i == PageItem::Page(3))
            .copied()
            .unwrap();
        assert_eq!(hit_test(area, p, three.x + 1, 10), Some(3));
        assert_eq!(hit_test(area, p, three.x + 1, 11), None);
        assert_eq!(hit_test(area, p, 0, 10), None);
    }
}
