//! Page-layout arithmetic, kept separate from the PDF backend so the
//! page-break contract can be tested directly.

/// US letter page width in millimeters.
pub const PAGE_WIDTH_MM: f32 = 215.9;
/// US letter page height in millimeters.
pub const PAGE_HEIGHT_MM: f32 = 279.4;
/// Margin on every page edge.
pub const MARGIN_MM: f32 = 18.0;

/// Vertical space available for blocks on one page.
pub const PAGE_CAPACITY_MM: f32 = PAGE_HEIGHT_MM - 2.0 * MARGIN_MM;
/// Usable width between the margins.
pub const CONTENT_WIDTH_MM: f32 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;

/// Height of one wrapped paragraph line.
pub const LINE_HEIGHT_MM: f32 = 5.0;
/// Height of a section heading plus trailing gap.
pub const HEADING_HEIGHT_MM: f32 = 12.0;
/// Height of one table row.
pub const TABLE_ROW_HEIGHT_MM: f32 = 6.5;
/// Gap left after each block.
pub const BLOCK_GAP_MM: f32 = 4.0;
/// Character budget for wrapped paragraph text.
pub const WRAP_WIDTH_CHARS: usize = 90;

/// Assigns blocks to pages top-to-bottom. A block that does not fit the
/// remaining space on the current page starts a new page; a block taller
/// than a whole page still gets a page of its own rather than being clipped.
/// Returns, per page, the indices of the blocks placed on it.
pub fn paginate(heights: &[f32], capacity: f32) -> Vec<Vec<usize>> {
    let mut pages: Vec<Vec<usize>> = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    let mut used = 0.0_f32;

    for (index, &height) in heights.iter().enumerate() {
        if !current.is_empty() && used + height > capacity {
            pages.push(std::mem::take(&mut current));
            used = 0.0;
        }
        current.push(index);
        used += height;
    }
    if !current.is_empty() {
        pages.push(current);
    }
    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_fill_pages_in_order() {
        let pages = paginate(&[40.0, 40.0, 40.0, 40.0, 40.0], 100.0);
        assert_eq!(pages, vec![vec![0, 1], vec![2, 3], vec![4]]);
    }

    #[test]
    fn test_block_never_overflows_page() {
        let heights = [30.0, 80.0, 30.0];
        let pages = paginate(&heights, 100.0);
        for page in &pages {
            let total: f32 = page.iter().map(|&i| heights[i]).sum();
            assert!(total <= 100.0);
        }
        assert_eq!(pages, vec![vec![0], vec![1], vec![2]]);
    }

    #[test]
    fn test_oversize_block_gets_own_page() {
        let pages = paginate(&[150.0, 10.0], 100.0);
        assert_eq!(pages, vec![vec![0], vec![1]]);
    }

    #[test]
    fn test_exact_fit_stays_on_page() {
        let pages = paginate(&[60.0, 40.0], 100.0);
        assert_eq!(pages, vec![vec![0, 1]]);
    }

    #[test]
    fn test_empty_input_yields_no_pages() {
        assert!(paginate(&[], 100.0).is_empty());
    }
}
