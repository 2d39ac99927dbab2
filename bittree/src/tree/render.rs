use super::MortonTree;
use std::fmt::Write;

/// What each cell of a rendered level shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderKind {
    Id,
    Mort,
    Parent,
}

impl RenderKind {
    pub fn name(self) -> &'static str {
        match self {
            RenderKind::Id => "bitid",
            RenderKind::Mort => "mort",
            RenderKind::Parent => "parent",
        }
    }

    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(RenderKind::Id),
            1 => Some(RenderKind::Mort),
            2 => Some(RenderKind::Parent),
            _ => None,
        }
    }
}

impl<const D: usize> MortonTree<D> {
    /// Text dump of every level, highest row first. 3D trees show the
    /// `slice`-th z plane of each level; other trees ignore it.
    ///
    /// Cells are four characters wide: blank outside the domain, `.` where the
    /// level has no block because a coarser leaf covers the cell.
    pub fn render(&self, kind: RenderKind, slice: u32) -> String {
        let mut out = format!("Bittree, datatype={}", kind.name());
        if D == 3 {
            let _ = write!(out, " (slice k={slice})");
        }
        out.push_str(":\n");

        for lev in 0..self.levels() {
            let _ = writeln!(out, "lev={lev}");
            let xlim = self.top_size(0) << lev;
            let ylim = if D >= 2 { self.top_size(1) << lev } else { 1 };
            let mut coord = [0u32; D];
            if let Some(k) = coord.get_mut(2) {
                *k = slice;
            }
            for j in 0..ylim {
                if let Some(y) = coord.get_mut(1) {
                    *y = ylim - j - 1;
                }
                for i in 0..xlim {
                    coord[0] = i;
                    let cell = match self.identify(lev, &coord) {
                        None => " ".to_string(),
                        Some(b) if b.level != lev => ".".to_string(),
                        Some(b) => match kind {
                            RenderKind::Id => b.id.to_string(),
                            RenderKind::Mort => b.mort.to_string(),
                            RenderKind::Parent => (b.is_parent as u8).to_string(),
                        },
                    };
                    let _ = write!(out, "{cell:>4}");
                }
                out.push('\n');
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitarray::BitArray;

    #[test]
    fn renders_levels_top_row_first() {
        let tree = MortonTree::new([2, 2], &[true, true, true, false]).unwrap();
        let expected = "Bittree, datatype=bitid:\nlev=0\n   6    \n   4   5\n";
        assert_eq!(tree.render(RenderKind::Id, 0), expected);
    }

    #[test]
    fn coarser_blocks_show_as_dots() {
        let tree = MortonTree::new([1, 1], &[true]).unwrap();
        let mut delta = BitArray::new(tree.id_upper_bound());
        delta.set(1, true);
        let tree = tree.refine(&delta).unwrap();

        let text = tree.render(RenderKind::Parent, 0);
        assert_eq!(text, "Bittree, datatype=parent:\nlev=0\n   1\nlev=1\n   0   0\n   0   0\n");

        let mut delta = BitArray::new(tree.id_upper_bound());
        delta.set(1, true);
        let coarse = tree.refine(&delta).unwrap();
        let text = coarse.render(RenderKind::Mort, 0);
        assert_eq!(text, "Bittree, datatype=mort:\nlev=0\n   0\n");
        assert!(tree.render(RenderKind::Mort, 0).contains("   3   4\n   1   2\n"));
    }

    #[test]
    fn three_dimensional_header_names_slice() {
        let tree = MortonTree::new([1, 1, 2], &[true, true]).unwrap();
        let text = tree.render(RenderKind::Id, 1);
        assert!(text.starts_with("Bittree, datatype=bitid (slice k=1):\n"));
        assert!(text.ends_with("lev=0\n   3\n"));
    }

    #[test]
    fn kind_indices() {
        assert_eq!(RenderKind::from_index(1), Some(RenderKind::Mort));
        assert_eq!(RenderKind::from_index(3), None);
    }
}
