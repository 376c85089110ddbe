use std::ops::{Index, IndexMut};

/// Counters for every node at one remaining depth.
/// - `visited` is the number of nodes the search entered.
/// - `expanded` is the number of those whose moves were enumerated (the rest
///   were leaves).
/// - `cutoffs` is the number of expanded nodes that stopped early because
///   their window closed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayerInfo {
    pub visited: u64,
    pub expanded: u64,
    pub cutoffs: u64,
}

/// Per-depth search statistics, indexed by remaining depth (0 is the leaves).
#[derive(Clone, Debug, Default)]
pub struct BranchInfo(Vec<LayerInfo>);

impl Index<usize> for BranchInfo {
    type Output = LayerInfo;

    fn index(&self, index: usize) -> &Self::Output { &self.0[index] }
}

impl IndexMut<usize> for BranchInfo {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        if index >= self.0.len() {
            self.0.resize(index + 1, LayerInfo::default());
        }
        &mut self.0[index]
    }
}

impl BranchInfo {
    pub fn new(depth: u8) -> Self { BranchInfo(vec![LayerInfo::default(); depth as usize + 1]) }

    pub fn total_visited(&self) -> u64 { self.0.iter().map(|layer| layer.visited).sum() }

    pub fn total_cutoffs(&self) -> u64 { self.0.iter().map(|layer| layer.cutoffs).sum() }

    pub fn statistics(&self) -> String {
        let mut s = String::new();

        s.push_str("Search statistics:\n");

        for depth in (0..self.0.len()).rev() {
            let ply = self.0.len() - depth - 1;
            let LayerInfo { visited, expanded, cutoffs } = self.0[depth];

            s.push_str(&format!(
                "\tPly {} (depth {}) visited {} nodes, expanded {}\n",
                ply, depth, visited, expanded
            ));
            s.push_str(&format!(
                "\t\t{} ({}%) of the expanded nodes were cut off\n",
                cutoffs,
                (cutoffs * 100).checked_div(expanded).unwrap_or(0)
            ));
        }

        s.push_str(&format!(
            "\tTotal: {} nodes visited, {} cutoffs\n",
            self.total_visited(), self.total_cutoffs()
        ));

        s
    }

    pub fn reset_statistics(&mut self) { self.0 = vec![LayerInfo::default(); self.0.len()]; }
}
