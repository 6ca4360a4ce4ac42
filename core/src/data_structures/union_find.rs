//! Disjoint-set forest with path compression and union by height
//!
//! Operations run in O(α(n)) amortized time, where α is the inverse
//! Ackermann function.

use std::cmp::Ordering;

/// Union-Find over the elements `0..n`
#[derive(Debug, Clone)]
pub struct UnionFind {
    /// Parent pointers for each element
    parent: Vec<usize>,
    /// Upper bound on the height of the tree rooted at each element
    height: Vec<usize>,
    /// Number of disjoint sets
    num_components: usize,
}

impl UnionFind {
    /// Create a new Union-Find structure with n singleton sets
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            height: vec![0; n],
            num_components: n,
        }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Find the root of the set containing x, compressing the path behind it.
    ///
    /// The returned root is always its own parent.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        let mut current = x;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }

    /// Merge the sets containing x and y. Returns false if they were already joined.
    ///
    /// The shorter tree goes under the taller root; height grows only when
    /// both trees were equally tall.
    pub fn union(&mut self, x: usize, y: usize) -> bool {
        let root_x = self.find(x);
        let root_y = self.find(y);

        if root_x == root_y {
            return false;
        }

        match self.height[root_x].cmp(&self.height[root_y]) {
            Ordering::Less => {
                self.parent[root_x] = root_y;
            }
            Ordering::Greater => {
                self.parent[root_y] = root_x;
            }
            Ordering::Equal => {
                self.parent[root_y] = root_x;
                self.height[root_x] += 1;
            }
        }

        self.num_components -= 1;
        true
    }

    /// Check if two elements are in the same set
    pub fn connected(&mut self, x: usize, y: usize) -> bool {
        self.find(x) == self.find(y)
    }

    /// Get the number of disjoint sets
    pub fn components(&self) -> usize {
        self.num_components
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_find() {
        let mut uf = UnionFind::new(5);

        // Initially all separate
        assert_eq!(uf.components(), 5);
        assert!(!uf.connected(0, 1));

        assert!(uf.union(0, 1));
        assert_eq!(uf.components(), 4);
        assert!(uf.connected(0, 1));

        // Union same elements should return false
        assert!(!uf.union(0, 1));
        assert_eq!(uf.components(), 4);

        assert!(uf.union(2, 3));
        assert!(uf.union(1, 2));
        assert_eq!(uf.components(), 2);
        assert!(uf.connected(0, 3));
        assert!(!uf.connected(0, 4));
    }

    #[test]
    fn test_find_returns_self_parented_root() {
        let mut uf = UnionFind::new(8);
        for i in 0..7 {
            uf.union(i, i + 1);
        }
        for i in 0..8 {
            let root = uf.find(i);
            assert_eq!(uf.parent[root], root);
            // After compression every element points straight at the root
            assert_eq!(uf.parent[i], root);
        }
    }

    #[test]
    fn test_union_by_height() {
        let mut uf = UnionFind::new(4);
        uf.union(0, 1);
        assert_eq!(uf.height[0], 1);

        // Singleton 2 is shorter and goes under root 0, height unchanged
        uf.union(2, 0);
        assert_eq!(uf.find(2), 0);
        assert_eq!(uf.height[0], 1);

        uf.union(3, 3);
        assert_eq!(uf.components(), 2);
        assert_eq!(uf.len(), 4);
    }
}
