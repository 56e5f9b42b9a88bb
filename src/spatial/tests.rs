#[cfg(test)]
mod octree_arithmetic_tests {
    use crate::spatial::{full_binary_tree_size, full_octree_size, octree_level_size};

    #[test]
    fn test_full_octree_size() {
        assert!(full_octree_size(1) == 1);
        assert!(full_octree_size(2) == 9);
        assert!(full_octree_size(3) == 73);
        assert!(full_octree_size(4) == 585);
    }

    #[test]
    fn test_level_sizes_sum_to_tree_size() {
        for levels in 1..6 {
            let total: u64 = (0..levels).map(octree_level_size).sum();
            assert!(total == full_octree_size(levels));
        }
    }

    #[test]
    fn test_full_binary_tree_size() {
        assert!(full_binary_tree_size(1) == 1);
        assert!(full_binary_tree_size(4) == 7);
        assert!(full_binary_tree_size(8) == 15);
    }
}
