#[cfg(test)]
mod zorder_tests {
    use crate::spatial::math::{octant_offset, zorder};

    #[test]
    fn test_axis_bits() {
        assert!(zorder(0, 0, 0) == 0);
        assert!(zorder(1, 0, 0) == 1);
        assert!(zorder(0, 1, 0) == 2);
        assert!(zorder(0, 0, 1) == 4);
        assert!(zorder(1, 1, 1) == 7);
        assert!(zorder(2, 0, 0) == 8);
        assert!(zorder(3, 3, 3) == 63);
    }

    #[test]
    fn test_bijection_on_base_grid() {
        // every coordinate triple below 2^k maps to a unique index in [0, 8^k)
        for grid_size in [1u32, 2, 4, 8] {
            let node_count = (grid_size * grid_size * grid_size) as usize;
            let mut seen = vec![false; node_count];
            for z in 0..grid_size {
                for y in 0..grid_size {
                    for x in 0..grid_size {
                        let idx = zorder(x, y, z) as usize;
                        assert!(idx < node_count);
                        assert!(!seen[idx]);
                        seen[idx] = true;
                    }
                }
            }
            assert!(seen.iter().all(|hit| *hit));
        }
    }

    #[test]
    fn test_children_are_consecutive() {
        // the eight children of the cell at (x,y,z) occupy indices 8*i..8*i+8
        for z in 0..4 {
            for y in 0..4 {
                for x in 0..4 {
                    let parent = zorder(x, y, z);
                    for octant in 0..8usize {
                        let offset = octant_offset(octant);
                        let child =
                            zorder(2 * x + offset.x, 2 * y + offset.y, 2 * z + offset.z);
                        assert!(child == 8 * parent + octant as u32);
                    }
                }
            }
        }
    }

    #[test]
    fn test_upper_coordinate_range() {
        assert!(zorder(1023, 1023, 1023) == 0x3FFF_FFFF);
    }
}

#[cfg(test)]
mod projection_tests {
    use crate::spatial::math::flat_projection;

    #[test]
    fn test_x_fastest_order() {
        let mut expected = 0;
        for z in 0..3 {
            for y in 0..4 {
                for x in 0..5 {
                    assert!(flat_projection(x, y, z, 5, 4) == expected);
                    expected += 1;
                }
            }
        }
    }
}
