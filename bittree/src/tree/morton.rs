//! Balanced recursive bisection order over a rectangle of top-level blocks.
//!
//! The box is split repeatedly along the dimension that fits the largest
//! power of two strictly inside it (the last such dimension on ties), the
//! lower part coming first. On power-of-two squares this is plain Z-order
//! with dimension 0 varying fastest; on other rectangles it stays balanced.

#[inline(always)]
fn glb_pow2(x: u32) -> u32 {
    if x == 0 {
        0
    } else {
        1 << (31 - x.leading_zeros())
    }
}

/// Split dimension and split offset of `bx`, or None once it is one cell.
#[inline(always)]
fn split<const D: usize>(bx: &[u32; D]) -> Option<(usize, u32)> {
    let mut max_p2 = 0;
    let mut max_d = 0;
    for (d, &extent) in bx.iter().enumerate() {
        let p2 = glb_pow2(extent.saturating_sub(1));
        if p2 >= max_p2 {
            max_p2 = p2;
            max_d = d;
        }
    }
    if max_p2 == 0 {
        None
    } else {
        Some((max_d, max_p2))
    }
}

#[inline(always)]
fn lower_population<const D: usize>(bx: &[u32; D], split_d: usize, p2: u32) -> usize {
    bx.iter()
        .enumerate()
        .map(|(d, &extent)| (if d == split_d { p2 } else { extent }) as usize)
        .product()
}

pub fn rect_coord_to_mort<const D: usize>(domain: &[u32; D], coord: &[u32; D]) -> usize {
    let mut x = *coord;
    let mut bx = *domain;
    let mut mort = 0;
    while let Some((d, p2)) = split(&bx) {
        if x[d] < p2 {
            bx[d] = p2;
        } else {
            mort += lower_population(&bx, d, p2);
            x[d] -= p2;
            bx[d] -= p2;
        }
    }
    mort
}

pub fn rect_mort_to_coord<const D: usize>(domain: &[u32; D], mut mort: usize) -> [u32; D] {
    let mut coord = [0u32; D];
    let mut bx = *domain;
    while let Some((d, p2)) = split(&bx) {
        let pop = lower_population(&bx, d, p2);
        if mort < pop {
            bx[d] = p2;
        } else {
            mort -= pop;
            coord[d] += p2;
            bx[d] -= p2;
        }
    }
    coord
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glb_pow2_values() {
        assert_eq!(glb_pow2(0), 0);
        assert_eq!(glb_pow2(1), 1);
        assert_eq!(glb_pow2(2), 2);
        assert_eq!(glb_pow2(3), 2);
        assert_eq!(glb_pow2(1000), 512);
        assert_eq!(glb_pow2(u32::MAX), 1 << 31);
    }

    #[test]
    fn square_is_z_order() {
        let domain = [4, 4];
        let order: Vec<[u32; 2]> = (0..16).map(|m| rect_mort_to_coord(&domain, m)).collect();
        assert_eq!(
            &order[..8],
            &[[0, 0], [1, 0], [0, 1], [1, 1], [2, 0], [3, 0], [2, 1], [3, 1]]
        );
    }

    #[test]
    fn two_by_three() {
        let domain = [2, 3];
        let order: Vec<[u32; 2]> = (0..6).map(|m| rect_mort_to_coord(&domain, m)).collect();
        assert_eq!(order, vec![[0, 0], [1, 0], [0, 1], [1, 1], [0, 2], [1, 2]]);
    }

    #[test]
    fn round_trips_on_odd_rectangles() {
        for domain in [[1u32, 1, 1], [2, 3, 4], [5, 1, 7], [3, 3, 3], [8, 2, 5]] {
            let pop: usize = domain.iter().map(|&e| e as usize).product();
            let mut seen = vec![false; pop];
            for z in 0..domain[2] {
                for y in 0..domain[1] {
                    for x in 0..domain[0] {
                        let c = [x, y, z];
                        let m = rect_coord_to_mort(&domain, &c);
                        assert!(m < pop);
                        assert!(!seen[m], "{domain:?}: {c:?} collides");
                        seen[m] = true;
                        assert_eq!(rect_mort_to_coord(&domain, m), c);
                    }
                }
            }
        }
    }

    #[test]
    fn one_dimensional_is_identity() {
        for m in 0..13 {
            assert_eq!(rect_coord_to_mort(&[13], &[m as u32]), m);
        }
    }
}
