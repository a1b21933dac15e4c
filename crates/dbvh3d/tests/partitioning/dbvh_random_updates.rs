use dbvh3d::bounding_volume::{Aabb, BoundingVolume};
use dbvh3d::math::{Point, Real, Vector};
use dbvh3d::partitioning::{Dbvh, DbvhConfig, DbvhError};
use oorandom::Rand32;
use std::cell::RefCell;
use std::rc::Rc;

const NUM_ITEMS: usize = 256;

fn random_aabb(rng: &mut Rand32) -> Aabb {
    let mins = Point::new(
        rng.rand_float() as Real * 64.0,
        rng.rand_float() as Real * 64.0,
        rng.rand_float() as Real * 64.0,
    );
    let size = Vector::new(
        rng.rand_float() as Real * 4.0,
        rng.rand_float() as Real * 4.0,
        rng.rand_float() as Real * 4.0,
    );
    Aabb::new(mins, mins + size)
}

fn sorted(mut items: Vec<usize>) -> Vec<usize> {
    items.sort_unstable();
    items
}

/// Checks the tree against a linear scan over the items it is supposed to contain.
fn check_queries(
    dbvh: &Dbvh<usize, impl Fn(&usize) -> Aabb>,
    bounds: &[Aabb],
    stored: &[bool],
    rng: &mut Rand32,
) {
    for _ in 0..10 {
        let query = random_aabb(rng);
        let expected: Vec<_> = (0..bounds.len())
            .filter(|i| stored[*i] && bounds[*i].intersects(&query))
            .collect();
        assert_eq!(sorted(dbvh.intersect_aabb(&query)), expected);

        let point = query.center();
        let expected: Vec<_> = (0..bounds.len())
            .filter(|i| stored[*i] && bounds[*i].contains_local_point(&point))
            .collect();
        assert_eq!(sorted(dbvh.contains_point(&point)), expected);
    }
}

#[test]
fn random_insertions_removals_and_moves() {
    for seed in 0..8 {
        let mut rng = Rand32::new(seed);
        let bounds = Rc::new(RefCell::new(
            (0..NUM_ITEMS)
                .map(|_| random_aabb(&mut rng))
                .collect::<Vec<_>>(),
        ));
        let provider_bounds = bounds.clone();
        let mut dbvh = Dbvh::with_provider(move |i: &usize| provider_bounds.borrow()[*i]);
        let mut stored = vec![false; NUM_ITEMS];

        for step in 0..2000 {
            let item = rng.rand_range(0..NUM_ITEMS as u32) as usize;

            match rng.rand_range(0..5) {
                0 | 1 => {
                    let result = dbvh.insert(item);
                    if stored[item] {
                        assert_eq!(result, Err(DbvhError::DuplicateItem));
                    } else {
                        assert_eq!(result, Ok(()));
                        stored[item] = true;
                    }
                }
                2 => {
                    assert_eq!(dbvh.remove(&item), stored[item]);
                    stored[item] = false;
                }
                3 => {
                    bounds.borrow_mut()[item] = random_aabb(&mut rng);
                    let result = dbvh.refit_item(&item);
                    if stored[item] {
                        assert_eq!(result, Ok(()));
                    } else {
                        assert_eq!(result, Err(DbvhError::UnknownItem));
                    }
                }
                _ => {
                    if step % 3 == 0 {
                        dbvh.rebuild();
                    } else {
                        let _ = dbvh.optimize();
                    }
                }
            }

            dbvh.assert_well_formed();
            assert_eq!(dbvh.len(), stored.iter().filter(|s| **s).count());

            if step % 100 == 0 {
                dbvh.assert_leaves_match_provider();
                check_queries(&dbvh, &bounds.borrow(), &stored, &mut rng);
            }
        }
    }
}

#[test]
fn optimize_reaches_a_fixed_point_after_moves() {
    let mut rng = Rand32::new(3);
    let bounds = Rc::new(RefCell::new(
        (0..NUM_ITEMS)
            .map(|_| random_aabb(&mut rng))
            .collect::<Vec<_>>(),
    ));
    let provider_bounds = bounds.clone();
    let mut dbvh = Dbvh::from_items(
        move |i: &usize| provider_bounds.borrow()[*i],
        0..NUM_ITEMS,
    )
    .unwrap();
    let stored = vec![true; NUM_ITEMS];

    for _ in 0..10 {
        // Every item moves a bit, like in a simulation step.
        for aabb in bounds.borrow_mut().iter_mut() {
            let shift = Vector::new(
                rng.rand_float() as Real - 0.5,
                rng.rand_float() as Real - 0.5,
                rng.rand_float() as Real - 0.5,
            ) * 8.0;
            *aabb = Aabb::new(aabb.mins + shift, aabb.maxs + shift);
        }

        dbvh.refit_all().unwrap();
        let _ = dbvh.optimize();
        dbvh.assert_well_formed();
        assert_eq!(dbvh.optimize(), 0);
        check_queries(&dbvh, &bounds.borrow(), &stored, &mut rng);
    }
}

#[test]
fn optimize_with_gain_threshold_keeps_queries_exact() {
    let mut rng = Rand32::new(11);
    let bounds: Vec<_> = (0..NUM_ITEMS).map(|_| random_aabb(&mut rng)).collect();
    let provider_bounds = bounds.clone();
    let mut dbvh = Dbvh::from_items_with_config(
        move |i: &usize| provider_bounds[*i],
        DbvhConfig::default().with_min_rotation_gain(0.3),
        0..NUM_ITEMS,
    )
    .unwrap();

    let _ = dbvh.optimize();
    dbvh.assert_well_formed();
    assert_eq!(dbvh.len(), NUM_ITEMS);
    assert_eq!(dbvh.optimize(), 0);
    check_queries(&dbvh, &bounds, &[true; NUM_ITEMS], &mut rng);
}

/// Optimizes the tree twice and checks the first call converged without degrading the tree.
fn check_optimize_convergence(
    dbvh: &mut Dbvh<usize, impl Fn(&usize) -> Aabb>,
    bounds: &[Aabb],
) {
    let cost_before = dbvh.surface_area_cost();
    let depth_before = dbvh.subtree_depth();

    let _ = dbvh.optimize();
    dbvh.assert_well_formed();
    assert_eq!(dbvh.optimize(), 0);

    // Rotations only ever decrease the total area, up to the rounding of the sum.
    let cost_after = dbvh.surface_area_cost();
    assert!(
        cost_after <= cost_before * 1.0001,
        "cost went from {} to {}",
        cost_before,
        cost_after
    );
    assert!(
        dbvh.subtree_depth() <= 3 * depth_before,
        "depth went from {} to {}",
        depth_before,
        dbvh.subtree_depth()
    );

    let mut rng = Rand32::new(1234);
    check_queries(dbvh, bounds, &vec![true; bounds.len()], &mut rng);
}

fn random_aabbs(rng: &mut Rand32, len: usize) -> Vec<Aabb> {
    (0..len).map(|_| random_aabb(rng)).collect()
}

#[test]
fn optimize_converges_on_large_median_built_trees() {
    for (seed, len) in [(0, 1000), (1, 1000), (2, 2000), (3, 5000)] {
        let mut rng = Rand32::new(seed);
        let bounds = random_aabbs(&mut rng, len);
        let provider_bounds = bounds.clone();
        let mut dbvh = Dbvh::from_items(move |i: &usize| provider_bounds[*i], 0..len).unwrap();
        check_optimize_convergence(&mut dbvh, &bounds);
    }
}

#[test]
fn optimize_converges_on_large_incrementally_built_trees() {
    for (seed, len) in [(4, 1000), (5, 1000), (6, 2000)] {
        let mut rng = Rand32::new(seed);
        let bounds = random_aabbs(&mut rng, len);
        let provider_bounds = bounds.clone();
        let mut dbvh = Dbvh::with_provider(move |i: &usize| provider_bounds[*i]);

        for i in 0..len {
            dbvh.insert(i).unwrap();
        }

        check_optimize_convergence(&mut dbvh, &bounds);
    }
}

#[test]
fn optimize_is_idempotent_for_many_seeds() {
    for seed in 0..20 {
        let mut rng = Rand32::new(100 + seed);
        let bounds = random_aabbs(&mut rng, 512);
        let provider_bounds = bounds.clone();
        let mut dbvh = Dbvh::with_provider(move |i: &usize| provider_bounds[*i]);
        assert_eq!(dbvh.insert_all(0..512), Ok(512));
        check_optimize_convergence(&mut dbvh, &bounds);
    }
}
