use dbvh3d::bounding_volume::{Aabb, BoundingVolume};
use dbvh3d::math::{Point, Real, Vector};
use dbvh3d::partitioning::Dbvh;
use oorandom::Rand32;

fn random_point(rng: &mut Rand32, extent: Real) -> Point<Real> {
    Point::new(
        rng.rand_float() as Real * extent,
        rng.rand_float() as Real * extent,
        rng.rand_float() as Real * extent,
    )
}

fn random_aabb(rng: &mut Rand32, extent: Real, max_size: Real) -> Aabb {
    let mins = random_point(rng, extent);
    let size = Vector::new(
        rng.rand_float() as Real * max_size,
        rng.rand_float() as Real * max_size,
        rng.rand_float() as Real * max_size,
    );
    Aabb::new(mins, mins + size)
}

fn sorted(mut items: Vec<usize>) -> Vec<usize> {
    items.sort_unstable();
    items
}

fn brute_force_contains(
    boxes: &[Aabb],
    point: &Point<Real>,
    epsilon: &Vector<Real>,
) -> Vec<usize> {
    (0..boxes.len())
        .filter(|i| boxes[*i].loosened_by(epsilon).contains_local_point(point))
        .collect()
}

fn brute_force_intersect(boxes: &[Aabb], aabb: &Aabb, epsilon: &Vector<Real>) -> Vec<usize> {
    (0..boxes.len())
        .filter(|i| boxes[*i].loosened_by(epsilon).intersects(aabb))
        .collect()
}

#[test]
fn queries_match_brute_force_before_and_after_rebuild() {
    let mut rng = Rand32::new(42);
    let boxes: Vec<_> = (0..1000)
        .map(|_| random_aabb(&mut rng, 100.0, 5.0))
        .collect();
    let provider_boxes = boxes.clone();
    let mut dbvh = Dbvh::with_provider(move |i: &usize| provider_boxes[*i]);
    assert_eq!(dbvh.insert_all(0..boxes.len()), Ok(1000));
    dbvh.assert_well_formed();

    let points: Vec<_> = (0..100).map(|_| random_point(&mut rng, 100.0)).collect();
    let queries: Vec<_> = (0..100)
        .map(|_| random_aabb(&mut rng, 100.0, 10.0))
        .collect();
    let no_tolerance = Vector::zeros();

    let point_results: Vec<_> = points.iter().map(|pt| dbvh.contains_point(pt)).collect();
    let aabb_results: Vec<_> = queries.iter().map(|aabb| dbvh.intersect_aabb(aabb)).collect();

    for (pt, result) in points.iter().zip(&point_results) {
        assert_eq!(
            sorted(result.clone()),
            brute_force_contains(&boxes, pt, &no_tolerance)
        );
    }

    for (aabb, result) in queries.iter().zip(&aabb_results) {
        assert_eq!(
            sorted(result.clone()),
            brute_force_intersect(&boxes, aabb, &no_tolerance)
        );
    }

    dbvh.rebuild();
    dbvh.assert_well_formed();
    assert_eq!(dbvh.len(), 1000);

    for (pt, result) in points.iter().zip(&point_results) {
        assert_eq!(sorted(dbvh.contains_point(pt)), sorted(result.clone()));
    }

    for (aabb, result) in queries.iter().zip(&aabb_results) {
        assert_eq!(sorted(dbvh.intersect_aabb(aabb)), sorted(result.clone()));
    }
}

#[test]
fn tolerance_queries_match_brute_force() {
    let mut rng = Rand32::new(7);
    let boxes: Vec<_> = (0..300).map(|_| random_aabb(&mut rng, 50.0, 2.0)).collect();
    let provider_boxes = boxes.clone();
    let dbvh = Dbvh::from_items(move |i: &usize| provider_boxes[*i], 0..boxes.len()).unwrap();
    let epsilon = Vector::new(0.5, 1.0, 0.25);

    for _ in 0..100 {
        let pt = random_point(&mut rng, 50.0);
        assert_eq!(
            sorted(dbvh.contains_point_with_tolerance(&pt, &epsilon)),
            brute_force_contains(&boxes, &pt, &epsilon)
        );

        let aabb = random_aabb(&mut rng, 50.0, 3.0);
        assert_eq!(
            sorted(dbvh.intersect_aabb_with_tolerance(&aabb, &epsilon)),
            brute_force_intersect(&boxes, &aabb, &epsilon)
        );
    }
}

#[test]
fn insert_then_remove_restores_query_results() {
    let mut rng = Rand32::new(1234);
    let boxes: Vec<_> = (0..201).map(|_| random_aabb(&mut rng, 30.0, 4.0)).collect();
    let provider_boxes = boxes.clone();
    let mut dbvh = Dbvh::from_items(move |i: &usize| provider_boxes[*i], 0..200).unwrap();

    let points: Vec<_> = (0..50).map(|_| random_point(&mut rng, 30.0)).collect();
    let queries: Vec<_> = (0..50).map(|_| random_aabb(&mut rng, 30.0, 6.0)).collect();
    let before: Vec<_> = points
        .iter()
        .map(|pt| sorted(dbvh.contains_point(pt)))
        .chain(queries.iter().map(|aabb| sorted(dbvh.intersect_aabb(aabb))))
        .collect();

    dbvh.insert(200).unwrap();
    assert!(dbvh.remove(&200));
    dbvh.assert_well_formed();

    let after: Vec<_> = points
        .iter()
        .map(|pt| sorted(dbvh.contains_point(pt)))
        .chain(queries.iter().map(|aabb| sorted(dbvh.intersect_aabb(aabb))))
        .collect();
    assert_eq!(before, after);
}

#[test]
fn tree_bounds_enclose_every_item() {
    let mut rng = Rand32::new(99);
    let boxes: Vec<_> = (0..100).map(|_| random_aabb(&mut rng, 10.0, 1.0)).collect();
    let provider_boxes = boxes.clone();
    let dbvh = Dbvh::from_items(move |i: &usize| provider_boxes[*i], 0..100).unwrap();

    let union = boxes
        .iter()
        .fold(Aabb::new_invalid(), |acc, aabb| acc.merged(aabb));
    assert_eq!(dbvh.aabb(), union);
    assert_eq!(
        sorted(dbvh.intersect_aabb(&union)),
        (0..100).collect::<Vec<_>>()
    );
}
