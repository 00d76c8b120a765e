//! End-to-end scenarios on small hand-built detector layers.

use approx::assert_abs_diff_eq;
use rich_kernel_geom::{Sphere, Surface};
use rich_kernel_layer::{
    ComponentSpec, GeoParameters, IntersectionQuery, Layer, LayerTable, Progression, Side,
};
use rich_kernel_math::{Point3, Transform, Vec3};
use rich_kernel_raytrace::Ray;

const R: f64 = 500.0;

/// Square of half-width `half` in z = `z`, outward normal -z.
fn square(z: f64, half: f64) -> Surface {
    Surface::from_polygon(&[
        Point3::new(-half, -half, z),
        Point3::new(-half, half, z),
        Point3::new(half, half, z),
        Point3::new(half, -half, z),
    ])
}

/// Closed box between z0 and z1 around the z axis.
fn slab(x0: f64, y0: f64, side: f64, z0: f64, z1: f64) -> Surface {
    let p = |x: f64, y: f64, z: f64| Point3::new(x0 + x * side, y0 + y * side, z);
    let mut s = Surface::new();
    // bottom (-z) and top (+z)
    s.append(&Surface::from_polygon(&[p(0.0, 0.0, z0), p(0.0, 1.0, z0), p(1.0, 1.0, z0), p(1.0, 0.0, z0)]));
    s.append(&Surface::from_polygon(&[p(0.0, 0.0, z1), p(1.0, 0.0, z1), p(1.0, 1.0, z1), p(0.0, 1.0, z1)]));
    // sides
    s.append(&Surface::from_polygon(&[p(0.0, 0.0, z0), p(1.0, 0.0, z0), p(1.0, 0.0, z1), p(0.0, 0.0, z1)]));
    s.append(&Surface::from_polygon(&[p(1.0, 0.0, z0), p(1.0, 1.0, z0), p(1.0, 1.0, z1), p(1.0, 0.0, z1)]));
    s.append(&Surface::from_polygon(&[p(1.0, 1.0, z0), p(0.0, 1.0, z0), p(0.0, 1.0, z1), p(1.0, 1.0, z1)]));
    s.append(&Surface::from_polygon(&[p(0.0, 1.0, z0), p(0.0, 0.0, z0), p(0.0, 0.0, z1), p(0.0, 1.0, z1)]));
    s
}

fn cap_height() -> f64 {
    R - (R * R - 2.0 * 50.0 * 50.0_f64).sqrt()
}

fn spherical_mirror() -> Layer {
    let table = LayerTable::builtin();
    let sphere = Sphere::new(Point3::new(0.0, 0.0, R), R);
    Layer::from_table(&table, 1, 11)
        .unwrap()
        .component(ComponentSpec::new(0, square(cap_height(), 50.0)).with_sphere(sphere))
        .sphere(sphere)
        .build()
        .unwrap()
}

#[test]
fn square_entrance_and_exit() {
    let table = LayerTable::builtin();
    let layer = Layer::from_table(&table, 1, 4)
        .unwrap()
        .component(ComponentSpec::new(0, square(0.0, 10.0)))
        .build()
        .unwrap();

    let up = Ray::new(Point3::new(0.0, 0.0, -5.0), Vec3::z());
    let entrance = layer.find_entrance(&up, None).unwrap();
    assert_abs_diff_eq!(entrance.position, Point3::origin(), epsilon = 1e-12);
    assert_abs_diff_eq!(entrance.normal.into_inner(), Vec3::z(), epsilon = 1e-12);

    let down = Ray::new(Point3::new(0.0, 0.0, 5.0), -Vec3::z());
    let exit = layer.find_exit(&down, None).unwrap();
    assert_abs_diff_eq!(exit.position, Point3::origin(), epsilon = 1e-12);
    assert_abs_diff_eq!(exit.normal.into_inner(), Vec3::z(), epsilon = 1e-12);
    assert_eq!(exit.side, Side::Exit);
}

#[test]
fn entrance_before_exit_along_direction() {
    let table = LayerTable::builtin();
    let layer = Layer::from_table(&table, 2, 2)
        .unwrap()
        .component(ComponentSpec::new(0, slab(-10.0, -10.0, 20.0, 0.0, 3.0)).with_refractive_index(1.03))
        .build()
        .unwrap();

    for dir in [Vec3::new(0.1, 0.05, 1.0), Vec3::new(-0.2, 0.1, -1.0)] {
        let origin = Point3::new(0.0, 0.0, 1.5) - dir.normalize() * 10.0;
        let ray = Ray::new(origin, dir);
        let entrance = layer.find_entrance(&ray, Some(0)).unwrap();
        let exit = layer.find_exit(&ray, Some(0)).unwrap();
        let c = ray.cos_theta();
        assert!(c * (exit.position.z - entrance.position.z) > 0.0);
        assert_eq!(entrance.n_out, Some(1.03));
        assert_eq!(exit.n_in, Some(1.03));
        assert_abs_diff_eq!(entrance.normal.norm(), 1.0, epsilon = 1e-9);
    }
}

#[test]
fn backward_progression_finds_crossings_behind() {
    let table = LayerTable::builtin();
    let layer = Layer::from_table(&table, 1, 5)
        .unwrap()
        .component(ComponentSpec::new(0, slab(-10.0, -10.0, 20.0, 0.0, 2.0)))
        .build()
        .unwrap();
    let ray = Ray::new(Point3::new(0.0, 0.0, 20.0), Vec3::z());
    let q = IntersectionQuery::new(Side::Exit, Progression::Backward, false);
    let exit = layer.find_intersection(&ray, None, q).unwrap();
    assert_abs_diff_eq!(exit.position.z, 2.0, epsilon = 1e-12);
}

#[test]
fn spherical_cap_refinement() {
    let layer = spherical_mirror();
    let sphere = *layer.sphere(Some(0)).unwrap();
    let ray = Ray::new(Point3::new(0.0, 0.0, -100.0), Vec3::z());

    let planar = layer
        .find_intersection(&ray, Some(0), IntersectionQuery::new(Side::Entrance, Progression::Forward, false))
        .unwrap();
    assert_abs_diff_eq!(planar.position.z, cap_height(), epsilon = 1e-9);

    let refined = layer.find_entrance_curved(&ray, Some(0)).unwrap();
    assert_abs_diff_eq!(refined.position, Point3::origin(), epsilon = 1e-6);
    assert_abs_diff_eq!(sphere.signed_distance(&refined.position), 0.0, epsilon = 1e-6);
    assert!((refined.position - planar.position).norm() <= layer.params().max_sphere_deviation);
    assert_eq!(refined.face, planar.face);
    assert_eq!(refined.component, Some(0));
}

#[test]
fn oblique_rays_refine_onto_sphere() {
    let layer = spherical_mirror();
    let sphere = *layer.sphere(None).unwrap();
    for (x, y) in [(10.0, 0.0), (-20.0, 15.0), (30.0, -30.0)] {
        let ray = Ray::new(Point3::new(x, y, -100.0), Vec3::new(0.02, -0.01, 1.0));
        let hit = layer.find_entrance(&ray, None).unwrap();
        assert_abs_diff_eq!(sphere.signed_distance(&hit.position), 0.0, epsilon = 1e-6);
        let outward = sphere.normal_at(&hit.position).unwrap();
        assert_abs_diff_eq!(hit.normal.into_inner(), -outward.into_inner(), epsilon = 1e-9);
    }
}

#[test]
fn spherical_barycenter_on_apex() {
    let layer = spherical_mirror();
    let b = layer.surface_barycenter(Some(0), &-Vec3::z()).unwrap();
    assert_abs_diff_eq!(b, Point3::origin(), epsilon = 1e-9);
    assert!(layer.sphere_consistent(Some(0)));
}

#[test]
fn quadrant_always_in_range() {
    let table = LayerTable::builtin();
    let layer = Layer::from_table(&table, 1, 0)
        .unwrap()
        .component(ComponentSpec::new(0, slab(0.0, 0.0, 20.0, 0.0, 2.0)))
        .build()
        .unwrap();
    for n in 1..=6 {
        for i in -3..=8 {
            for j in -3..=8 {
                let p = Point3::new(i as f64 * 4.0, j as f64 * 4.0, 2.0);
                let q = layer.tile_quadrant(n, 0, &p).unwrap();
                assert!(q < n * n);
            }
        }
    }
}

#[test]
fn transformed_tile_keeps_quadrants() {
    // tile rotated about the beam axis and shifted
    let t = Transform::rotation_z(10f64.to_radians()).then(&Transform::translation(100.0, 50.0, 0.0));
    let table = LayerTable::builtin();
    let layer = Layer::from_table(&table, 4, 1)
        .unwrap()
        .component(ComponentSpec::new(0, slab(0.0, 0.0, 20.0, 0.0, 2.0).transformed(&t)))
        .build()
        .unwrap();
    let inside = t.apply_point(&Point3::new(15.0, 5.0, 2.0));
    assert_eq!(layer.tile_quadrant(2, 0, &inside).unwrap(), 1);
    let inside = t.apply_point(&Point3::new(5.0, 15.0, 2.0));
    assert_eq!(layer.tile_quadrant(2, 0, &inside).unwrap(), 2);
}

#[test]
fn parameters_from_toml_drive_queries() {
    let params = GeoParameters::from_toml_str("min_ray_step = 6.0").unwrap();
    let table = LayerTable::builtin();
    let layer = Layer::from_table(&table, 1, 4)
        .unwrap()
        .params(params)
        .component(ComponentSpec::new(0, square(0.0, 10.0)))
        .build()
        .unwrap();
    let ray = Ray::new(Point3::new(0.0, 0.0, -5.0), Vec3::z());
    assert!(layer.find_entrance(&ray, None).is_none());
    let far = Ray::new(Point3::new(0.0, 0.0, -7.0), Vec3::z());
    assert!(layer.find_entrance(&far, None).is_some());
}

#[test]
fn custom_layer_table() {
    let table = LayerTable::from_toml_str(
        r#"
        [[layer]]
        id = 0
        db_id = 900
        name = "test_wall"
        kind = { planar_mirror = "lateral" }
        orientation = "left"
        "#,
    )
    .unwrap();
    let layer = Layer::from_table(&table, 1, 0)
        .unwrap()
        .component(ComponentSpec::new(0, square(0.0, 1.0)))
        .build()
        .unwrap();
    assert!(layer.kind().is_lateral_mirror());
    assert_abs_diff_eq!(layer.inward().into_inner(), Vec3::x(), epsilon = 1e-12);
    assert_eq!(layer.db_id(), 900);
}
