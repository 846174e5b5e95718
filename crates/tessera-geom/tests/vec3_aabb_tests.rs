use tessera_geom::{Aabb, Face, Vec3};

fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn vec3_approx_eq(a: Vec3, b: Vec3, eps: f32) -> bool {
    approx_eq(a.x, b.x, eps) && approx_eq(a.y, b.y, eps) && approx_eq(a.z, b.z, eps)
}

#[test]
fn vec3_add_sub_neg() {
    let a = Vec3::new(1.0, 2.0, 3.0);
    let b = Vec3::new(-4.0, 5.0, -6.0);
    let c = a + b;
    assert!(vec3_approx_eq(c, Vec3::new(-3.0, 7.0, -3.0), 1e-6));
    assert!(vec3_approx_eq(c - a, b, 1e-6));
    assert!(vec3_approx_eq(-a, Vec3::new(-1.0, -2.0, -3.0), 1e-6));
}

#[test]
fn vec3_normalized_zero_is_noop() {
    let n = Vec3::new(3.0, 4.0, 0.0).normalized();
    assert!(vec3_approx_eq(n, Vec3::new(0.6, 0.8, 0.0), 1e-6));
    assert!(vec3_approx_eq(Vec3::ZERO.normalized(), Vec3::ZERO, 1e-6));
}

#[test]
fn voxel_floors_negative_coordinates() {
    assert_eq!(Vec3::new(-0.5, 0.5, -1.0).voxel(), (-1, 0, -1));
    assert_eq!(Vec3::new(15.99, 255.0, -16.01).voxel(), (15, 255, -17));
}

#[test]
fn aabb_touching_faces_do_not_intersect() {
    let a = Aabb::voxel(0, 0, 0);
    let b = Aabb::voxel(1, 0, 0);
    assert!(!a.intersects(&b));
    let c = Aabb::new(Vec3::new(0.5, 0.5, 0.5), Vec3::new(1.5, 1.5, 1.5));
    assert!(a.intersects(&c));
    assert!(b.intersects(&c));
}

#[test]
fn aabb_voxel_range_excludes_exact_max() {
    let a = Aabb::new(Vec3::new(0.2, 1.0, -0.5), Vec3::new(1.0, 2.8, 0.5));
    assert_eq!(a.voxel_range(), ((0, 1, -1), (0, 2, 0)));
}

#[test]
fn face_opposites_and_deltas() {
    for f in Face::ALL {
        assert_eq!(f.opposite().opposite(), f);
        let (dx, dy, dz) = f.delta();
        let (ox, oy, oz) = f.opposite().delta();
        assert_eq!((dx + ox, dy + oy, dz + oz), (0, 0, 0));
        assert_eq!(Face::from_delta(dx, dy, dz), Some(f));
        assert_eq!(Face::from_index(f.index()), f);
    }
    assert_eq!(Face::from_delta(1, 1, 0), None);
}
