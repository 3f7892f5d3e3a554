//! Seeded property checks over the math types.

use approx::{abs_diff_eq, assert_abs_diff_eq};
use reactor_shared::math::{Matrix, Quaternion, Vector3};
use reactor_tests::{compose, random_rotation, random_scale, random_vector, rng};

const CASES: usize = 200;

#[test]
fn normalized_vectors_have_unit_length() {
    let mut rng = rng(1);
    for _ in 0..CASES {
        let v = random_vector(&mut rng, 100.0);
        if v.length() > 0.0 {
            assert_abs_diff_eq!(v.normalize().length(), 1.0, epsilon = 1e-12);
        }
    }
    assert_eq!(Vector3::ZERO.normalize(), Vector3::ZERO);
}

#[test]
fn slerp_hits_endpoints_and_stays_unit() {
    let mut rng = rng(2);
    for _ in 0..CASES {
        let p = random_rotation(&mut rng);
        let q = random_rotation(&mut rng);
        assert_abs_diff_eq!(Quaternion::slerp(0.0, &p, &q, false), p, epsilon = 1e-9);
        assert_abs_diff_eq!(Quaternion::slerp(1.0, &p, &q, false), q, epsilon = 1e-9);
        for t in [0.1, 0.5, 0.9] {
            let s = Quaternion::slerp(t, &p, &q, true);
            assert_abs_diff_eq!(s.norm(), 1.0, epsilon = 1e-9);
        }
    }
}

#[test]
fn rotation_matrix_round_trip() {
    let mut rng = rng(3);
    for _ in 0..CASES {
        let r = Matrix::create_from_quaternion(&random_rotation(&mut rng));
        let back = Quaternion::from_rotation_matrix(&r).to_rotation_matrix();
        assert_abs_diff_eq!(back, r, epsilon = 1e-4);
    }
}

#[test]
fn quaternion_and_matrix_rotate_alike() {
    let mut rng = rng(4);
    for _ in 0..CASES {
        let q = random_rotation(&mut rng);
        let v = random_vector(&mut rng, 10.0);
        let m = Matrix::create_from_quaternion(&q);
        assert_abs_diff_eq!(q * v, m.transform_vector(v), epsilon = 1e-9);
    }
}

#[test]
fn inverse_round_trips() {
    let mut rng = rng(5);
    for _ in 0..CASES {
        let m = compose(random_scale(&mut rng), &random_rotation(&mut rng), random_vector(&mut rng, 50.0));
        let inv = m.invert().unwrap();
        assert_abs_diff_eq!(m * inv, Matrix::IDENTITY, epsilon = 1e-9);
        assert_abs_diff_eq!(inv.invert().unwrap(), m, epsilon = 1e-8);
    }
}

#[test]
fn transpose_and_identity_are_involutive() {
    let mut rng = rng(6);
    assert_eq!(Matrix::IDENTITY * Matrix::IDENTITY, Matrix::IDENTITY);
    for _ in 0..CASES {
        let m = compose(random_scale(&mut rng), &random_rotation(&mut rng), random_vector(&mut rng, 5.0));
        assert_eq!(m.transpose().transpose(), m);
    }
}

#[test]
fn decompose_recomposes() {
    let mut rng = rng(7);
    for _ in 0..CASES {
        let scale = random_scale(&mut rng);
        let rotation = random_rotation(&mut rng);
        let translation = random_vector(&mut rng, 20.0);
        let m = compose(scale, &rotation, translation);

        let (s, r, t) = m.decompose().unwrap();
        assert_eq!(t, translation);
        for (found, expected) in [(s.x, scale.x), (s.y, scale.y), (s.z, scale.z)] {
            assert_abs_diff_eq!(found.abs(), expected.abs(), epsilon = 1e-9);
        }
        assert_abs_diff_eq!(compose(s, &r, t), m, epsilon = 1e-9);

        if scale.x > 0.0 && scale.y > 0.0 && scale.z > 0.0 {
            assert_abs_diff_eq!(s, scale, epsilon = 1e-9);
            assert!(r.orientation_equals(&rotation, 1e-9));
        }
    }
}

#[test]
fn look_at_is_inverse_of_billboard_rotation() {
    let mut rng = rng(8);
    for _ in 0..CASES {
        let object = random_vector(&mut rng, 10.0);
        let camera = random_vector(&mut rng, 10.0);
        let up = Vector3::UNIT_Y;
        let to_camera = (camera - object).normalize();
        if object.squared_distance(camera) < 1e-2 || abs_diff_eq!(to_camera.dot(up).abs(), 1.0, epsilon = 1e-3) {
            continue;
        }
        let billboard = Matrix::create_billboard(object, camera, up, None);
        assert_abs_diff_eq!(billboard.forward(), to_camera, epsilon = 1e-9);

        let view = Matrix::create_look_at(object, camera, up);
        assert_abs_diff_eq!(view * billboard, Matrix::IDENTITY, epsilon = 1e-9);
    }
}

#[test]
fn perspective_scenario() {
    let p = Matrix::create_perspective(45.0, 1.0, 1.0, 1000.0).unwrap();
    assert_eq!(p.m[11], -1.0);
    assert_eq!(p.m[15], 0.0);
}
