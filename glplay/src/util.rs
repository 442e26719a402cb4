use glam::{Mat4, Vec3};

/// Camera three units back on +Z looking at the origin.
pub fn default_view() -> Mat4 {
    Mat4::look_at_rh(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::Y)
}

/// Width over height of a drawable, treating a zero height as one pixel.
pub fn aspect_ratio(width: i32, height: i32) -> f32 {
    width as f32 / height.max(1) as f32
}

/// 50 degree vertical field of view, near plane 1, far plane 100.
pub fn default_projection(aspect_ratio: f32) -> Mat4 {
    Mat4::perspective_rh_gl(50f32.to_radians(), aspect_ratio, 1.0, 100.0)
}

/// Model matrix of a cube wobbling around a point `depth` units in front of
/// the camera while spinning about X and Y.
pub fn tumbling_model(t: f32, depth: f32) -> Mat4 {
    let wobble = Vec3::new(
        (2.1 * t).sin() * 0.5,
        (1.7 * t).cos() * 0.5,
        (1.3 * t).sin() * (1.5 * t).cos() * 2.0,
    );
    let translation =
        Mat4::from_translation(Vec3::new(0.0, 0.0, -depth)) * Mat4::from_translation(wobble);
    let rotation =
        Mat4::from_rotation_x((t * 81.0).to_radians()) * Mat4::from_rotation_y((t * 45.0).to_radians());
    translation * rotation
}

pub fn tumbling_model_view(t: f32, depth: f32) -> Mat4 {
    default_view() * tumbling_model(t, depth)
}

/// Corners of an axis aligned cube centered on the origin, four per face in
/// +X, -X, +Y, -Y, +Z, -Z order. Each face winds counter-clockwise seen from
/// outside.
pub fn cube_faces(half_extent: f32) -> [[Vec3; 4]; 6] {
    // (outward normal, s axis, t axis) with s x t = normal
    let axes = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];
    axes.map(|(normal, s, t)| {
        [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)]
            .map(|(a, b)| (normal + s * a + t * b) * half_extent)
    })
}

/// Two triangles per face for the 24 corners of [`cube_faces`].
pub fn cube_face_indices() -> [u8; 36] {
    std::array::from_fn(|i| {
        let face = (i / 6) as u8;
        [0, 1, 2, 0, 2, 3][i % 6] + face * 4
    })
}

#[cfg(test)]
mod tests {
    use glam::Vec4;
    use rand::Rng;

    use super::*;

    #[test]
    fn tumbling_is_reproducible() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let t: f32 = rng.gen_range(0.0..10_000.0);
            let a = tumbling_model(t, 3.0).to_cols_array();
            let b = tumbling_model(t, 3.0).to_cols_array();
            assert_eq!(a.map(f32::to_bits), b.map(f32::to_bits));
        }
    }

    #[test]
    fn at_time_zero_only_the_offset_remains() {
        let model = tumbling_model(0.0, 5.0);
        let origin = model * Vec4::new(0.0, 0.0, 0.0, 1.0);
        // sin(0) = 0, cos(0) * 0.5 = 0.5
        assert_eq!(origin, Vec4::new(0.0, 0.5, -5.0, 1.0));
    }

    #[test]
    fn rotation_keeps_lengths() {
        let model = tumbling_model(1.37, 3.0);
        let center = model.transform_point3(Vec3::ZERO);
        let corner = model.transform_point3(Vec3::ONE);
        assert!(((corner - center).length() - 3f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn cube_faces_wind_outwards() {
        let corners: Vec<Vec3> = cube_faces(0.5).into_iter().flatten().collect();
        for triangle in cube_face_indices().chunks_exact(3) {
            let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|i| corners[i as usize]);
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0, "triangle {triangle:?} faces inwards");
        }
        assert!(corners.iter().all(|corner| corner.abs() == Vec3::splat(0.5)));
    }

    #[test]
    fn cube_indices_cover_every_corner() {
        let indices = cube_face_indices();
        assert_eq!(indices.iter().max(), Some(&23));
        assert!((0..24).all(|corner| indices.contains(&corner)));
    }

    #[test]
    fn view_moves_camera_back() {
        let eye_space = default_view().transform_point3(Vec3::ZERO);
        assert!((eye_space - Vec3::new(0.0, 0.0, -3.0)).length() < 1e-6);
    }

    #[test]
    fn aspect_ratio_survives_zero_height() {
        assert_eq!(aspect_ratio(480, 270), 480.0 / 270.0);
        assert_eq!(aspect_ratio(480, 0), 480.0);
    }

    #[test]
    fn projection_depends_on_aspect() {
        let wide = default_projection(16.0 / 9.0);
        let square = default_projection(1.0);
        assert_eq!(wide.y_axis, square.y_axis);
        assert!(wide.x_axis.x < square.x_axis.x);
    }
}
