//! Iris and eye-corner geometry.
//!
//! Landmarks are converted to pixels by truncation before any averaging,
//! and averages are truncated again, so results are whole pixels.

use gazelog_session_model::gaze::{EyeReference, IrisCenter};
use gazelog_session_model::landmark::{
    LandmarkSet, LEFT_EYE, LEFT_IRIS, RIGHT_EYE, RIGHT_IRIS,
};

/// Centroid of four iris boundary points.
///
/// Returns `None` if any index is missing from the set.
pub fn iris_center(landmarks: &LandmarkSet, iris_points: &[usize; 4]) -> Option<IrisCenter> {
    let mut sum_x: i64 = 0;
    let mut sum_y: i64 = 0;
    for &index in iris_points {
        let (x, y) = landmarks.pixel(index)?;
        sum_x += x as i64;
        sum_y += y as i64;
    }
    let n = iris_points.len() as f64;
    Some(IrisCenter::new(
        (sum_x as f64 / n) as i32,
        (sum_y as f64 / n) as i32,
    ))
}

/// Pixel X of the two eye-corner points, in the given order.
pub fn eye_reference(landmarks: &LandmarkSet, corner_points: &[usize; 2]) -> Option<EyeReference> {
    Some(EyeReference::new(
        landmarks.pixel_x(corner_points[0])?,
        landmarks.pixel_x(corner_points[1])?,
    ))
}

/// Everything the classifier needs from one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EyeGeometry {
    pub left_iris: IrisCenter,
    pub right_iris: IrisCenter,
    pub left_eye: EyeReference,
    pub right_eye: EyeReference,
}

impl EyeGeometry {
    /// Derive both eyes' geometry using the face-mesh index sets.
    pub fn from_landmarks(landmarks: &LandmarkSet) -> Option<Self> {
        Some(Self {
            left_iris: iris_center(landmarks, &LEFT_IRIS)?,
            right_iris: iris_center(landmarks, &RIGHT_IRIS)?,
            left_eye: eye_reference(landmarks, &LEFT_EYE)?,
            right_eye: eye_reference(landmarks, &RIGHT_EYE)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gazelog_session_model::landmark::{Landmark, FACE_MESH_POINTS};

    fn mesh_with(points: &[(usize, f64, f64)]) -> LandmarkSet {
        let mut mesh = vec![Landmark::new(0.5, 0.5); FACE_MESH_POINTS];
        for &(i, x, y) in points {
            mesh[i] = Landmark::new(x, y);
        }
        LandmarkSet::new(100, 200, mesh)
    }

    #[test]
    fn test_iris_center_is_truncated_mean_of_truncated_pixels() {
        // x pixels: 10, 11, 12, 12 -> mean 11.25 -> 11
        // y pixels: 20, 21, 21, 23 -> mean 21.25 -> 21
        let set = mesh_with(&[
            (474, 0.105, 0.1049),
            (475, 0.119, 0.1051),
            (476, 0.125, 0.1074),
            (477, 0.1299, 0.1199),
        ]);
        assert_eq!(iris_center(&set, &LEFT_IRIS), Some(IrisCenter::new(11, 21)));
    }

    #[test]
    fn test_eye_reference_keeps_index_order() {
        let set = mesh_with(&[(33, 0.305, 0.0), (133, 0.105, 0.0)]);
        assert_eq!(
            eye_reference(&set, &LEFT_EYE),
            Some(EyeReference::new(30, 10))
        );
    }

    #[test]
    fn test_missing_indices_yield_none() {
        let short = LandmarkSet::new(100, 100, vec![Landmark::new(0.1, 0.1); 468]);
        assert_eq!(iris_center(&short, &LEFT_IRIS), None);
        assert!(eye_reference(&short, &LEFT_EYE).is_some());
        assert_eq!(EyeGeometry::from_landmarks(&short), None);
    }

    #[test]
    fn test_from_landmarks_uses_both_eyes() {
        let set = mesh_with(&[
            (469, 0.205, 0.5),
            (470, 0.205, 0.5),
            (471, 0.205, 0.5),
            (472, 0.205, 0.5),
            (362, 0.255, 0.5),
            (263, 0.355, 0.5),
        ]);
        let geometry = EyeGeometry::from_landmarks(&set).unwrap();
        assert_eq!(geometry.right_iris, IrisCenter::new(20, 100));
        assert_eq!(geometry.right_eye, EyeReference::new(25, 35));
        assert_eq!(geometry.left_iris, IrisCenter::new(50, 100));
    }
}
