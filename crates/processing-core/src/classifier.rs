//! Three-way gaze direction heuristic.
//!
//! Left requires both iris centers strictly left of their eye's first
//! corner; Right requires both strictly right of the second corner.
//! Anything else, including the eyes disagreeing, is Center.

use gazelog_session_model::gaze::{EyeReference, GazeDirection, IrisCenter};

use crate::geometry::EyeGeometry;

/// Classify one frame's geometry.
pub fn classify(geometry: &EyeGeometry) -> GazeDirection {
    classify_parts(
        geometry.left_iris,
        geometry.left_eye,
        geometry.right_iris,
        geometry.right_eye,
    )
}

/// Classify from individual per-eye values.
pub fn classify_parts(
    left_iris: IrisCenter,
    left_eye: EyeReference,
    right_iris: IrisCenter,
    right_eye: EyeReference,
) -> GazeDirection {
    if left_iris.x < left_eye.first && right_iris.x < right_eye.first {
        GazeDirection::Left
    } else if left_iris.x > left_eye.second && right_iris.x > right_eye.second {
        GazeDirection::Right
    } else {
        GazeDirection::Center
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iris(x: i32) -> IrisCenter {
        IrisCenter::new(x, 0)
    }

    fn eye(first: i32, second: i32) -> EyeReference {
        EyeReference::new(first, second)
    }

    #[test]
    fn test_both_eyes_left_of_first_corner() {
        assert_eq!(
            classify_parts(iris(9), eye(10, 30), iris(49), eye(50, 70)),
            GazeDirection::Left
        );
    }

    #[test]
    fn test_both_eyes_right_of_second_corner() {
        assert_eq!(
            classify_parts(iris(31), eye(10, 30), iris(71), eye(50, 70)),
            GazeDirection::Right
        );
    }

    #[test]
    fn test_boundaries_are_strict() {
        assert_eq!(
            classify_parts(iris(10), eye(10, 30), iris(49), eye(50, 70)),
            GazeDirection::Center
        );
        assert_eq!(
            classify_parts(iris(31), eye(10, 30), iris(70), eye(50, 70)),
            GazeDirection::Center
        );
    }

    #[test]
    fn test_disagreeing_eyes_are_center() {
        assert_eq!(
            classify_parts(iris(5), eye(10, 30), iris(80), eye(50, 70)),
            GazeDirection::Center
        );
    }

    #[test]
    fn test_first_corner_only_for_left_and_second_only_for_right() {
        // Corners given in descending order: first=30, second=10.
        // x=20 is left of the first corner for both eyes -> Left,
        // even though it is right of the second corner.
        assert_eq!(
            classify_parts(iris(20), eye(30, 10), iris(60), eye(70, 50)),
            GazeDirection::Left
        );
        // x=5 is below both corners: Left wins because it is tested first.
        assert_eq!(
            classify_parts(iris(5), eye(30, 10), iris(45), eye(70, 50)),
            GazeDirection::Left
        );
    }

    #[test]
    fn test_classify_uses_geometry_fields() {
        let geometry = EyeGeometry {
            left_iris: iris(31),
            right_iris: iris(71),
            left_eye: eye(10, 30),
            right_eye: eye(50, 70),
        };
        assert_eq!(classify(&geometry), GazeDirection::Right);
    }
}
