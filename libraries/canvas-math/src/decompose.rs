use crate::GEOMETRY_EPSILON;
use glam::{DAffine2, DVec2};
use std::f64::consts::{PI, TAU};

/// An affine transform split into `translation * rotation * scale`, with any skew dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decomposed {
	pub translation: DVec2,
	pub rotation: f64,
	pub scale: DVec2,
}

/// Wraps an angle into `(-PI, PI]`.
pub fn normalize_angle(angle: f64) -> f64 {
	let wrapped = angle.rem_euclid(TAU);
	if wrapped > PI { wrapped - TAU } else { wrapped }
}

/// Decomposes `transform` into translation, rotation and scale.
///
/// A reflection can be expressed either as a negative x scale or as a negative y scale with the rotation offset by
/// half a turn. Of the two, this picks the one whose rotation is closest to `reference_angle`, so a box resized
/// through its opposite edge keeps its rotation and flips the axis that was actually dragged.
///
/// Returns `None` for a singular transform.
pub fn decompose_near(transform: DAffine2, reference_angle: f64) -> Option<Decomposed> {
	let x_axis = transform.matrix2.x_axis;
	let determinant = transform.matrix2.determinant();
	let x_length = x_axis.length();
	if determinant.abs() < GEOMETRY_EPSILON || x_length < GEOMETRY_EPSILON {
		return None;
	}

	let candidate = |sign: f64| {
		let scale_x = sign * x_length;
		let rotation = (sign * x_axis.y).atan2(sign * x_axis.x);
		Decomposed {
			translation: transform.translation,
			rotation,
			scale: DVec2::new(scale_x, determinant / scale_x),
		}
	};
	let distance = |decomposed: &Decomposed| normalize_angle(decomposed.rotation - reference_angle).abs();

	let positive = candidate(1.);
	let negative = candidate(-1.);
	Some(if distance(&negative) < distance(&positive) { negative } else { positive })
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::f64::consts::FRAC_PI_3;

	#[test]
	fn round_trips_rotation_and_scale() {
		let transform = DAffine2::from_scale_angle_translation(DVec2::new(2., 3.), FRAC_PI_3, DVec2::new(7., -1.));
		let decomposed = decompose_near(transform, FRAC_PI_3).unwrap();
		assert!((decomposed.rotation - FRAC_PI_3).abs() < 1e-9);
		assert!(decomposed.scale.abs_diff_eq(DVec2::new(2., 3.), 1e-9));
		assert!(decomposed.translation.abs_diff_eq(DVec2::new(7., -1.), 1e-12));
	}

	#[test]
	fn horizontal_flip_keeps_rotation() {
		let transform = DAffine2::from_scale(DVec2::new(-2., 1.));
		let decomposed = decompose_near(transform, 0.).unwrap();
		assert!(decomposed.rotation.abs() < 1e-12);
		assert!(decomposed.scale.abs_diff_eq(DVec2::new(-2., 1.), 1e-12));
	}

	#[test]
	fn vertical_flip_keeps_rotation() {
		let transform = DAffine2::from_scale(DVec2::new(1., -2.));
		let decomposed = decompose_near(transform, 0.).unwrap();
		assert!(decomposed.rotation.abs() < 1e-12);
		assert!(decomposed.scale.abs_diff_eq(DVec2::new(1., -2.), 1e-12));
	}

	#[test]
	fn singular_transform_is_rejected() {
		assert!(decompose_near(DAffine2::from_scale(DVec2::new(0., 1.)), 0.).is_none());
	}

	#[test]
	fn angles_wrap() {
		assert!((normalize_angle(1. + TAU) - 1.).abs() < 1e-12);
		assert!((normalize_angle(PI + 0.5) + PI - 0.5).abs() < 1e-12);
		assert!((normalize_angle(-FRAC_PI_3 - TAU) + FRAC_PI_3).abs() < 1e-12);
	}
}
