//! Column-major 4x4 matrices.
//!
//! Layout and conventions follow what WebGL expects from
//! `uniformMatrix4fv(location, false, data)`: element `(row, col)` lives at
//! `data[col * 4 + row]`, clip-space depth is `[-1, 1]`, right-handed.

use super::Vec3;

const EPSILON: f32 = 1e-6;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat4(pub [f32; 16]);

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    #[rustfmt::skip]
    pub const IDENTITY: Mat4 = Mat4([
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ]);

    pub fn as_array(&self) -> &[f32; 16] {
        &self.0
    }

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.0[col * 4 + row]
    }

    /// Rotation of `angle_rad` about `axis`. A degenerate axis yields identity.
    pub fn from_axis_angle(axis: Vec3, angle_rad: f32) -> Self {
        let len = axis.length();
        if len < EPSILON {
            return Self::IDENTITY;
        }
        let Vec3 { x, y, z } = axis * (1.0 / len);
        let (s, c) = angle_rad.sin_cos();
        let t = 1.0 - c;

        #[rustfmt::skip]
        let m = [
            x * x * t + c,     y * x * t + z * s, z * x * t - y * s, 0.0,
            x * y * t - z * s, y * y * t + c,     z * y * t + x * s, 0.0,
            x * z * t + y * s, y * z * t - x * s, z * z * t + c,     0.0,
            0.0,               0.0,               0.0,               1.0,
        ];
        Self(m)
    }

    pub fn rotation_x(angle_rad: f32) -> Self {
        Self::from_axis_angle(Vec3::X, angle_rad)
    }

    pub fn rotation_y(angle_rad: f32) -> Self {
        Self::from_axis_angle(Vec3::Y, angle_rad)
    }

    /// `self * R(axis, angle)`: the rotation is applied before `self`.
    pub fn rotate(&self, angle_rad: f32, axis: Vec3) -> Self {
        *self * Self::from_axis_angle(axis, angle_rad)
    }

    /// View matrix looking from `eye` towards `center`.
    ///
    /// When `eye` and `center` coincide there is no direction to look along and
    /// identity is returned.
    pub fn look_at(eye: Vec3, center: Vec3, up: Vec3) -> Self {
        let forward = eye - center;
        if forward.length() < EPSILON {
            return Self::IDENTITY;
        }
        let z = forward.normalize_or_zero();
        let x = up.cross(z).normalize_or_zero();
        let y = z.cross(x).normalize_or_zero();

        #[rustfmt::skip]
        let m = [
            x.x, y.x, z.x, 0.0,
            x.y, y.y, z.y, 0.0,
            x.z, y.z, z.z, 0.0,
            -x.dot(eye), -y.dot(eye), -z.dot(eye), 1.0,
        ];
        Self(m)
    }

    /// Perspective projection with depth mapped to `[-1, 1]`.
    pub fn perspective(fov_y_rad: f32, aspect: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (0.5 * fov_y_rad).tan();
        let nf = 1.0 / (near - far);

        let mut m = [0.0f32; 16];
        m[0] = f / aspect;
        m[5] = f;
        m[10] = (far + near) * nf;
        m[11] = -1.0;
        m[14] = 2.0 * far * near * nf;
        Self(m)
    }

    pub fn approx_eq(&self, other: &Mat4, tolerance: f32) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }
}

impl std::ops::Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        let (a, b) = (&self.0, &rhs.0);
        let mut c = [0.0f32; 16];
        for col in 0..4 {
            for row in 0..4 {
                c[col * 4 + row] = a[row] * b[col * 4]
                    + a[4 + row] * b[col * 4 + 1]
                    + a[8 + row] * b[col * 4 + 2]
                    + a[12 + row] * b[col * 4 + 3];
            }
        }
        Mat4(c)
    }
}
