//! Fixed shader sources and triangle geometry shared by the scenes.

use gpu::vertex::{ColorVertex2, ColorVertex3};

pub const FLAT_VERTEX_SHADER: &str = "
precision mediump float;

attribute vec2 vertPosition;
attribute vec3 vertColor;
varying vec3 fragColor;

void main() {
  fragColor = vertColor;
  gl_Position = vec4(vertPosition, 0.0, 1.0);
}";

pub const PROJECTED_VERTEX_SHADER: &str = "
precision mediump float;

attribute vec3 vertPosition;
attribute vec3 vertColor;
varying vec3 fragColor;
uniform mat4 mWorld;
uniform mat4 mView;
uniform mat4 mProj;

void main() {
  fragColor = vertColor;
  gl_Position = mProj * mView * mWorld * vec4(vertPosition, 1.0);
}";

pub const COLOR_FRAGMENT_SHADER: &str = "
precision mediump float;

varying vec3 fragColor;

void main() {
  gl_FragColor = vec4(fragColor, 1.0);
}";

const TOP: ([f32; 2], [f32; 3]) = ([0.0, 0.5], [1.0, 1.0, 0.0]);
const LEFT: ([f32; 2], [f32; 3]) = ([-0.5, -0.5], [0.7, 0.0, 1.0]);
const RIGHT: ([f32; 2], [f32; 3]) = ([0.5, -0.5], [0.1, 1.0, 0.6]);

const fn flat(v: ([f32; 2], [f32; 3])) -> ColorVertex2 {
    ColorVertex2 {
        position: v.0,
        color: v.1,
    }
}

const fn lifted(v: ([f32; 2], [f32; 3])) -> ColorVertex3 {
    ColorVertex3 {
        position: [v.0[0], v.0[1], 0.0],
        color: v.1,
    }
}

pub const FLAT_TRIANGLE: [ColorVertex2; 3] = [flat(TOP), flat(LEFT), flat(RIGHT)];

/// The flat triangle on the `z = 0` plane.
pub const TRIANGLE: [ColorVertex3; 3] = [lifted(TOP), lifted(LEFT), lifted(RIGHT)];
