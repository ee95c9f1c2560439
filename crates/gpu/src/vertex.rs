use bytemuck::{Pod, Zeroable};
use runtime::diagnostics::DiagnosticSink;

use crate::context::GlContext;
use crate::program::{GlObject, GpuError};

const FLOAT_BYTES: usize = std::mem::size_of::<f32>();

/// One float attribute inside an interleaved vertex.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Name of the `attribute` in the vertex shader.
    pub name: &'static str,
    pub components: i32,
    /// Offset from the start of the vertex, in floats.
    pub offset: usize,
}

impl VertexAttribute {
    pub fn offset_bytes(&self) -> i32 {
        (self.offset * FLOAT_BYTES) as i32
    }
}

/// A plain-old-data vertex made only of `f32`s, plus its attribute layout.
pub trait InterleavedVertex: Pod {
    const ATTRIBUTES: &'static [VertexAttribute];

    fn stride_bytes() -> i32 {
        std::mem::size_of::<Self>() as i32
    }

    fn floats_per_vertex() -> usize {
        std::mem::size_of::<Self>() / FLOAT_BYTES
    }
}

/// `(x, y, r, g, b)`
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ColorVertex2 {
    pub position: [f32; 2],
    pub color: [f32; 3],
}

impl InterleavedVertex for ColorVertex2 {
    const ATTRIBUTES: &'static [VertexAttribute] = &[
        VertexAttribute {
            name: "vertPosition",
            components: 2,
            offset: 0,
        },
        VertexAttribute {
            name: "vertColor",
            components: 3,
            offset: 2,
        },
    ];
}

/// `(x, y, z, r, g, b)`
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ColorVertex3 {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl InterleavedVertex for ColorVertex3 {
    const ATTRIBUTES: &'static [VertexAttribute] = &[
        VertexAttribute {
            name: "vertPosition",
            components: 3,
            offset: 0,
        },
        VertexAttribute {
            name: "vertColor",
            components: 3,
            offset: 3,
        },
    ];
}

pub fn as_floats<V: InterleavedVertex>(vertices: &[V]) -> &[f32] {
    bytemuck::cast_slice(vertices)
}

#[derive(Debug)]
pub struct VertexBuffer<B> {
    pub buffer: B,
    pub vertex_count: i32,
}

/// Uploads `vertices` once and describes their layout against `program`.
///
/// Attributes the program does not expose (optimized out or misspelled) are
/// skipped with a trace event; WebGL would silently ignore them as well.
pub fn upload_vertices<C: GlContext, V: InterleavedVertex>(
    gl: &C,
    program: &C::Program,
    vertices: &[V],
    sink: &dyn DiagnosticSink,
) -> Result<VertexBuffer<C::Buffer>, GpuError> {
    let buffer = gl
        .create_buffer()
        .ok_or_else(|| GpuError::CreateFailed(GlObject::Buffer).report(sink))?;
    gl.upload_static_floats(&buffer, as_floats(vertices));

    let mut active = Vec::with_capacity(V::ATTRIBUTES.len());
    for attribute in V::ATTRIBUTES {
        let Some(location) = gl.attrib_location(program, attribute.name) else {
            tracing::warn!(attribute = attribute.name, "attribute not active in program");
            continue;
        };
        gl.vertex_attrib_pointer(
            location,
            attribute.components,
            V::stride_bytes(),
            attribute.offset_bytes(),
        );
        active.push(location);
    }
    for location in active {
        gl.enable_vertex_attrib_array(location);
    }

    Ok(VertexBuffer {
        buffer,
        vertex_count: vertices.len() as i32,
    })
}
