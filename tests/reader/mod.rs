//! Minimal SPM decoder used to check exporter output.

#![allow(dead_code)]

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};

pub struct ReadVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub normal: [f32; 3],
}

pub struct ReadTexture {
    pub layer: u8,
    pub name: String,
    pub flags: u16,
}

pub struct ReadSurface {
    pub name: String,
    pub flags: i16,
    pub dimensions: [u8; 8],
    pub texture: Option<ReadTexture>,
    pub color: Option<[u8; 4]>,
    pub fog: Option<f32>,
    pub vertices: Vec<ReadVertex>,
    pub triangles: Vec<[u16; 3]>,
}

/// position, rotation (x, y, z, w), scale as stored on disk.
pub type ReadTransform = ([f32; 3], [f32; 4], [f32; 3]);

pub struct ReadJoint {
    pub name: String,
    pub parent: i32,
    pub transform: ReadTransform,
    pub weights: Vec<(u32, u32, f32)>,
    pub keyframes: Vec<(u32, ReadTransform)>,
}

pub struct ReadSkeleton {
    pub name: String,
    pub joints: Vec<ReadJoint>,
}

pub struct ReadDocument {
    pub version: u16,
    pub submeshes: i32,
    pub name: String,
    pub flags: i16,
    pub user_data: u32,
    pub surfaces: Vec<ReadSurface>,
    pub skeleton: Option<ReadSkeleton>,
}

struct Reader<'a> {
    inner: Cursor<&'a [u8]>,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; n];
        self.inner.read_exact(&mut bytes).expect("truncated field");
        bytes
    }

    fn u8(&mut self) -> u8 {
        self.inner.read_u8().expect("truncated u8")
    }

    fn u16(&mut self) -> u16 {
        self.inner.read_u16::<LittleEndian>().expect("truncated u16")
    }

    fn i16(&mut self) -> i16 {
        self.inner.read_i16::<LittleEndian>().expect("truncated i16")
    }

    fn u32(&mut self) -> u32 {
        self.inner.read_u32::<LittleEndian>().expect("truncated u32")
    }

    fn i32(&mut self) -> i32 {
        self.inner.read_i32::<LittleEndian>().expect("truncated i32")
    }

    fn f32(&mut self) -> f32 {
        self.inner.read_f32::<LittleEndian>().expect("truncated f32")
    }

    fn string(&mut self) -> String {
        let len = self.i32() as usize;
        String::from_utf8(self.take(len)).expect("string is not UTF-8")
    }

    fn vec3(&mut self) -> [f32; 3] {
        [self.f32(), self.f32(), self.f32()]
    }

    fn transform(&mut self) -> ReadTransform {
        let position = self.vec3();
        let rotation = [self.f32(), self.f32(), self.f32(), self.f32()];
        let scale = self.vec3();
        (position, rotation, scale)
    }

    fn remaining(&self) -> usize {
        self.inner.get_ref().len() - self.inner.position() as usize
    }
}

pub fn read(data: &[u8]) -> ReadDocument {
    let mut c = Reader {
        inner: Cursor::new(data),
    };
    assert_eq!(c.take(4), b"SPMD");
    let version = c.u16();
    let submeshes = c.i32();
    let name = c.string();
    let flags = c.i16();
    let user_data = c.u32();

    let surface_count = c.u32();
    let surfaces = (0..surface_count).map(|_| read_surface(&mut c)).collect();

    let skeleton = if c.remaining() > 0 {
        let name = c.string();
        let joint_count = c.u32();
        let joints = (0..joint_count).map(|_| read_joint(&mut c)).collect();
        Some(ReadSkeleton { name, joints })
    } else {
        None
    };
    assert_eq!(c.remaining(), 0, "trailing bytes");

    ReadDocument {
        version,
        submeshes,
        name,
        flags,
        user_data,
        surfaces,
        skeleton,
    }
}

fn read_surface(c: &mut Reader) -> ReadSurface {
    let name = c.string();
    let flags = c.i16();
    let dimensions: [u8; 8] = c.take(8).try_into().unwrap();

    let texture = match c.u8() {
        0 => None,
        1 => {
            let layer = c.u8();
            let name = c.string();
            let flags = c.u16();
            for _ in 0..3 {
                assert_eq!(c.i32(), 0);
            }
            Some(ReadTexture { layer, name, flags })
        }
        n => panic!("unexpected texture count {}", n),
    };

    let vertex_count = c.u32();
    let (color, fog) = if vertex_count > 0 {
        let color: [u8; 4] = c.take(4).try_into().unwrap();
        (Some(color), Some(c.f32()))
    } else {
        (None, None)
    };
    let vertices = (0..vertex_count)
        .map(|_| ReadVertex {
            position: c.vec3(),
            uv: [c.f32(), c.f32()],
            normal: c.vec3(),
        })
        .collect();

    let triangle_count = c.u32();
    let triangles = (0..triangle_count)
        .map(|_| [c.u16(), c.u16(), c.u16()])
        .collect();

    ReadSurface {
        name,
        flags,
        dimensions,
        texture,
        color,
        fog,
        vertices,
        triangles,
    }
}

fn read_joint(c: &mut Reader) -> ReadJoint {
    let name = c.string();
    let parent = c.i32();
    let transform = c.transform();
    let weight_count = c.u32();
    let weights = (0..weight_count)
        .map(|_| (c.u32(), c.u32(), c.f32()))
        .collect();
    let keyframe_count = c.u32();
    let keyframes = (0..keyframe_count)
        .map(|_| (c.u32(), c.transform()))
        .collect();
    ReadJoint {
        name,
        parent,
        transform,
        weights,
        keyframes,
    }
}
