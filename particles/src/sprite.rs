//! Sprite quad generation.
//!
//! Every particle becomes one camera-facing quad in the UI plane: 4 vertices
//! and 2 triangles, rotated around the particle center, colored from the
//! quantized particle color and textured from either the unit square or a
//! sprite-sheet cell.

use firelily_core::color::scale_alpha;
use firelily_core::math::{finite_or_zero, rotate_sin_cos, safe_normalize, sign, Vec2};
use firelily_core::mesh::{BufferGrowth, MeshBuffers};

use crate::attributes::ParticleFrame;
use crate::entry::{GenerationParams, SpriteAlignment, SpriteRendererConfig};
use crate::GeneratedCounts;

const UNIT_QUAD_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];

/// Generate sprite quads for every particle in `frame` into `out`.
///
/// Writes exactly 4 vertices and 6 indices per particle at the start of the
/// buffers; the growth policy keeps everything past the live range as
/// degenerate zero triangles. Returns the live counts.
pub fn generate_sprites(
    frame: &ParticleFrame,
    config: &SpriteRendererConfig,
    params: &GenerationParams,
    out: &mut MeshBuffers,
) -> GeneratedCounts {
    debug_assert!(params.scale_factor > 0.0);

    let count = frame.len();
    let vertex_req = count * 4;
    let index_req = count * 6;
    BufferGrowth::for_sprites(config.particle_increment).apply(out, vertex_req, index_req);

    let use_sub_images = config.sub_image_size != Vec2::new(1.0, 1.0);

    for particle in 0..count {
        let center = params.position_to_ui(frame.position_2d(particle));
        let half_size = params.size_to_ui(frame.size(particle)) * 0.5;
        let color = scale_alpha(frame.color(particle).to_rgba8(), params.alpha);

        let (sin, cos) = match config.alignment {
            SpriteAlignment::VelocityAligned => {
                velocity_rotation(frame.velocity_2d(particle), params)
            }
            SpriteAlignment::Rotation => {
                explicit_rotation(frame.rotation_degrees(particle), params)
            }
        };

        let uvs = if use_sub_images {
            sub_image_uvs(frame.sub_image_index(particle), config.sub_image_size)
        } else {
            UNIT_QUAD_UVS
        };

        let material = frame.material_params(particle);

        // Two rotated corners are enough, the other two mirror them.
        let mut corners = [Vec2::zeros(); 4];
        corners[0] = rotate_sin_cos(Vec2::new(-half_size.x, -half_size.y), sin, cos);
        corners[1] = rotate_sin_cos(Vec2::new(half_size.x, -half_size.y), sin, cos);
        corners[2] = -corners[1];
        corners[3] = -corners[0];

        let vertex_base = particle * 4;
        for (i, (corner, uv)) in corners.iter().zip(uvs.iter()).enumerate() {
            let vertex = &mut out.vertices[vertex_base + i];
            vertex.position = [center.x + corner.x, center.y + corner.y, 0.0];
            vertex.color = color;
            vertex.texcoord = [*uv, [material.x, material.y], [material.z, material.w]];
        }

        let index_base = particle * 6;
        let v = vertex_base as u32;
        out.indices[index_base..index_base + 6].copy_from_slice(&[v, v + 1, v + 2, v + 2, v + 1, v + 3]);
    }

    GeneratedCounts {
        vertices: vertex_req,
        indices: index_req,
    }
}

/// Sine/cosine of the quad rotation from the explicit rotation channel.
fn explicit_rotation(degrees: f32, params: &GenerationParams) -> (f32, f32) {
    let mut degrees = degrees;
    if params.local_space {
        degrees -= params.transform.pitch_degrees;
    }
    let (sin, cos) = degrees.to_radians().sin_cos();
    (finite_or_zero(sin), finite_or_zero(cos))
}

/// Sine/cosine of the quad rotation aligning it with the particle velocity.
///
/// Zero velocity yields (0, 0), collapsing the quad to its center.
fn velocity_rotation(velocity_2d: Vec2, params: &GenerationParams) -> (f32, f32) {
    let cos = safe_normalize(velocity_2d).dot(&Vec2::new(0.0, 1.0));
    let sin_sign = sign(velocity_2d.x);

    let (sin, cos) = if params.local_space {
        let angle = (cos * sin_sign).acos() - params.pitch_radians();
        angle.sin_cos()
    } else {
        ((1.0 - cos * cos).sqrt() * sin_sign, cos)
    };
    (finite_or_zero(sin), finite_or_zero(cos))
}

/// Texture coordinates of a sprite-sheet cell, ordered to match the quad's
/// corner layout (top row of the cell maps to the quad's bottom corners).
fn sub_image_uvs(sub_image_index: f32, grid: Vec2) -> [[f32; 2]; 4] {
    let delta = Vec2::new(1.0 / grid.x, 1.0 / grid.y);
    let row = ((sub_image_index / grid.x).floor() as i32) % (grid.y as i32).max(1);
    let column = (sub_image_index as i32) % (grid.x as i32).max(1);

    let left = delta.x * column as f32;
    let right = delta.x * (column + 1) as f32;
    let top = delta.y * row as f32;
    let bottom = delta.y * (row + 1) as f32;

    [[left, top], [right, top], [left, bottom], [right, bottom]]
}

#[cfg(test)]
mod tests {
    use firelily_core::color::LinearColor;
    use firelily_core::math::{Vec3, Vec4};

    use super::*;
    use crate::entry::EmitterTransform;

    fn positions_of(out: &MeshBuffers, base: usize) -> [[f32; 3]; 4] {
        [
            out.vertices[base].position,
            out.vertices[base + 1].position,
            out.vertices[base + 2].position,
            out.vertices[base + 3].position,
        ]
    }

    #[test]
    fn axis_aligned_quad_with_alpha() {
        let positions = [Vec3::new(10.0, 0.0, 5.0)];
        let sizes = [Vec2::new(2.0, 4.0)];
        let colors = [LinearColor::new(1.0, 0.0, 0.0, 1.0)];
        let frame = ParticleFrame::new(1)
            .with_positions(&positions)
            .with_sizes(&sizes)
            .with_colors(&colors);
        let params = GenerationParams {
            alpha: 0.5,
            ..GenerationParams::default()
        };

        let mut out = MeshBuffers::new();
        let counts =
            generate_sprites(&frame, &SpriteRendererConfig::default(), &params, &mut out);

        assert_eq!(counts, GeneratedCounts { vertices: 4, indices: 6 });
        assert_eq!(
            positions_of(&out, 0),
            [
                [9.0, 3.0, 0.0],
                [11.0, 3.0, 0.0],
                [9.0, 7.0, 0.0],
                [11.0, 7.0, 0.0],
            ]
        );
        assert_eq!(out.vertices[0].color, [255, 0, 0, 127]);
        assert_eq!(out.vertices[0].texcoord[0], [0.0, 0.0]);
        assert_eq!(out.vertices[3].texcoord[0], [1.0, 1.0]);
        assert_eq!(&out.indices[..6], &[0, 1, 2, 2, 1, 3]);
    }

    #[test]
    fn buffers_grow_in_increments() {
        let frame = ParticleFrame::new(2);
        let mut out = MeshBuffers::new();
        let counts = generate_sprites(
            &frame,
            &SpriteRendererConfig::default(),
            &GenerationParams::default(),
            &mut out,
        );

        assert_eq!(counts, GeneratedCounts { vertices: 8, indices: 12 });
        assert_eq!(out.vertex_count(), 120);
        assert_eq!(out.index_count(), 180);
        assert_eq!(&out.indices[6..12], &[4, 5, 6, 6, 5, 7]);
        assert!(out.indices[12..].iter().all(|&i| i == 0));
    }

    #[test]
    fn empty_frame_clears_stale_indices() {
        let mut out = MeshBuffers::new();
        generate_sprites(
            &ParticleFrame::new(5),
            &SpriteRendererConfig::default(),
            &GenerationParams::default(),
            &mut out,
        );
        assert!(out.indices[..30].iter().any(|&i| i != 0));

        let counts = generate_sprites(
            &ParticleFrame::new(0),
            &SpriteRendererConfig::default(),
            &GenerationParams::default(),
            &mut out,
        );
        assert_eq!(counts, GeneratedCounts::default());
        assert!(out.indices.iter().all(|&i| i == 0));
        assert_eq!(out.vertex_count(), 120);
    }

    #[test]
    fn velocity_alignment_rotates_quarter_turn() {
        let velocities = [Vec3::new(1.0, 0.0, 0.0)];
        let sizes = [Vec2::new(2.0, 2.0)];
        let frame = ParticleFrame::new(1)
            .with_velocities(&velocities)
            .with_sizes(&sizes);
        let config = SpriteRendererConfig {
            alignment: SpriteAlignment::VelocityAligned,
            ..SpriteRendererConfig::default()
        };

        let mut out = MeshBuffers::new();
        generate_sprites(&frame, &config, &GenerationParams::default(), &mut out);

        // sin = 1, cos = 0: corner (-1,-1) lands at (1,-1)
        let p = out.vertices[0].position;
        assert!((p[0] - 1.0).abs() < 1e-6);
        assert!((p[1] + 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_velocity_collapses_quad() {
        let positions = [Vec3::new(3.0, 0.0, 4.0)];
        let sizes = [Vec2::new(2.0, 2.0)];
        let frame = ParticleFrame::new(1)
            .with_positions(&positions)
            .with_sizes(&sizes);
        let config = SpriteRendererConfig {
            alignment: SpriteAlignment::VelocityAligned,
            ..SpriteRendererConfig::default()
        };

        let mut out = MeshBuffers::new();
        generate_sprites(&frame, &config, &GenerationParams::default(), &mut out);

        for i in 0..4 {
            assert_eq!(out.vertices[i].position, [3.0, 4.0, 0.0]);
        }
    }

    #[test]
    fn sub_image_grid_cell() {
        // 2x2 grid, index 3: row 1, column 1, bottom-right cell
        let uvs = sub_image_uvs(3.0, Vec2::new(2.0, 2.0));
        assert_eq!(
            uvs,
            [[0.5, 0.5], [1.0, 0.5], [0.5, 1.0], [1.0, 1.0]]
        );
    }

    #[test]
    fn sub_image_index_wraps_around_grid() {
        // 2x2 grid, index 5 wraps to row 0, column 1
        let uvs = sub_image_uvs(5.0, Vec2::new(2.0, 2.0));
        assert_eq!(uvs[0], [0.5, 0.0]);
    }

    #[test]
    fn material_params_fill_texcoord_slots() {
        let material = [Vec4::new(0.1, 0.2, 0.3, 0.4)];
        let frame = ParticleFrame::new(1).with_material_params(&material);

        let mut out = MeshBuffers::new();
        generate_sprites(
            &frame,
            &SpriteRendererConfig::default(),
            &GenerationParams::default(),
            &mut out,
        );

        for i in 0..4 {
            assert_eq!(out.vertices[i].texcoord[1], [0.1, 0.2]);
            assert_eq!(out.vertices[i].texcoord[2], [0.3, 0.4]);
        }
    }

    #[test]
    fn local_space_counter_rotates_by_pitch() {
        let sizes = [Vec2::new(2.0, 2.0)];
        let rotations = [90.0_f32];
        let frame = ParticleFrame::new(1)
            .with_sizes(&sizes)
            .with_rotations(&rotations);
        let params = GenerationParams {
            local_space: true,
            transform: EmitterTransform {
                pitch_degrees: 90.0,
                ..EmitterTransform::default()
            },
            ..GenerationParams::default()
        };

        let mut out = MeshBuffers::new();
        generate_sprites(&frame, &SpriteRendererConfig::default(), &params, &mut out);

        // rotation minus pitch cancels to zero
        assert_eq!(out.vertices[0].position, [-1.0, -1.0, 0.0]);
    }
}
