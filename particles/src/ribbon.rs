//! Ribbon strip generation.
//!
//! Particles belonging to one ribbon are ordered by their sort key and
//! connected into a width-extruded triangle strip. A frame may carry several
//! ribbons at once; groups are keyed by ribbon id and emitted in ascending id
//! order so draw order stays consistent across frames.

use std::collections::BTreeMap;

use firelily_core::color::scale_alpha;
use firelily_core::math::{perpendicular, safe_normalize, Vec2};
use firelily_core::mesh::{BufferGrowth, MeshBuffers};

use crate::attributes::{ParticleFrame, RibbonId};
use crate::entry::{GenerationParams, RibbonJointMode, RibbonRendererConfig, UvChannelSettings, UvDistribution};
use crate::GeneratedCounts;

/// Strips with fewer points than this produce no geometry.
const MIN_STRIP_POINTS: usize = 3;

/// Below this sine of the joint half-angle a miter would shoot off to
/// near-infinity; fall back to the plain segment perpendicular instead.
const MIN_MITER_SIN: f32 = 1e-4;

/// Generate ribbon strips for every ribbon group in `frame` into `out`.
///
/// Frames with fewer than 2 particles leave `out` completely untouched.
/// Otherwise the buffers are sized once for the sum of all strips and each
/// strip is written at its running offset. Returns the live counts.
pub fn generate_ribbons(
    frame: &ParticleFrame,
    config: &RibbonRendererConfig,
    params: &GenerationParams,
    out: &mut MeshBuffers,
) -> GeneratedCounts {
    debug_assert!(params.scale_factor > 0.0);

    if frame.len() < 2 {
        return GeneratedCounts::default();
    }

    let groups = build_groups(frame);

    let mut vertex_req = 0;
    let mut index_req = 0;
    for members in groups.values() {
        let (vertices, indices) = strip_counts(members.len(), config.joint_mode);
        vertex_req += vertices;
        index_req += indices;
    }
    BufferGrowth::for_ribbons(config.particle_increment).apply(out, vertex_req, index_req);

    let mut vertex_offset = 0;
    let mut index_offset = 0;
    for (id, members) in &groups {
        if members.len() < MIN_STRIP_POINTS {
            log::trace!(
                "skipping ribbon {:?}: {} point(s), need {}",
                id,
                members.len(),
                MIN_STRIP_POINTS
            );
            continue;
        }
        match config.joint_mode {
            RibbonJointMode::AveragedTangent => {
                fill_strip_averaged(frame, members, config, params, out, vertex_offset, index_offset)
            }
            RibbonJointMode::Mitered => {
                fill_strip_mitered(frame, members, config, params, out, vertex_offset, index_offset)
            }
        }
        let (vertices, indices) = strip_counts(members.len(), config.joint_mode);
        vertex_offset += vertices;
        index_offset += indices;
    }

    GeneratedCounts {
        vertices: vertex_req,
        indices: index_req,
    }
}

/// Vertex/index contribution of one strip of `point_count` points.
fn strip_counts(point_count: usize, joint_mode: RibbonJointMode) -> (usize, usize) {
    if point_count < MIN_STRIP_POINTS {
        return (0, 0);
    }
    match joint_mode {
        RibbonJointMode::AveragedTangent => ((point_count - 1) * 2, (point_count - 2) * 6),
        RibbonJointMode::Mitered => (point_count * 2, (point_count - 1) * 6),
    }
}

/// Partition particle indices by ribbon id (ascending), each group ordered
/// by its sort key. An unbound id channel yields a single group.
fn build_groups(frame: &ParticleFrame) -> BTreeMap<RibbonId, Vec<usize>> {
    let mut groups: BTreeMap<RibbonId, Vec<usize>> = BTreeMap::new();
    for index in 0..frame.len() {
        groups.entry(frame.ribbon_id(index)).or_default().push(index);
    }
    for members in groups.values_mut() {
        members.sort_by(|&a, &b| frame.sort_key(a).total_cmp(&frame.sort_key(b)));
    }
    groups
}

/// Running U coordinate for one texcoord channel.
struct UvTracker {
    settings: UvChannelSettings,
    u: f32,
}

impl UvTracker {
    fn new(settings: UvChannelSettings) -> Self {
        Self { settings, u: 0.0 }
    }

    /// U at `point_index`, given the length of the segment leading into it.
    fn advance(&mut self, point_index: usize, point_count: usize, segment_length: f32) -> f32 {
        match self.settings.mode {
            UvDistribution::TiledByLength => {
                self.u += segment_length / self.settings.tiling_length;
                self.u
            }
            UvDistribution::NormalizedByIndex => point_index as f32 / point_count as f32,
        }
    }
}

fn write_pair(
    out: &mut MeshBuffers,
    vertex_cursor: usize,
    center: Vec2,
    extent: Vec2,
    color: [u8; 4],
    u0: f32,
    u1: f32,
) {
    let left = &mut out.vertices[vertex_cursor];
    left.position = [center.x + extent.x, center.y + extent.y, 0.0];
    left.color = color;
    left.texcoord = [[u0, 1.0], [u1, 1.0], [0.0, 0.0]];

    let right = &mut out.vertices[vertex_cursor + 1];
    right.position = [center.x - extent.x, center.y - extent.y, 0.0];
    right.color = color;
    right.texcoord = [[u0, 0.0], [u1, 0.0], [0.0, 0.0]];
}

/// Fill one strip using averaged segment tangents.
///
/// Emits one vertex pair per point 0..M-2: the first pair extrudes along the
/// first segment's perpendicular, interior pairs along the perpendicular of
/// the two adjacent segments' averaged direction. The last point only steers
/// the tangent of the pair before it.
fn fill_strip_averaged(
    frame: &ParticleFrame,
    members: &[usize],
    config: &RibbonRendererConfig,
    params: &GenerationParams,
    out: &mut MeshBuffers,
    vertex_offset: usize,
    index_offset: usize,
) {
    let point_count = members.len();

    let mut last_position = frame.position_2d(members[0]);
    let mut current_position = frame.position_2d(members[1]);
    let mut last_segment_length = (current_position - last_position).norm();
    let mut last_direction = safe_normalize(current_position - last_position);

    // First pair; keeps the historical (0,0)/(1,0) texcoords.
    {
        let width = params.width_to_ui(frame.ribbon_width(members[0]));
        let color = scale_alpha(frame.color(members[0]).to_rgba8(), params.alpha);
        let extent = perpendicular(last_direction) * width * 0.5;
        let center = params.position_to_ui(last_position);
        for i in 0..2 {
            let vertex = &mut out.vertices[vertex_offset + i];
            vertex.position = [
                center.x + extent.x * (1.0 - 2.0 * i as f32),
                center.y + extent.y * (1.0 - 2.0 * i as f32),
                0.0,
            ];
            vertex.color = color;
            vertex.texcoord = [[i as f32, 0.0], [i as f32, 0.0], [0.0, 0.0]];
        }
    }

    let mut tracker0 = UvTracker::new(config.uv0);
    let mut tracker1 = UvTracker::new(config.uv1);
    let mut vertex_cursor = vertex_offset + 2;
    let mut index_cursor = index_offset;

    for point in 1..point_count - 1 {
        let next_position = frame.position_2d(members[point + 1]);
        let segment_length = (next_position - current_position).norm();
        let current_direction = safe_normalize(next_position - current_position);

        let width = params.width_to_ui(frame.ribbon_width(members[point]));
        let color = scale_alpha(frame.color(members[point]).to_rgba8(), params.alpha);

        let mut tangent = safe_normalize(last_direction + current_direction);
        if tangent == Vec2::zeros() {
            // Adjacent segments fold straight back on themselves.
            tangent = current_direction;
        }
        let extent = perpendicular(tangent) * width * 0.5;
        let center = params.position_to_ui(current_position);

        let u0 = tracker0.advance(point, point_count, last_segment_length);
        let u1 = tracker1.advance(point, point_count, last_segment_length);
        write_pair(out, vertex_cursor, center, extent, color, u0, u1);

        let v = vertex_cursor as u32;
        out.indices[index_cursor..index_cursor + 6]
            .copy_from_slice(&[v - 2, v - 1, v, v, v - 1, v + 1]);

        vertex_cursor += 2;
        index_cursor += 6;
        current_position = next_position;
        last_direction = current_direction;
        last_segment_length = segment_length;
    }
}

/// Fill one strip with mitered joints: one vertex pair per point, interior
/// joints widened so the strip keeps its width through corners.
fn fill_strip_mitered(
    frame: &ParticleFrame,
    members: &[usize],
    config: &RibbonRendererConfig,
    params: &GenerationParams,
    out: &mut MeshBuffers,
    vertex_offset: usize,
    index_offset: usize,
) {
    let point_count = members.len();

    let mut tracker0 = UvTracker::new(config.uv0);
    let mut tracker1 = UvTracker::new(config.uv1);

    for point in 0..point_count {
        let position = frame.position_2d(members[point]);
        let half_width = params.width_to_ui(frame.ribbon_width(members[point])) * 0.5;
        let color = scale_alpha(frame.color(members[point]).to_rgba8(), params.alpha);

        let extent = if point == 0 {
            let direction = safe_normalize(frame.position_2d(members[1]) - position);
            clockwise_perpendicular(direction) * half_width
        } else if point == point_count - 1 {
            let direction =
                safe_normalize(position - frame.position_2d(members[point - 1]));
            clockwise_perpendicular(direction) * half_width
        } else {
            mitered_extent(
                frame.position_2d(members[point - 1]),
                position,
                frame.position_2d(members[point + 1]),
                half_width,
            )
        };

        let segment_length = if point == 0 {
            0.0
        } else {
            (position - frame.position_2d(members[point - 1])).norm()
        };
        let (u0, u1) = if point == 0 {
            (0.0, 0.0)
        } else {
            (
                tracker0.advance(point, point_count, segment_length),
                tracker1.advance(point, point_count, segment_length),
            )
        };

        let center = params.position_to_ui(position);
        write_pair(out, vertex_offset + point * 2, center, extent, color, u0, u1);
    }

    for pair in 0..point_count - 1 {
        let v = (vertex_offset + pair * 2) as u32;
        let index_cursor = index_offset + pair * 6;
        out.indices[index_cursor..index_cursor + 6]
            .copy_from_slice(&[v, v + 1, v + 2, v + 2, v + 1, v + 3]);
    }
}

/// Joint extent at an interior point: the averaged normal of both adjacent
/// segments, scaled so the strip's perpendicular width stays `2*half_width`.
fn mitered_extent(prev: Vec2, current: Vec2, next: Vec2, half_width: f32) -> Vec2 {
    let to_prev = safe_normalize(prev - current);
    let to_next = safe_normalize(next - current);

    let mut normal = safe_normalize(to_prev + to_next);
    if normal == Vec2::zeros() {
        // Collinear point, no corner to miter.
        return clockwise_perpendicular(to_next) * half_width;
    }

    let sin = to_prev.dot(&normal).acos().sin();
    if !sin.is_finite() || sin < MIN_MITER_SIN {
        return clockwise_perpendicular(to_next) * half_width;
    }

    // Keep the left vertex on the left regardless of turn direction.
    if to_prev.x * to_next.y - to_next.x * to_prev.y < 0.0 {
        normal = -normal;
    }
    normal * (half_width / sin)
}

/// Clockwise 90-degree rotation, the extrusion direction for strip ends.
fn clockwise_perpendicular(v: Vec2) -> Vec2 {
    Vec2::new(v.y, -v.x)
}
